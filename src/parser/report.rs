//! Line-oriented duplicate report grammar.
//!
//! A report is a sequence of blocks. Each block starts with a hash line (a
//! single non-whitespace token followed by a newline) and continues with any
//! number of indented filename lines:
//!
//! ```text
//! 3f2a9c
//!   /photos/a.jpg
//!   /backup/a.jpg
//! 77e0b1
//!   /music/song.mp3
//! ```
//!
//! Parsing is greedy and never backtracks. Blank lines are ignored wherever
//! they appear.

use super::{CollisionSet, ParseError};

/// A single physical line of the report.
struct Line<'a> {
    /// Byte offset of the first character of the line.
    start: usize,
    /// Line content without the terminating `\n`.
    text: &'a str,
    /// Whether the line was terminated by `\n`.
    terminated: bool,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn is_indented(&self) -> bool {
        self.text.starts_with(char::is_whitespace)
    }
}

/// Iterator over the physical lines of the input, tracking byte offsets.
struct Lines<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<Line<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        let line = match rest.find('\n') {
            Some(end) => Line {
                start: self.pos,
                text: &rest[..end],
                terminated: true,
            },
            None => Line {
                start: self.pos,
                text: rest,
                terminated: false,
            },
        };
        Some(line)
    }

    fn advance(&mut self, line: &Line<'_>) {
        self.pos = line.start + line.text.len() + usize::from(line.terminated);
    }
}

/// Parse the text of a duplicate report into an ordered collision set.
///
/// # Errors
///
/// Returns [`ParseError::ExpectedHash`] when a block does not start with a
/// well-formed hash line, and [`ParseError::DuplicateHash`] when a hash is
/// seen a second time. Both carry the 1-based line and column of the start of
/// the offending line.
pub fn parse_collisions(text: &str) -> Result<CollisionSet, ParseError> {
    let mut set = CollisionSet::new();
    let mut lines = Lines::new(text);

    while let Some(line) = lines.peek() {
        if line.is_blank() {
            lines.advance(&line);
            continue;
        }

        let hash = match hash_token(&line) {
            Some(hash) => hash,
            None => {
                let (line_no, column) = location(text, line.start);
                return Err(ParseError::ExpectedHash {
                    line: line_no,
                    column,
                });
            }
        };

        if set.contains(hash) {
            let (line_no, column) = location(text, line.start);
            return Err(ParseError::DuplicateHash {
                hash: hash.to_string(),
                line: line_no,
                column,
            });
        }
        lines.advance(&line);

        let mut filenames = Vec::new();
        while let Some(entry) = lines.peek() {
            if entry.is_blank() {
                lines.advance(&entry);
                continue;
            }
            if !entry.is_indented() {
                break;
            }
            filenames.push(entry.text.trim().to_string());
            lines.advance(&entry);
        }

        log::trace!("Parsed hash {} with {} file(s)", hash, filenames.len());
        set.insert(hash.to_string(), filenames);
    }

    log::debug!(
        "Parsed {} collision(s) covering {} file(s)",
        set.len(),
        set.file_count()
    );
    Ok(set)
}

/// Extract the hash token of a hash line.
///
/// A hash line holds exactly one non-whitespace token at column 1, may carry
/// trailing whitespace and must be terminated by a newline.
fn hash_token<'a>(line: &Line<'a>) -> Option<&'a str> {
    if !line.terminated || line.is_indented() {
        return None;
    }

    let token = line.text.trim_end();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Convert a byte offset into a 1-based `(line, column)` pair.
///
/// Columns count characters, not bytes.
pub(crate) fn location(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
