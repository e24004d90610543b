//! Duplicate report parsing.
//!
//! This module turns the text report written by an external deduplication
//! tool into an ordered [`CollisionSet`]:
//! - [`collisions`]: the ordered hash → filenames mapping
//! - [`report`]: the line-oriented grammar
//!
//! Parsing is a pure function of the input bytes. Any error is fatal and is
//! reported before an interactive session starts.
//!
//! # Example
//!
//! ```
//! use dupesweep::parser::parse_collisions;
//!
//! let set = parse_collisions("h1\n  a.txt\n  b.txt\nh2\n  c.txt\n").unwrap();
//! assert_eq!(set.hashes().collect::<Vec<_>>(), vec!["h1", "h2"]);
//! assert_eq!(set.filenames("h2").unwrap(), ["c.txt"]);
//! ```

pub mod collisions;
pub mod report;

use std::io::{self, Read};

use thiserror::Error;

pub use collisions::CollisionSet;
pub use report::parse_collisions;

/// Error type for report parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A block did not start with a well-formed hash line.
    #[error("parsing error at line {line}, col {column}: expected hash")]
    ExpectedHash { line: usize, column: usize },

    /// A hash appeared a second time in the same report.
    #[error("parsing error at line {line}, col {column}: hash {hash} has already appeared before")]
    DuplicateHash {
        hash: String,
        line: usize,
        column: usize,
    },

    /// The input is not valid UTF-8.
    #[error("parsing error at line {line}, col {column}: input is not valid UTF-8")]
    InvalidUtf8 { line: usize, column: usize },

    /// Reading the input stream failed.
    #[error("while reading input: {0}")]
    Read(#[from] io::Error),
}

impl ParseError {
    /// Get the 1-based `(line, column)` of the error, if it has one.
    #[must_use]
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            Self::ExpectedHash { line, column }
            | Self::DuplicateHash { line, column, .. }
            | Self::InvalidUtf8 { line, column } => Some((*line, *column)),
            Self::Read(_) => None,
        }
    }
}

/// Parse a report held in memory as raw bytes.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUtf8`] at the first invalid byte, or any
/// grammar error from [`parse_collisions`].
pub fn parse_bytes(bytes: &[u8]) -> Result<CollisionSet, ParseError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse_collisions(text),
        Err(err) => {
            let valid = &bytes[..err.valid_up_to()];
            // The prefix is valid by construction.
            let text = std::str::from_utf8(valid).unwrap_or_default();
            let (line, column) = report::location(text, text.len());
            Err(ParseError::InvalidUtf8 { line, column })
        }
    }
}

/// Read a whole report from `reader` and parse it.
///
/// # Errors
///
/// Returns [`ParseError::Read`] if the stream cannot be read, otherwise the
/// same errors as [`parse_bytes`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<CollisionSet, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    log::debug!("Read {} byte(s) of report input", bytes.len());
    parse_bytes(&bytes)
}
