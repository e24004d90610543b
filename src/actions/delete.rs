//! Applying keep/delete decisions after a confirmed review.
//!
//! # Overview
//!
//! The executor walks every file of a finished review in collision order,
//! then file order:
//! - files still selected are kept and left untouched
//! - deselected files are removed permanently
//!
//! Nothing at all happens unless the review was confirmed. Every removal is
//! attempted independently; a failure is reported and processing continues.
//! Nothing already removed is ever restored.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::actions::delete::{apply_decisions, DeleteConfig, PermanentRemover, StreamReporter};
//! # fn state() -> dupesweep::review::ReviewState { unimplemented!() }
//!
//! let state = state();
//! let mut reporter = StreamReporter::new(std::io::stderr());
//! let report = apply_decisions(&state, &PermanentRemover, &DeleteConfig::default(), Some(&mut reporter));
//! println!("{}", report.summary());
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::review::ReviewState;

/// Removes files from the filesystem.
pub trait FileRemover {
    /// Remove the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if removal fails.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Removes files permanently with [`fs::remove_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentRemover;

impl FileRemover for PermanentRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Configuration for applying decisions.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Report what would be removed without touching the filesystem.
    pub dry_run: bool,
}

impl DeleteConfig {
    /// Create config for a dry run.
    #[must_use]
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed.
    Removed,
    /// The file was selected to stay and was left untouched.
    Kept,
    /// Dry run: the file would have been removed.
    WouldRemove,
    /// Removal was attempted and failed.
    Failed(String),
}

/// Outcome for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Filename as it appeared in the report.
    pub name: String,
    /// What happened to it.
    pub outcome: DeleteOutcome,
}

/// Per-file outcomes of applying a review, in processing order.
#[derive(Debug, Clone, Default)]
pub struct DeletionReport {
    /// One entry per processed file.
    pub outcomes: Vec<FileOutcome>,
}

impl DeletionReport {
    fn count(&self, pred: impl Fn(&DeleteOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }

    /// Number of files removed (or that would be removed in a dry run).
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Removed | DeleteOutcome::WouldRemove))
    }

    /// Number of files kept.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Kept))
    }

    /// Number of failed removals.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.count(|o| matches!(o, DeleteOutcome::Failed(_)))
    }

    /// Check if every attempted removal succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Check if nothing was processed (the review was not confirmed).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Removed {} file(s), kept {}",
                self.removed_count(),
                self.kept_count()
            )
        } else {
            format!(
                "Removed {} file(s), kept {}, {} failed",
                self.removed_count(),
                self.kept_count(),
                self.failure_count()
            )
        }
    }
}

/// Callback for per-file progress reporting.
pub trait DeleteProgressCallback {
    /// Called after a file was removed.
    fn on_removed(&mut self, name: &str);

    /// Called for a file that is kept.
    fn on_kept(&mut self, name: &str);

    /// Called for a file that a dry run would remove.
    fn on_would_remove(&mut self, name: &str);

    /// Called after a removal failed.
    fn on_failed(&mut self, name: &str, reason: &str);
}

/// Writes one line per processed file to a stream.
///
/// Lines read `removed <name>`, `kept <name>`, `would remove <name>` or
/// `error while removing <name>: <reason>`.
#[derive(Debug)]
pub struct StreamReporter<W: Write> {
    out: W,
}

impl<W: Write> StreamReporter<W> {
    /// Create a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            log::warn!("Failed to write deletion report: {}", e);
        }
    }
}

impl<W: Write> DeleteProgressCallback for StreamReporter<W> {
    fn on_removed(&mut self, name: &str) {
        self.line(format_args!("removed {name}"));
    }

    fn on_kept(&mut self, name: &str) {
        self.line(format_args!("kept {name}"));
    }

    fn on_would_remove(&mut self, name: &str) {
        self.line(format_args!("would remove {name}"));
    }

    fn on_failed(&mut self, name: &str, reason: &str) {
        self.line(format_args!("error while removing {name}: {reason}"));
    }
}

/// Apply the keep/delete decisions of a finished review.
///
/// Returns an empty report without touching the filesystem unless the
/// review was confirmed.
pub fn apply_decisions<R, C>(
    state: &ReviewState,
    remover: &R,
    config: &DeleteConfig,
    mut callback: Option<&mut C>,
) -> DeletionReport
where
    R: FileRemover + ?Sized,
    C: DeleteProgressCallback + ?Sized,
{
    let mut report = DeletionReport::default();

    if !state.is_confirmed() {
        log::info!("Review was not confirmed; no files touched");
        return report;
    }

    for collision in state.collisions() {
        for file in collision.files() {
            let name = file.name();

            let outcome = if file.is_selected() {
                DeleteOutcome::Kept
            } else if config.dry_run {
                DeleteOutcome::WouldRemove
            } else {
                match remover.remove(file.path()) {
                    Ok(()) => {
                        log::debug!("Removed {}", name);
                        DeleteOutcome::Removed
                    }
                    Err(e) => {
                        log::debug!("Failed to remove {}: {}", name, e);
                        DeleteOutcome::Failed(e.to_string())
                    }
                }
            };

            if let Some(cb) = callback.as_deref_mut() {
                match &outcome {
                    DeleteOutcome::Removed => cb.on_removed(name),
                    DeleteOutcome::Kept => cb.on_kept(name),
                    DeleteOutcome::WouldRemove => cb.on_would_remove(name),
                    DeleteOutcome::Failed(reason) => cb.on_failed(name, reason),
                }
            }

            report.outcomes.push(FileOutcome {
                name: name.to_string(),
                outcome,
            });
        }
    }

    log::info!("{}", report.summary());
    report
}
