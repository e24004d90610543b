//! File actions applied after a review.
//!
//! The delete module turns the keep/delete choices of a confirmed review
//! into filesystem operations:
//! - files still selected are kept
//! - deselected files are removed permanently
//! - every file produces one line of output
//! - failures are reported and never abort the run
//!
//! ```no_run
//! use dupesweep::actions::{apply_decisions, DeleteConfig, PermanentRemover, StreamReporter};
//! # fn state() -> dupesweep::review::ReviewState { unimplemented!() }
//!
//! let mut reporter = StreamReporter::new(std::io::stderr());
//! let report = apply_decisions(&state(), &PermanentRemover, &DeleteConfig::default(), Some(&mut reporter));
//! assert!(report.all_succeeded());
//! ```

pub mod delete;

pub use delete::{
    apply_decisions, DeleteConfig, DeleteOutcome, DeleteProgressCallback, DeletionReport,
    FileOutcome, FileRemover, PermanentRemover, StreamReporter,
};
