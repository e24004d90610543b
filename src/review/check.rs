//! Out-of-band file existence checks.
//!
//! Whenever the viewed collision changes, the review asks whether each of its
//! files still exists. The check runs on a worker thread and sends one
//! [`CheckResult`] back over a channel that the event loop drains without
//! blocking.
//!
//! Results name files by [`FileId`], so a result that arrives after the user
//! navigated elsewhere still updates exactly the files it was issued for.
//! There is no cancellation: superseded checks run to completion and are
//! applied like any other.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use super::model::FileId;

/// A batch of files to check, captured when the check is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    targets: Vec<(FileId, PathBuf)>,
}

impl CheckRequest {
    /// Create a request for the given files.
    #[must_use]
    pub fn new(targets: Vec<(FileId, PathBuf)>) -> Self {
        Self { targets }
    }

    /// Files covered by this request, in check order.
    #[must_use]
    pub fn targets(&self) -> &[(FileId, PathBuf)] {
        &self.targets
    }

    /// Check every target synchronously.
    ///
    /// Stops at the first error other than "not found"; files classified
    /// before that point are still reported.
    #[must_use]
    pub fn run(&self) -> CheckResult {
        let mut result = CheckResult::default();

        for (id, path) in &self.targets {
            match fs::metadata(path) {
                Ok(_) => result.existing.push(*id),
                Err(e) if e.kind() == io::ErrorKind::NotFound => result.missing.push(*id),
                Err(e) => {
                    log::debug!("Existence check failed for {}: {}", path.display(), e);
                    result.error = Some(format!("stat {}: {}", path.display(), e));
                    break;
                }
            }
        }

        log::trace!(
            "Existence check done: {} present, {} missing",
            result.existing.len(),
            result.missing.len()
        );
        result
    }
}

/// Outcome of one existence check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    existing: Vec<FileId>,
    missing: Vec<FileId>,
    error: Option<String>,
}

impl CheckResult {
    /// Create a result from its three parts.
    #[must_use]
    pub fn new(existing: Vec<FileId>, missing: Vec<FileId>, error: Option<String>) -> Self {
        Self {
            existing,
            missing,
            error,
        }
    }

    /// Files confirmed to exist.
    #[must_use]
    pub fn existing(&self) -> &[FileId] {
        &self.existing
    }

    /// Files confirmed not to exist.
    #[must_use]
    pub fn missing(&self) -> &[FileId] {
        &self.missing
    }

    /// I/O failure other than "not found" that stopped the check.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Spawns existence checks on worker threads.
///
/// Cloning the checker shares the same result channel.
#[derive(Debug, Clone)]
pub struct ExistenceChecker {
    tx: Sender<CheckResult>,
}

impl ExistenceChecker {
    /// Create a checker together with the receiving end of its results.
    #[must_use]
    pub fn channel() -> (Self, Receiver<CheckResult>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Run `request` on a new worker thread.
    ///
    /// Returns immediately. The result is sent once the check completes; if
    /// the receiver is gone by then the result is dropped.
    pub fn spawn(&self, request: CheckRequest) {
        let tx = self.tx.clone();
        log::debug!("Issuing existence check for {} file(s)", request.targets.len());

        let spawned = thread::Builder::new()
            .name("existence-check".to_string())
            .spawn(move || {
                let result = request.run();
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            log::warn!("Failed to spawn existence check: {}", e);
        }
    }
}
