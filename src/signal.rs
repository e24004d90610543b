//! Signal handling for graceful shutdown.
//!
//! A `ctrlc` handler (with the `termination` feature, so SIGTERM and SIGHUP
//! count too) raises a shared [`ShutdownHandler`]. The review loop polls it
//! between frames and ends the session as cancelled; no file is touched and
//! the process exits with code 130.
//!
//! While the terminal is in raw mode, Ctrl+C arrives as a key press rather
//! than a signal and is handled as an ordinary quit.
//!
//! ```rust,no_run
//! use dupesweep::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! // pass `Some(&handler)` to the review loop
//! assert!(!handler.is_shutdown_requested());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
///
/// Cloning the handler shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown as if a signal had arrived.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide handler, or return the one already installed.
///
/// A repeated call resets the flag and hands out the existing handler,
/// since `ctrlc` only allows a single registration per process.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if the OS handler cannot be set.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let signalled = handler.clone();

    ctrlc::set_handler(move || {
        signalled.request_shutdown();
        log::info!("Shutdown signal received");
    })?;

    let installed = GLOBAL_HANDLER.get_or_init(|| handler);
    log::debug!("Signal handler installed");
    Ok(installed.clone())
}
