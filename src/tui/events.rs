//! TUI event handling with crossterm.
//!
//! Terminal events are polled with a timeout so the loop can also drain
//! existence-check results and watch the shutdown flag. Key presses are
//! translated to [`Action`]s through the active [`KeyBindings`]; resize
//! events need no action since every frame is redrawn in full.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};

use super::keybindings::KeyBindings;
use super::Action;

/// Error type for event handling.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Polling or reading the terminal failed.
    #[error("failed to read terminal event: {0}")]
    Io(#[from] io::Error),
}

/// Something that yields user actions.
///
/// The event loop depends on this rather than on the terminal directly.
pub trait ActionSource {
    /// Wait up to `timeout` for the next action.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input fails.
    fn next_action(&mut self, timeout: Duration) -> Result<Option<Action>, EventError>;
}

/// Reads key events from the terminal.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    keybindings: KeyBindings,
}

impl EventHandler {
    /// Create a handler with the default keybindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler resolving keys through `keybindings`.
    #[must_use]
    pub fn with_keybindings(keybindings: KeyBindings) -> Self {
        Self { keybindings }
    }

    /// Wait up to `timeout` for an event and translate it.
    ///
    /// Returns `Ok(None)` on timeout and for events that map to no action.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Io`] if the terminal cannot be read.
    pub fn poll(&self, timeout: Duration) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(self.translate(&event::read()?))
    }

    /// Translate one terminal event.
    #[must_use]
    pub fn translate(&self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => {
                let action = self.keybindings.resolve(key);
                if action.is_none() {
                    log::trace!("Unbound key: {:?}", key);
                }
                action
            }
            _ => None,
        }
    }
}

impl ActionSource for EventHandler {
    fn next_action(&mut self, timeout: Duration) -> Result<Option<Action>, EventError> {
        self.poll(timeout)
    }
}
