//! Terminal User Interface module.
//!
//! The interactive review runs on ratatui with the crossterm backend:
//! - [`app`]: presentation state around a review session
//! - [`events`]: terminal key events translated to actions
//! - [`keybindings`]: key profiles and custom overrides
//! - [`run`]: terminal setup and the event loop
//! - [`theme`]: color palettes
//! - [`ui`]: rendering
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions
//! 3. Actions modify the App state, possibly issuing an existence check
//! 4. Check results flow back into the App on the loop thread
//! 5. The UI renders based on the current App state

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod theme;
pub mod ui;

pub use app::{Action, App};
pub use events::{ActionSource, EventError, EventHandler};
pub use keybindings::{KeyBindings, KeybindingError, KeybindingProfile};
pub use run::{run_loop, run_tui, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::{render, truncate_path, truncate_string};
