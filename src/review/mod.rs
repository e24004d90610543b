//! Interactive review engine.
//!
//! The review engine is independent of the terminal:
//! - [`model`]: collisions, file choices and their cursors
//! - [`check`]: asynchronous existence checks
//! - [`session`]: the state machine consuming input and check results
//!
//! # Example
//!
//! ```
//! use dupesweep::parser::parse_collisions;
//! use dupesweep::review::{Input, ReviewSession, ReviewState, SessionEvent};
//!
//! let set = parse_collisions("h1\n  a.txt\n  b.txt\n").unwrap();
//! let state = ReviewState::from_collision_set(&set).unwrap();
//! let (mut session, _initial_check) = ReviewSession::start(state);
//!
//! session.handle(SessionEvent::Input(Input::Toggle));
//! session.handle(SessionEvent::Input(Input::Confirm));
//!
//! let state = session.into_state();
//! assert!(state.is_confirmed());
//! assert!(!state.current_file().is_selected());
//! ```

pub mod check;
pub mod model;
pub mod session;

pub use check::{CheckRequest, CheckResult, ExistenceChecker};
pub use model::{Collision, FileChoice, FileId, ReviewError, ReviewState};
pub use session::{Input, ReviewSession, SessionEvent, SessionStatus};
