//! TUI application state.
//!
//! # Overview
//!
//! [`App`] wraps a [`ReviewSession`] with the presentation state the review
//! model does not care about: theme, keybindings, accessible borders and
//! whether the full help is shown. Key presses arrive as [`Action`]s; all
//! but [`Action::ToggleHelp`] are forwarded to the session as review input.
//!
//! The `App` is owned by the event loop thread. Worker threads never touch
//! it; their results come back through [`App::handle_check_result`].
//!
//! # Example
//!
//! ```
//! use dupesweep::parser::parse_collisions;
//! use dupesweep::review::ReviewState;
//! use dupesweep::tui::{Action, App};
//!
//! let set = parse_collisions("h1\n  a\n  b\nh2\n  c\n").unwrap();
//! let (mut app, _initial_check) = App::start(ReviewState::from_collision_set(&set).unwrap());
//!
//! app.handle_action(Action::ToggleSelect);
//! let check = app.handle_action(Action::NextCollision);
//! assert!(check.is_some());
//! assert_eq!(app.state().cursor(), 1);
//! ```

use std::str::FromStr;

use super::keybindings::KeyBindings;
use super::theme::Theme;
use crate::review::{
    CheckRequest, CheckResult, Input, ReviewSession, ReviewState, SessionEvent, SessionStatus,
};

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Highlight the previous file
    NavigateUp,
    /// Highlight the next file
    NavigateDown,
    /// Show the next collision
    NextCollision,
    /// Show the previous collision
    PreviousCollision,
    /// Flip keep/delete on the highlighted file
    ToggleSelect,
    /// Keep the highlighted file and drop the rest of its collision
    KeepOnly,
    /// Accept the choices and apply them
    Confirm,
    /// Leave without touching any file
    Quit,
    /// Show or hide the full help
    ToggleHelp,
}

impl Action {
    /// Configuration names of all actions, in help order.
    #[must_use]
    pub fn all_names() -> &'static [&'static str] {
        &[
            "navigate_up",
            "navigate_down",
            "previous_collision",
            "next_collision",
            "toggle_select",
            "keep_only",
            "confirm",
            "quit",
            "toggle_help",
        ]
    }

    /// All actions, in help order.
    #[must_use]
    pub fn all() -> &'static [Action] {
        &[
            Self::NavigateUp,
            Self::NavigateDown,
            Self::PreviousCollision,
            Self::NextCollision,
            Self::ToggleSelect,
            Self::KeepOnly,
            Self::Confirm,
            Self::Quit,
            Self::ToggleHelp,
        ]
    }

    /// Configuration name of this action.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NavigateUp => "navigate_up",
            Self::NavigateDown => "navigate_down",
            Self::NextCollision => "next_collision",
            Self::PreviousCollision => "previous_collision",
            Self::ToggleSelect => "toggle_select",
            Self::KeepOnly => "keep_only",
            Self::Confirm => "confirm",
            Self::Quit => "quit",
            Self::ToggleHelp => "toggle_help",
        }
    }

    /// Short label for the help line.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NavigateUp => "up",
            Self::NavigateDown => "down",
            Self::NextCollision => "next",
            Self::PreviousCollision => "prev",
            Self::ToggleSelect => "toggle",
            Self::KeepOnly => "keep only this",
            Self::Confirm => "confirm",
            Self::Quit => "quit",
            Self::ToggleHelp => "help",
        }
    }

    /// Review input for this action, if it is one.
    #[must_use]
    pub fn as_input(&self) -> Option<Input> {
        match self {
            Self::NavigateUp => Some(Input::PrevFile),
            Self::NavigateDown => Some(Input::NextFile),
            Self::NextCollision => Some(Input::NextCollision),
            Self::PreviousCollision => Some(Input::PrevCollision),
            Self::ToggleSelect => Some(Input::Toggle),
            Self::KeepOnly => Some(Input::KeepOnlyCurrent),
            Self::Confirm => Some(Input::Confirm),
            Self::Quit => Some(Input::Quit),
            Self::ToggleHelp => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|a| a.name() == normalized)
            .ok_or(())
    }
}

/// TUI application state.
#[derive(Debug)]
pub struct App {
    session: ReviewSession,
    keybindings: KeyBindings,
    theme: Theme,
    accessible: bool,
    dry_run: bool,
    show_help: bool,
}

impl App {
    /// Start an app over `state`.
    ///
    /// Returns the app together with the existence check for the first
    /// collision, which the caller must issue.
    #[must_use]
    pub fn start(state: ReviewState) -> (Self, CheckRequest) {
        let (session, initial) = ReviewSession::start(state);
        let app = Self {
            session,
            keybindings: KeyBindings::default(),
            theme: Theme::default(),
            accessible: false,
            dry_run: false,
            show_help: false,
        };
        (app, initial)
    }

    /// Use these keybindings.
    #[must_use]
    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    /// Use this theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Draw ASCII borders and symbols.
    #[must_use]
    pub fn with_accessible(mut self, accessible: bool) -> Self {
        self.accessible = accessible;
        self
    }

    /// Mark the session as a dry run in the header.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Apply a user action.
    ///
    /// Returns the existence check to issue when the shown collision
    /// changed.
    pub fn handle_action(&mut self, action: Action) -> Option<CheckRequest> {
        log::trace!("Action: {}", action);
        match action.as_input() {
            Some(input) => self.session.handle(SessionEvent::Input(input)),
            None => {
                self.show_help = !self.show_help;
                None
            }
        }
    }

    /// Apply a finished existence check.
    pub fn handle_check_result(&mut self, result: CheckResult) {
        self.session.handle(SessionEvent::CheckCompleted(result));
    }

    /// End the session without confirming.
    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Whether the event loop should stop.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.session.is_finished()
    }

    /// Session lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Current review state.
    #[must_use]
    pub fn state(&self) -> &ReviewState {
        self.session.state()
    }

    /// Active keybindings.
    #[must_use]
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Active theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether ASCII borders and symbols are used.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Whether this is a dry run.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether the full help is shown.
    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Consume the app and hand out the final review state.
    #[must_use]
    pub fn into_state(self) -> ReviewState {
        self.session.into_state()
    }
}
