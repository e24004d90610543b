//! Review state machine.
//!
//! A [`ReviewSession`] starts in [`SessionStatus::Reviewing`] and ends exactly
//! once, in either [`SessionStatus::Confirmed`] or [`SessionStatus::Cancelled`].
//! Every mutation of the review state goes through [`ReviewSession::handle`],
//! which the single-threaded event loop calls for both user input and
//! existence-check results.

use super::check::{CheckRequest, CheckResult};
use super::model::ReviewState;

/// Lifecycle of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Accepting input.
    #[default]
    Reviewing,
    /// The user confirmed their choices.
    Confirmed,
    /// The user quit, or the interface closed some other way.
    Cancelled,
}

impl SessionStatus {
    /// Whether the session has ended.
    #[must_use]
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Reviewing)
    }
}

/// Review input that may touch the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Show the next collision.
    NextCollision,
    /// Show the previous collision.
    PrevCollision,
    /// Highlight the next file.
    NextFile,
    /// Highlight the previous file.
    PrevFile,
    /// Flip keep/delete on the highlighted file.
    Toggle,
    /// Keep the highlighted file, delete the rest of its collision.
    KeepOnlyCurrent,
    /// Accept all choices and end the session.
    Confirm,
    /// End the session without deleting anything.
    Quit,
}

/// Discrete event consumed by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// User input.
    Input(Input),
    /// An existence check completed.
    CheckCompleted(CheckResult),
}

/// Stateful driver over a [`ReviewState`].
#[derive(Debug, Clone)]
pub struct ReviewSession {
    state: ReviewState,
    status: SessionStatus,
}

impl ReviewSession {
    /// Start a session over `state`.
    ///
    /// Returns the session together with the existence check for the
    /// initially shown collision.
    #[must_use]
    pub fn start(state: ReviewState) -> (Self, CheckRequest) {
        let initial = state.check_current_collision();
        let session = Self {
            state,
            status: SessionStatus::Reviewing,
        };
        (session, initial)
    }

    /// Current review state.
    #[must_use]
    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the session has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Process one event.
    ///
    /// Returns the existence check to issue when the viewed collision
    /// changed. Events arriving after the session ended are ignored.
    pub fn handle(&mut self, event: SessionEvent) -> Option<CheckRequest> {
        if self.is_finished() {
            log::trace!("Ignoring {:?} after session end", event);
            return None;
        }

        match event {
            SessionEvent::Input(input) => self.handle_input(input),
            SessionEvent::CheckCompleted(result) => {
                self.state.apply_check(&result);
                None
            }
        }
    }

    fn handle_input(&mut self, input: Input) -> Option<CheckRequest> {
        log::trace!("Handling input: {:?}", input);

        match input {
            Input::NextCollision => {
                self.state.next_collision();
                Some(self.state.check_current_collision())
            }
            Input::PrevCollision => {
                self.state.prev_collision();
                Some(self.state.check_current_collision())
            }
            Input::NextFile => {
                self.state.next_file();
                None
            }
            Input::PrevFile => {
                self.state.prev_file();
                None
            }
            Input::Toggle => {
                self.state.toggle_current_file();
                None
            }
            Input::KeepOnlyCurrent => {
                self.state.keep_only_current_file();
                None
            }
            Input::Confirm => {
                self.state.confirm();
                self.finish(SessionStatus::Confirmed);
                None
            }
            Input::Quit => {
                self.finish(SessionStatus::Cancelled);
                None
            }
        }
    }

    /// End the session as cancelled, if it is still running.
    ///
    /// Used when the interface closes without an explicit quit.
    pub fn cancel(&mut self) {
        if !self.is_finished() {
            self.finish(SessionStatus::Cancelled);
        }
    }

    fn finish(&mut self, status: SessionStatus) {
        log::debug!("Session transition: {:?} -> {:?}", self.status, status);
        self.status = status;
    }

    /// Consume the session and hand out the final review state.
    ///
    /// The state is confirmed only if the session ended with a confirm.
    #[must_use]
    pub fn into_state(self) -> ReviewState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::model::{Collision, FileChoice, FileId};

    fn session() -> (ReviewSession, CheckRequest) {
        let collisions = vec![
            Collision::new("h1", vec![FileChoice::new("/a"), FileChoice::new("/b")]).unwrap(),
            Collision::new("h2", vec![FileChoice::new("/c")]).unwrap(),
        ];
        ReviewSession::start(ReviewState::new(collisions).unwrap())
    }

    fn input(session: &mut ReviewSession, input: Input) -> Option<CheckRequest> {
        session.handle(SessionEvent::Input(input))
    }

    #[test]
    fn test_start_issues_initial_check() {
        let (session, initial) = session();
        assert_eq!(session.status(), SessionStatus::Reviewing);
        assert_eq!(initial.targets().len(), 2);
        assert_eq!(initial.targets()[0].0, FileId::new(0, 0));
    }

    #[test]
    fn test_collision_moves_issue_checks() {
        let (mut session, _) = session();

        let check = input(&mut session, Input::NextCollision).unwrap();
        assert_eq!(check.targets()[0].0, FileId::new(1, 0));

        let check = input(&mut session, Input::PrevCollision).unwrap();
        assert_eq!(check.targets()[0].0, FileId::new(0, 0));
    }

    #[test]
    fn test_file_moves_and_toggles_issue_no_checks() {
        let (mut session, _) = session();
        assert!(input(&mut session, Input::NextFile).is_none());
        assert!(input(&mut session, Input::PrevFile).is_none());
        assert!(input(&mut session, Input::Toggle).is_none());
        assert!(input(&mut session, Input::KeepOnlyCurrent).is_none());
    }

    #[test]
    fn test_confirm_ends_session() {
        let (mut session, _) = session();
        input(&mut session, Input::Confirm);

        assert_eq!(session.status(), SessionStatus::Confirmed);
        assert!(session.into_state().is_confirmed());
    }

    #[test]
    fn test_quit_ends_session_unconfirmed() {
        let (mut session, _) = session();
        input(&mut session, Input::Toggle);
        input(&mut session, Input::Quit);

        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert!(!session.into_state().is_confirmed());
    }

    #[test]
    fn test_events_after_end_are_ignored() {
        let (mut session, _) = session();
        input(&mut session, Input::Quit);

        assert!(input(&mut session, Input::NextCollision).is_none());
        input(&mut session, Input::Confirm);
        session.handle(SessionEvent::CheckCompleted(CheckResult::new(
            vec![],
            vec![FileId::new(0, 0)],
            None,
        )));

        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert_eq!(session.state().cursor(), 0);
        assert!(session.state().current_file().is_valid());
        assert!(!session.state().is_confirmed());
    }

    #[test]
    fn test_check_result_does_not_end_session_or_move_cursor() {
        let (mut session, _) = session();
        input(&mut session, Input::NextFile);

        let follow_up = session.handle(SessionEvent::CheckCompleted(CheckResult::new(
            vec![FileId::new(0, 0)],
            vec![FileId::new(0, 1)],
            Some("stat /b: permission denied".to_string()),
        )));

        assert!(follow_up.is_none());
        assert_eq!(session.status(), SessionStatus::Reviewing);
        assert_eq!(session.state().current_collision().cursor(), 1);
        assert!(!session.state().current_file().is_valid());
        assert_eq!(session.state().errors().len(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent_after_confirm() {
        let (mut session, _) = session();
        input(&mut session, Input::Confirm);
        session.cancel();
        assert_eq!(session.status(), SessionStatus::Confirmed);
    }
}
