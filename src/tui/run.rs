//! TUI main loop.
//!
//! # Terminal Management
//!
//! The TUI takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Event Loop
//!
//! Each iteration:
//! 1. Checks the shutdown flag
//! 2. Applies every existence-check result that has arrived
//! 3. Renders the current state
//! 4. Polls for one user action and applies it, issuing a new check when
//!    the shown collision changed
//! 5. Limits the frame rate to ~60 FPS
//!
//! Only this loop mutates the review state. Checks run on worker threads
//! and report back over a channel drained without blocking.

use std::io::{self, Stdout};
use std::panic;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use thiserror::Error;

use super::app::App;
use super::events::{ActionSource, EventHandler};
use super::ui::render;
use crate::review::{CheckRequest, CheckResult, ExistenceChecker};
use crate::signal::ShutdownHandler;

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout: Use the frame duration for responsive rendering.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),

    /// The TUI was interrupted by a shutdown signal.
    #[error("interrupted by shutdown signal")]
    Interrupted,
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Run the interactive review on the real terminal.
///
/// `initial` is the existence check returned by [`App::start`]. On return
/// the app's session has ended: confirmed, quit, or cancelled by an error or
/// signal.
///
/// # Errors
///
/// Returns `TuiError::Io` or `TuiError::Event` for terminal failures and
/// `TuiError::Interrupted` if the shutdown flag was raised.
pub fn run_tui(
    app: &mut App,
    initial: CheckRequest,
    shutdown: Option<&ShutdownHandler>,
) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let result = setup_terminal().and_then(|mut terminal| {
        let mut events = EventHandler::with_keybindings(app.keybindings().clone());
        let result = run_loop(&mut terminal, app, &mut events, initial, shutdown);
        restore_terminal();
        result
    });

    // Drops our hook; the default hook is back in place, not the one taken above.
    let _ = panic::take_hook();

    if result.is_err() {
        app.cancel();
    }
    result
}

/// Drive `app` until its session ends.
///
/// Generic over the backend and the action source so the loop can run
/// against a test terminal with scripted input.
///
/// # Errors
///
/// Returns an error if drawing or reading input fails, or
/// `TuiError::Interrupted` once `shutdown` is raised. The session is
/// cancelled in every error case.
pub fn run_loop<B: Backend, S: ActionSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: &mut S,
    initial: CheckRequest,
    shutdown: Option<&ShutdownHandler>,
) -> TuiResult<()> {
    let (checker, results) = ExistenceChecker::channel();
    checker.spawn(initial);

    let mut last_render = Instant::now();

    let outcome = loop {
        if shutdown.is_some_and(ShutdownHandler::is_shutdown_requested) {
            log::info!("Shutdown signal received, leaving review");
            break Err(TuiError::Interrupted);
        }

        drain_check_results(app, &results);

        if app.should_quit() {
            log::debug!("Session finished: {:?}", app.status());
            break Ok(());
        }

        if let Err(e) = terminal.draw(|frame| render(frame, app)) {
            break Err(e.into());
        }

        match source.next_action(POLL_TIMEOUT) {
            Ok(Some(action)) => {
                if let Some(request) = app.handle_action(action) {
                    checker.spawn(request);
                }
            }
            Ok(None) => {}
            Err(e) => break Err(e.into()),
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    };

    if outcome.is_err() {
        app.cancel();
    }
    outcome
}

/// Apply every check result already waiting, without blocking.
///
/// Returns how many results were applied.
pub fn drain_check_results(app: &mut App, results: &Receiver<CheckResult>) -> usize {
    let mut applied = 0;
    while let Ok(result) = results.try_recv() {
        app.handle_check_result(result);
        applied += 1;
    }
    if applied > 0 {
        log::trace!("Applied {} existence check result(s)", applied);
    }
    applied
}

/// Set up the terminal for TUI mode.
fn setup_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
        restore_terminal();
        return Err(e.into());
    }

    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            restore_terminal();
            Err(e.into())
        }
    }
}

/// Restore the terminal to its original state. Best effort.
fn restore_terminal() {
    log::debug!("Restoring terminal");
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{Collision, FileChoice, FileId, ReviewState, SessionStatus};
    use crate::tui::events::EventError;
    use crate::tui::Action;
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;
    use std::sync::mpsc;

    /// Replays a fixed list of actions, then reports a broken terminal.
    struct Scripted(VecDeque<Action>);

    impl ActionSource for Scripted {
        fn next_action(&mut self, _timeout: Duration) -> Result<Option<Action>, EventError> {
            self.0
                .pop_front()
                .map(Some)
                .ok_or_else(|| EventError::Io(io::Error::other("script exhausted")))
        }
    }

    fn app(names: &[&str]) -> (App, CheckRequest) {
        let files = names.iter().map(|n| FileChoice::new(*n)).collect();
        App::start(ReviewState::new(vec![Collision::new("h1", files).unwrap()]).unwrap())
    }

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(60, 20)).unwrap()
    }

    #[test]
    fn test_tui_error_display() {
        let tui_err = TuiError::Io(io::Error::other("test error"));
        assert!(tui_err.to_string().contains("terminal I/O error"));
        assert!(TuiError::Interrupted.to_string().contains("interrupted"));
    }

    #[test]
    fn test_loop_runs_until_confirm() {
        let (mut app, initial) = app(&["/nonexistent/a", "/nonexistent/b"]);
        let mut script = Scripted(VecDeque::from([
            Action::NavigateDown,
            Action::ToggleSelect,
            Action::Confirm,
        ]));

        run_loop(&mut terminal(), &mut app, &mut script, initial, None).unwrap();

        assert_eq!(app.status(), SessionStatus::Confirmed);
        let state = app.into_state();
        assert!(state.collisions()[0].files()[0].is_selected());
        assert!(!state.collisions()[0].files()[1].is_selected());
    }

    #[test]
    fn test_loop_quit_leaves_unconfirmed() {
        let (mut app, initial) = app(&["/a"]);
        let mut script = Scripted(VecDeque::from([Action::ToggleSelect, Action::Quit]));

        run_loop(&mut terminal(), &mut app, &mut script, initial, None).unwrap();

        assert_eq!(app.status(), SessionStatus::Cancelled);
        assert!(!app.into_state().is_confirmed());
    }

    #[test]
    fn test_loop_input_failure_cancels() {
        let (mut app, initial) = app(&["/a"]);
        let mut script = Scripted(VecDeque::new());

        let result = run_loop(&mut terminal(), &mut app, &mut script, initial, None);

        assert!(matches!(result, Err(TuiError::Event(_))));
        assert_eq!(app.status(), SessionStatus::Cancelled);
    }

    #[test]
    fn test_loop_shutdown_request_cancels() {
        let (mut app, initial) = app(&["/a"]);
        let mut script = Scripted(VecDeque::from([Action::Confirm]));
        let shutdown = ShutdownHandler::new();
        shutdown.request_shutdown();

        let result = run_loop(&mut terminal(), &mut app, &mut script, initial, Some(&shutdown));

        assert!(matches!(result, Err(TuiError::Interrupted)));
        assert_eq!(app.status(), SessionStatus::Cancelled);
        assert!(!app.into_state().is_confirmed());
    }

    #[test]
    fn test_drain_applies_all_pending_results() {
        let (mut app, _) = app(&["/a", "/b"]);
        let (tx, rx) = mpsc::channel();
        tx.send(CheckResult::new(vec![], vec![FileId::new(0, 0)], None))
            .unwrap();
        tx.send(CheckResult::new(
            vec![],
            vec![FileId::new(0, 1)],
            Some("stat /b: boom".to_string()),
        ))
        .unwrap();

        assert_eq!(drain_check_results(&mut app, &rx), 2);
        assert_eq!(drain_check_results(&mut app, &rx), 0);

        let files = app.state().collisions()[0].files();
        assert!(!files[0].is_valid());
        assert!(!files[1].is_valid());
        assert_eq!(app.state().errors(), ["stat /b: boom".to_string()]);
    }
}
