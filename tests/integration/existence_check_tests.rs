use dupesweep::parser::parse_collisions;
use dupesweep::review::{
    CheckRequest, ExistenceChecker, FileId, Input, ReviewSession, ReviewState, SessionEvent,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn session_over(report: &str) -> (ReviewSession, CheckRequest) {
    let set = parse_collisions(report).unwrap();
    ReviewSession::start(ReviewState::from_collision_set(&set).unwrap())
}

#[test]
fn test_run_classifies_existing_and_missing() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("present");
    fs::write(&present, b"x").unwrap();
    let absent = dir.path().join("absent");

    let request = CheckRequest::new(vec![
        (FileId::new(0, 0), present),
        (FileId::new(0, 1), absent),
    ]);
    let result = request.run();

    assert_eq!(result.existing(), [FileId::new(0, 0)]);
    assert_eq!(result.missing(), [FileId::new(0, 1)]);
    assert_eq!(result.error(), None);
}

#[cfg(unix)]
#[test]
fn test_run_stops_at_first_unexpected_error() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file");
    fs::write(&file, b"x").unwrap();
    // A regular file used as a directory fails with something other than "not found".
    let broken = file.join("child");

    let request = CheckRequest::new(vec![
        (FileId::new(0, 0), file.clone()),
        (FileId::new(0, 1), broken.clone()),
        (FileId::new(0, 2), file),
    ]);
    let result = request.run();

    assert_eq!(result.existing(), [FileId::new(0, 0)]);
    assert!(result.missing().is_empty());
    let message = result.error().unwrap();
    assert!(message.starts_with(&format!("stat {}", broken.display())));
}

#[test]
fn test_checker_delivers_results_over_channel() {
    let dir = TempDir::new().unwrap();
    let present = dir.path().join("present");
    fs::write(&present, b"x").unwrap();

    let (checker, results) = ExistenceChecker::channel();
    checker.spawn(CheckRequest::new(vec![(FileId::new(2, 1), present)]));

    let result = results.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(result.existing(), [FileId::new(2, 1)]);
}

#[test]
fn test_initial_check_covers_first_collision() {
    let (_session, initial) = session_over("h1\n  /x\n  /y\nh2\n  /z\n");
    let targets: Vec<(FileId, PathBuf)> = initial.targets().to_vec();
    assert_eq!(
        targets,
        vec![
            (FileId::new(0, 0), PathBuf::from("/x")),
            (FileId::new(0, 1), PathBuf::from("/y")),
        ]
    );
}

#[test]
fn test_stale_results_update_their_own_collision() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("kept");
    fs::write(&kept, b"x").unwrap();
    let gone_a = dir.path().join("gone_a");
    let gone_b = dir.path().join("gone_b");
    let report = format!(
        "h1\n  {}\n  {}\nh2\n  {}\n",
        kept.display(),
        gone_a.display(),
        gone_b.display()
    );

    let (mut session, first) = session_over(&report);
    let second = session
        .handle(SessionEvent::Input(Input::NextCollision))
        .unwrap();

    // Results applied newest first, after the user moved on.
    session.handle(SessionEvent::CheckCompleted(second.run()));
    session.handle(SessionEvent::CheckCompleted(first.run()));

    let state = session.state();
    assert_eq!(state.cursor(), 1);
    assert!(state.file(FileId::new(0, 0)).unwrap().is_valid());
    assert!(!state.file(FileId::new(0, 1)).unwrap().is_valid());
    assert!(!state.file(FileId::new(1, 0)).unwrap().is_valid());
}

#[test]
fn test_concurrent_checks_all_arrive() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..4).map(|i| dir.path().join(format!("f{i}"))).collect();
    fs::write(&paths[0], b"x").unwrap();
    fs::write(&paths[3], b"x").unwrap();
    let report: String = paths
        .iter()
        .enumerate()
        .map(|(i, p)| format!("h{i}\n  {}\n", p.display()))
        .collect();

    let (mut session, initial) = session_over(&report);
    let (checker, results) = ExistenceChecker::channel();
    checker.spawn(initial);
    for _ in 0..3 {
        let request = session
            .handle(SessionEvent::Input(Input::NextCollision))
            .unwrap();
        checker.spawn(request);
    }
    drop(checker);

    for result in results.iter().take(4) {
        session.handle(SessionEvent::CheckCompleted(result));
    }

    let valid: Vec<bool> = session
        .state()
        .collisions()
        .iter()
        .map(|c| c.files()[0].is_valid())
        .collect();
    assert_eq!(valid, vec![true, false, false, true]);
}

#[test]
fn test_check_errors_are_deduplicated() {
    let (mut session, _) = session_over("h1\n  /x\n");
    let failing = dupesweep::review::CheckResult::new(vec![], vec![], Some("stat /x: boom".into()));

    session.handle(SessionEvent::CheckCompleted(failing.clone()));
    session.handle(SessionEvent::CheckCompleted(failing));

    assert_eq!(session.state().errors(), ["stat /x: boom".to_string()]);
}
