use dupesweep::actions::{
    apply_decisions, DeleteConfig, DeleteOutcome, PermanentRemover, StreamReporter,
};
use dupesweep::parser::parse_collisions;
use dupesweep::review::{Input, ReviewSession, ReviewState, SessionEvent};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two collisions over real files: `{a, b}` and `{c, d}`.
fn setup() -> (TempDir, Vec<PathBuf>) {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = ["a.txt", "b.txt", "c.txt", "d.txt"]
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            fs::write(&path, b"same content").unwrap();
            path
        })
        .collect();
    (dir, paths)
}

fn report(paths: &[PathBuf]) -> String {
    format!(
        "1111\n  {}\n  {}\n2222\n  {}\n  {}\n",
        paths[0].display(),
        paths[1].display(),
        paths[2].display(),
        paths[3].display()
    )
}

fn review(report: &str, inputs: &[Input]) -> ReviewState {
    let set = parse_collisions(report).unwrap();
    let (mut session, _) = ReviewSession::start(ReviewState::from_collision_set(&set).unwrap());
    for input in inputs {
        session.handle(SessionEvent::Input(*input));
    }
    session.into_state()
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

#[test]
fn test_quit_deletes_nothing() {
    let (_dir, paths) = setup();
    let state = review(
        &report(&paths),
        &[Input::Toggle, Input::NextCollision, Input::KeepOnlyCurrent, Input::Quit],
    );

    let report = apply_decisions::<_, StreamReporter<Vec<u8>>>(
        &state,
        &PermanentRemover,
        &DeleteConfig::default(),
        None,
    );

    assert!(report.is_empty());
    assert!(paths.iter().all(|p| exists(p)));
}

#[test]
fn test_confirm_deletes_exactly_the_deselected_files() {
    let (_dir, paths) = setup();
    let state = review(
        &report(&paths),
        &[
            Input::NextFile,
            Input::Toggle,
            Input::NextCollision,
            Input::KeepOnlyCurrent,
            Input::Confirm,
        ],
    );

    let report = apply_decisions::<_, StreamReporter<Vec<u8>>>(
        &state,
        &PermanentRemover,
        &DeleteConfig::default(),
        None,
    );

    assert!(exists(&paths[0]));
    assert!(!exists(&paths[1]));
    assert!(exists(&paths[2]));
    assert!(!exists(&paths[3]));
    assert_eq!(report.removed_count(), 2);
    assert_eq!(report.kept_count(), 2);
    assert!(report.all_succeeded());
}

#[test]
fn test_confirm_without_changes_keeps_everything() {
    let (_dir, paths) = setup();
    let state = review(&report(&paths), &[Input::Confirm]);

    let mut reporter = StreamReporter::new(Vec::new());
    let report = apply_decisions(
        &state,
        &PermanentRemover,
        &DeleteConfig::default(),
        Some(&mut reporter),
    );

    assert_eq!(report.kept_count(), 4);
    assert!(paths.iter().all(|p| exists(p)));
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(output.lines().count(), 4);
    assert!(output.lines().all(|l| l.starts_with("kept ")));
}

#[test]
fn test_failed_removal_does_not_stop_the_rest() {
    let (_dir, paths) = setup();
    let state = review(
        &report(&paths),
        &[
            Input::Toggle,
            Input::NextCollision,
            Input::Toggle,
            Input::Confirm,
        ],
    );
    // Vanishes after the review but before removal.
    fs::remove_file(&paths[0]).unwrap();

    let mut reporter = StreamReporter::new(Vec::new());
    let report = apply_decisions(
        &state,
        &PermanentRemover,
        &DeleteConfig::default(),
        Some(&mut reporter),
    );

    assert!(!exists(&paths[2]));
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.removed_count(), 1);
    assert!(matches!(report.outcomes[0].outcome, DeleteOutcome::Failed(_)));

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with(&format!("error while removing {}: ", paths[0].display())));
    assert_eq!(lines[1], format!("kept {}", paths[1].display()));
    assert_eq!(lines[2], format!("removed {}", paths[2].display()));
    assert_eq!(lines[3], format!("kept {}", paths[3].display()));
}

#[test]
fn test_dry_run_reports_without_deleting() {
    let (_dir, paths) = setup();
    let state = review(&report(&paths), &[Input::KeepOnlyCurrent, Input::Confirm]);

    let mut reporter = StreamReporter::new(Vec::new());
    let report = apply_decisions(
        &state,
        &PermanentRemover,
        &DeleteConfig::dry_run(),
        Some(&mut reporter),
    );

    assert!(paths.iter().all(|p| exists(p)));
    assert_eq!(report.removed_count(), 1);
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains(&format!("would remove {}", paths[1].display())));
}

#[test]
fn test_everything_deselected_is_honoured() {
    let (_dir, paths) = setup();
    let state = review(
        &report(&paths),
        &[
            Input::Toggle,
            Input::NextFile,
            Input::Toggle,
            Input::Confirm,
        ],
    );

    let report = apply_decisions::<_, StreamReporter<Vec<u8>>>(
        &state,
        &PermanentRemover,
        &DeleteConfig::default(),
        None,
    );

    assert!(!exists(&paths[0]));
    assert!(!exists(&paths[1]));
    assert_eq!(report.removed_count(), 2);
    assert_eq!(report.summary(), "Removed 2 file(s), kept 2");
}
