//! dupesweep - interactive review of duplicate-file reports.
//!
//! Reads the collision report written by a duplicate finder, walks the user
//! through every collision in a terminal UI, and after confirmation removes
//! exactly the files they deselected.
//!
//! The pipeline:
//! - [`parser`]: report text to an ordered [`parser::CollisionSet`]
//! - [`review`]: the review model, existence checks and session state machine
//! - [`tui`]: terminal front end driving a review session
//! - [`actions`]: applying the decisions of a confirmed review

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;
pub mod review;
pub mod signal;
pub mod tui;

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};

use crate::actions::{apply_decisions, DeleteConfig, PermanentRemover, StreamReporter};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::parser::{parse_reader, CollisionSet};
use crate::review::{ReviewError, ReviewState};
use crate::tui::{run_tui, App, KeyBindings, Theme};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if configuration, the report, or the terminal fails.
/// An interrupted session surfaces as a [`tui::TuiError::Interrupted`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref()).context("while loading configuration")?;
    config.apply_cli(&cli);

    let keybindings =
        KeyBindings::from_profile_with_custom(config.keybinding_profile, &config.keybindings)
            .context("while loading keybindings")?;

    let set = read_report(&cli)?;
    log::info!(
        "Loaded {} collision(s) covering {} file(s)",
        set.len(),
        set.file_count()
    );

    let state = match ReviewState::from_collision_set(&set) {
        Ok(state) => state,
        Err(e @ ReviewError::NothingToReview) => {
            eprintln!("{e}");
            return Ok(ExitCode::Success);
        }
    };

    let shutdown = signal::install_handler().context("while installing signal handler")?;

    let (app, initial) = App::start(state);
    let mut app = app
        .with_keybindings(keybindings)
        .with_theme(Theme::from_arg(config.theme))
        .with_accessible(config.accessible)
        .with_dry_run(cli.dry_run);

    run_tui(&mut app, initial, Some(&shutdown)).context("while running the review")?;

    let state = app.into_state();
    if !state.is_confirmed() {
        log::info!("Review cancelled; no files touched");
        return Ok(ExitCode::Success);
    }

    let delete_config = DeleteConfig {
        dry_run: cli.dry_run,
    };
    let mut reporter = StreamReporter::new(io::stderr().lock());
    let report = apply_decisions(
        &state,
        &PermanentRemover,
        &delete_config,
        Some(&mut reporter),
    );

    if report.all_succeeded() {
        Ok(ExitCode::Success)
    } else {
        log::warn!("{}", report.summary());
        Ok(ExitCode::PartialSuccess)
    }
}

/// Read and parse the report named on the command line.
fn read_report(cli: &Cli) -> Result<CollisionSet> {
    if cli.reads_stdin() {
        return parse_reader(io::stdin().lock()).context("while parsing report from stdin");
    }

    let file = File::open(&cli.file)
        .with_context(|| format!("while opening file {}", cli.file.display()))?;
    parse_reader(BufReader::new(file))
        .with_context(|| format!("while parsing {}", cli.file.display()))
}
