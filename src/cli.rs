//! Command-line interface definitions for dupesweep.
//!
//! # Example
//!
//! ```bash
//! # Review a report written by a duplicate finder
//! dupesweep collisions.txt
//!
//! # Read the report from stdin; keys still come from the terminal
//! finder ~/Photos | dupesweep -
//!
//! # Show what would be removed, with debug logging
//! dupesweep -v --dry-run collisions.txt
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tui::keybindings::KeybindingProfile;

/// Interactively pick which duplicate files to keep and remove the rest.
///
/// Reads a report of hash collisions, shows one collision at a time and
/// lets you deselect the copies you do not want. Nothing is removed until
/// you confirm.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Collision report to review ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Keybinding profile
    #[arg(long = "keys", value_enum, value_name = "PROFILE")]
    pub keybinding_profile: Option<KeybindingProfile>,

    /// Use ASCII borders and symbols for screen readers and basic terminals
    #[arg(long)]
    pub accessible: bool,

    /// Report what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Whether the report should be read from stdin.
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

/// Color theme selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal environment
    #[default]
    Auto,
    /// Light text on a dark background
    Dark,
    /// Dark text on a light background
    Light,
}

impl std::fmt::Display for ThemeArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeArg::Auto => write!(f, "auto"),
            ThemeArg::Dark => write!(f, "dark"),
            ThemeArg::Light => write!(f, "light"),
        }
    }
}
