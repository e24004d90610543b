//! Application configuration management.
//!
//! Settings are merged from several layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. the TOML config file
//! 3. `DUPESWEEP_*` environment variables
//! 4. command-line flags
//!
//! The config file lives in the platform config directory unless
//! `--config` names another one.
//!
//! ```toml
//! theme = "light"
//! keybinding_profile = "vim"
//! accessible = false
//!
//! [keybindings]
//! keep_only = ["x"]
//! quit = ["q", "Ctrl+q"]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, ThemeArg};
use crate::tui::keybindings::KeybindingProfile;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DUPESWEEP_";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A config file named on the command line does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("invalid configuration: {0}")]
    Invalid(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Invalid(Box::new(e))
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred TUI theme.
    pub theme: ThemeArg,

    /// Keybinding profile the custom bindings are merged over.
    pub keybinding_profile: KeybindingProfile,

    /// ASCII borders and symbols instead of Unicode box drawing.
    pub accessible: bool,

    /// Extra bindings: action name to key specifications.
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Config {
    /// Load the configuration.
    ///
    /// With `path` set the file must exist; otherwise the default location
    /// is used and a missing file just means defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for a missing explicit file and
    /// [`ConfigError::Invalid`] when any layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let config: Self = Self::figment(file.as_deref()).extract()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Build the layered figment: defaults, then `file`, then environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Default platform-specific config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupesweep", "dupesweep")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line flags on top of the loaded layers.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(theme) = cli.theme {
            self.theme = theme;
        }
        if let Some(profile) = cli.keybinding_profile {
            self.keybinding_profile = profile;
        }
        if cli.accessible {
            self.accessible = true;
        }
    }
}
