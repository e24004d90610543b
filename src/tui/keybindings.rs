//! Keybinding configuration for the TUI.
//!
//! # Profiles
//!
//! - [`KeybindingProfile::Universal`]: vim-style AND arrow keys (default)
//! - [`KeybindingProfile::Vim`]: hjkl only
//! - [`KeybindingProfile::Standard`]: arrow keys only
//!
//! All profiles share the non-navigation keys: `Space` toggles, `o` keeps
//! only the highlighted file, `Enter` confirms, `q`/`Ctrl+c`/`Esc` quit and
//! `?`/`F1` toggle the full help.
//!
//! # Example
//!
//! ```
//! use dupesweep::tui::keybindings::{KeyBindings, KeybindingProfile};
//! use dupesweep::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::from_profile(KeybindingProfile::Universal);
//!
//! let l_key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
//! let right_key = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&l_key), Some(Action::NextCollision));
//! assert_eq!(bindings.resolve(&right_key), Some(Action::NextCollision));
//! ```

use std::collections::HashMap;

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Action;

/// Keybinding profile presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingProfile {
    /// Vim-style AND arrow key navigation.
    #[default]
    Universal,

    /// Vim-style navigation using hjkl keys, no arrows.
    Vim,

    /// Arrow keys only.
    Standard,
}

impl KeybindingProfile {
    /// Get all available profiles.
    #[must_use]
    pub fn all() -> &'static [KeybindingProfile] {
        &[Self::Universal, Self::Vim, Self::Standard]
    }
}

impl std::fmt::Display for KeybindingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Universal => "universal",
            Self::Vim => "vim",
            Self::Standard => "standard",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for KeybindingProfile {
    type Err = KeybindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "universal" => Ok(Self::Universal),
            "vim" => Ok(Self::Vim),
            "standard" | "arrows" | "arrow" => Ok(Self::Standard),
            _ => Err(KeybindingError::InvalidProfile(s.to_string())),
        }
    }
}

/// Error type for keybinding operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeybindingError {
    /// Invalid profile name.
    #[error("Unknown keybinding profile: '{0}'. Valid profiles: universal, vim, standard")]
    InvalidProfile(String),

    /// Invalid key specification.
    #[error("Invalid key specification: '{0}'. Examples: 'j', 'Ctrl+c', 'Down', 'Space', 'F1'")]
    InvalidKeySpec(String),

    /// Invalid action name.
    #[error(
        "Unknown action: '{name}'.{} Valid actions: {}",
        did_you_mean(.suggestion),
        Action::all_names().join(", ")
    )]
    InvalidAction {
        /// The name as written in the configuration.
        name: String,
        /// Closest valid action name, if any is close.
        suggestion: Option<&'static str>,
    },
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    suggestion
        .map(|s| format!(" Did you mean '{s}'?"))
        .unwrap_or_default()
}

/// Maximum edit distance for an action-name suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Closest action name to `name`, if one is within a few edits.
fn suggest_action(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    Action::all_names()
        .iter()
        .map(|candidate| (strsim::levenshtein(&lower, candidate), *candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Keybinding configuration mapping actions to key events.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_profile(KeybindingProfile::Universal)
    }
}

impl KeyBindings {
    /// Create keybindings from a specific profile.
    #[must_use]
    pub fn from_profile(profile: KeybindingProfile) -> Self {
        let mut action_keys = Self::shared_bindings();

        let (vim, arrows) = match profile {
            KeybindingProfile::Universal => (true, true),
            KeybindingProfile::Vim => (true, false),
            KeybindingProfile::Standard => (false, true),
        };

        let navigation = [
            (Action::NavigateUp, 'k', KeyCode::Up),
            (Action::NavigateDown, 'j', KeyCode::Down),
            (Action::PreviousCollision, 'h', KeyCode::Left),
            (Action::NextCollision, 'l', KeyCode::Right),
        ];
        for (action, vim_key, arrow_key) in navigation {
            let keys = action_keys.entry(action).or_default();
            if arrows {
                keys.push(Self::key(arrow_key, KeyModifiers::NONE));
            }
            if vim {
                keys.push(Self::key(KeyCode::Char(vim_key), KeyModifiers::NONE));
            }
        }

        log::debug!("Loaded {} keybindings", profile);
        Self { action_keys }
    }

    /// Resolve a key event to an action.
    ///
    /// Only key presses resolve; repeats and releases return `None`.
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| Self::key_matches(k, key)))
            .map(|(action, _)| *action)
    }

    /// Compare code and modifiers.
    ///
    /// For character keys the case already carries Shift, and terminals
    /// disagree on whether they also report the modifier, so Shift is
    /// ignored there.
    fn key_matches(target: &KeyEvent, actual: &KeyEvent) -> bool {
        fn normalized(key: &KeyEvent) -> (KeyCode, KeyModifiers) {
            match key.code {
                KeyCode::Char(_) => (key.code, key.modifiers.difference(KeyModifiers::SHIFT)),
                _ => (key.code, key.modifiers),
            }
        }
        normalized(target) == normalized(actual)
    }

    /// Get the keys bound to a specific action.
    #[must_use]
    pub fn keys_for_action(&self, action: &Action) -> &[KeyEvent] {
        self.action_keys
            .get(action)
            .map_or(&[], |keys| keys.as_slice())
    }

    /// All keys for an action, formatted and joined with `/`.
    #[must_use]
    pub fn key_hint(&self, action: &Action) -> String {
        let mut names: Vec<String> = Vec::new();
        for key in self.keys_for_action(action) {
            let name = Self::format_key(key);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.join("/")
    }

    /// Format a key event as a human-readable string.
    #[must_use]
    pub fn format_key(key: &KeyEvent) -> String {
        let mut parts = Vec::new();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt");
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
            parts.push("Shift");
        }

        let key_name = match key.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => "?".to_string(),
        };

        if parts.is_empty() {
            key_name
        } else {
            parts.push(&key_name);
            parts.join("+")
        }
    }

    /// Parse a key specification string into a KeyEvent.
    ///
    /// Supports simple keys (`j`, `Space`, `Enter`, `Esc`), arrows (`Up`,
    /// `Down`, `Left`, `Right`), `PageUp`/`PageDown`/`Home`/`End`, `F1`
    /// to `F12`, and modifiers joined with `+` (`Ctrl+c`, `Alt+j`).
    ///
    /// # Errors
    ///
    /// Returns `KeybindingError::InvalidKeySpec` if the key specification
    /// cannot be parsed.
    ///
    /// # Example
    ///
    /// ```
    /// use dupesweep::tui::keybindings::KeyBindings;
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let key = KeyBindings::parse_key("Ctrl+j").unwrap();
    /// assert_eq!(key.code, KeyCode::Char('j'));
    /// assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    /// ```
    pub fn parse_key(spec: &str) -> Result<KeyEvent, KeybindingError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(KeybindingError::InvalidKeySpec(spec.to_string()));
        }

        // A lone '+' is the plus key, not a separator.
        let parts: Vec<&str> = if spec == "+" {
            vec!["+"]
        } else {
            spec.split('+').map(str::trim).collect()
        };

        let mut modifiers = KeyModifiers::NONE;
        let mut key_part = None;

        for (i, part) in parts.iter().enumerate() {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" | "option" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    if i != parts.len() - 1 {
                        return Err(KeybindingError::InvalidKeySpec(format!(
                            "'{spec}' - unexpected modifier position for '{part}'"
                        )));
                    }
                    key_part = Some(*part);
                }
            }
        }

        let key_str = key_part.ok_or_else(|| {
            KeybindingError::InvalidKeySpec(format!("'{spec}' - missing key after modifiers"))
        })?;

        let mut code = Self::parse_key_code(key_str)
            .ok_or_else(|| KeybindingError::InvalidKeySpec(spec.to_string()))?;

        // Terminals report Ctrl/Alt chords with the lowercase letter.
        if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            if let KeyCode::Char(c) = code {
                code = KeyCode::Char(c.to_ascii_lowercase());
            }
        }

        Ok(KeyEvent::new(code, modifiers))
    }

    fn parse_key_code(s: &str) -> Option<KeyCode> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c));
        }

        let lower = s.to_lowercase();

        if let Some(rest) = lower.strip_prefix('f') {
            if let Ok(n) = rest.parse::<u8>() {
                if (1..=12).contains(&n) {
                    return Some(KeyCode::F(n));
                }
            }
        }

        match lower.as_str() {
            "space" | "spc" => Some(KeyCode::Char(' ')),
            "enter" | "return" | "ret" | "cr" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "backtab" | "shifttab" => Some(KeyCode::BackTab),
            "backspace" | "bs" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "insert" | "ins" => Some(KeyCode::Insert),

            "up" | "uparrow" => Some(KeyCode::Up),
            "down" | "downarrow" => Some(KeyCode::Down),
            "left" | "leftarrow" => Some(KeyCode::Left),
            "right" | "rightarrow" => Some(KeyCode::Right),

            "pageup" | "pgup" | "page_up" => Some(KeyCode::PageUp),
            "pagedown" | "pgdn" | "pgdown" | "page_down" => Some(KeyCode::PageDown),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),

            _ => None,
        }
    }

    /// Parse an action name from a string.
    ///
    /// # Errors
    ///
    /// Returns `KeybindingError::InvalidAction`, with the closest valid name
    /// as a suggestion when one is near.
    pub fn parse_action(name: &str) -> Result<Action, KeybindingError> {
        name.parse::<Action>()
            .map_err(|_| KeybindingError::InvalidAction {
                name: name.to_string(),
                suggestion: suggest_action(name),
            })
    }

    /// Merge custom keybindings over the profile defaults.
    ///
    /// Custom keys are added to an action's existing keys. A key claimed by
    /// a custom binding is removed from every other action, so the override
    /// always wins. Actions are applied in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if any action name or key specification is invalid.
    pub fn with_custom_overrides(
        mut self,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        let mut entries: Vec<_> = custom.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (action_name, key_specs) in entries {
            let action = Self::parse_action(action_name)?;

            for key_spec in key_specs {
                let key_event = Self::parse_key(key_spec)?;

                for (other_action, other_keys) in &mut self.action_keys {
                    if *other_action != action {
                        other_keys.retain(|k| !Self::key_matches(k, &key_event));
                    }
                }

                let keys = self.action_keys.entry(action).or_default();
                if !keys.iter().any(|k| Self::key_matches(k, &key_event)) {
                    keys.push(key_event);
                }
                log::debug!("Bound {} to {}", key_spec, action);
            }
        }

        Ok(self)
    }

    /// Create keybindings from a profile with custom overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if any custom binding is invalid.
    pub fn from_profile_with_custom(
        profile: KeybindingProfile,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        Self::from_profile(profile).with_custom_overrides(custom)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    /// Bindings every profile carries.
    fn shared_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = HashMap::new();

        bindings.insert(
            Action::ToggleSelect,
            vec![Self::key(KeyCode::Char(' '), KeyModifiers::NONE)],
        );

        bindings.insert(
            Action::KeepOnly,
            vec![Self::key(KeyCode::Char('o'), KeyModifiers::NONE)],
        );

        bindings.insert(
            Action::Confirm,
            vec![Self::key(KeyCode::Enter, KeyModifiers::NONE)],
        );

        bindings.insert(
            Action::Quit,
            vec![
                Self::key(KeyCode::Char('q'), KeyModifiers::NONE),
                Self::key(KeyCode::Char('c'), KeyModifiers::CONTROL),
                Self::key(KeyCode::Esc, KeyModifiers::NONE),
            ],
        );

        bindings.insert(
            Action::ToggleHelp,
            vec![
                Self::key(KeyCode::Char('?'), KeyModifiers::NONE),
                Self::key(KeyCode::F(1), KeyModifiers::NONE),
            ],
        );

        bindings
    }
}
