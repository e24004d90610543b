//! TUI theming support.
//!
//! Light and dark palettes, plus a best-effort guess of the terminal's
//! background for the `auto` setting.

use ratatui::style::Color;

use crate::cli::ThemeArg;

/// A collection of colors used for TUI components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Headers and borders.
    pub primary: Color,
    /// File list border.
    pub secondary: Color,
    /// Files marked for deletion and missing files.
    pub danger: Color,
    /// Files kept.
    pub success: Color,
    /// Secondary text: help line and transient errors.
    pub dim: Color,
    /// Main text.
    pub normal: Color,
    /// Text drawn on a colored background.
    pub inverted_fg: Color,
}

impl Theme {
    /// High-contrast dark theme (default).
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::DarkGray,
            normal: Color::White,
            inverted_fg: Color::Black,
        }
    }

    /// High-contrast light theme.
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Magenta,
            danger: Color::Red,
            success: Color::Green,
            dim: Color::Gray,
            normal: Color::Black,
            inverted_fg: Color::White,
        }
    }

    /// Detect terminal theme or return dark theme as default.
    pub fn auto() -> Self {
        if is_light_background(std::env::var("COLORFGBG").ok().as_deref()) {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Theme for a configuration value.
    pub fn from_arg(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => Self::auto(),
            ThemeArg::Dark => Self::dark(),
            ThemeArg::Light => Self::light(),
        }
    }

    /// Check if this is a light theme.
    pub fn is_light(&self) -> bool {
        self.normal == Color::Black
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Interpret a `COLORFGBG` value ("fg;bg", set by rxvt, xterm and konsole).
///
/// Background indices 7 and 9..=15 are light; 8 is dark gray.
fn is_light_background(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u32>().ok())
        .is_some_and(|bg| bg >= 7 && bg != 8)
}
