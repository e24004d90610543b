//! TUI layout and rendering with ratatui.
//!
//! # Overview
//!
//! One collision is shown at a time:
//! - header with the instruction line
//! - the collision's hash as the list title, one row per file
//!   (`> [X] name`, where `>` marks the highlighted file and `[X]` a kept one)
//! - a gauge with `i/N` for the position among all collisions
//! - a short help line, or the full help when toggled
//! - transient errors from existence checks, dimmed
//!
//! Files that no longer exist are drawn in the danger color.
//!
//! # Example
//!
//! ```no_run
//! use dupesweep::tui::app::App;
//! use dupesweep::tui::ui::render;
//! use ratatui::Frame;
//!
//! fn draw(frame: &mut Frame, app: &App) {
//!     render(frame, app);
//! }
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::{Action, App};

/// Instruction shown above every collision.
pub const INSTRUCTION: &str = "Select all you want to stay";

/// At most this many transient errors are shown, newest last.
const MAX_ERROR_LINES: usize = 3;

/// Actions listed in the short help line.
const SHORT_HELP: [Action; 6] = [
    Action::PreviousCollision,
    Action::NextCollision,
    Action::ToggleSelect,
    Action::Confirm,
    Action::Quit,
    Action::ToggleHelp,
];

// ==================== Accessible Mode Helpers ====================

/// ASCII border set for accessible mode.
const ASCII_BORDER_SET: border::Set = border::Set {
    top_left: "+",
    top_right: "+",
    bottom_left: "+",
    bottom_right: "+",
    vertical_left: "|",
    vertical_right: "|",
    horizontal_top: "-",
    horizontal_bottom: "-",
};

fn get_border_set(accessible: bool) -> border::Set {
    if accessible {
        ASCII_BORDER_SET
    } else {
        border::ROUNDED
    }
}

fn create_block_with_title<'a>(accessible: bool, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(get_border_set(accessible))
        .title(title)
}

/// Render the whole interface for the current app state.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let help = help_lines(app);
    let error_height = app.state().errors().len().min(MAX_ERROR_LINES);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                   // Header
            Constraint::Min(3),                      // Files
            Constraint::Length(1),                   // Progress
            Constraint::Length(help.len() as u16),   // Help
            Constraint::Length(error_height as u16), // Errors
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_files(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    frame.render_widget(Paragraph::new(help), chunks[3]);
    render_errors(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.is_dry_run() {
        " dupesweep [DRY RUN] "
    } else {
        " dupesweep "
    };

    let block = create_block_with_title(app.is_accessible(), title)
        .border_style(Style::default().fg(app.theme().primary));

    let instruction = Paragraph::new(Line::from(Span::styled(
        INSTRUCTION,
        Style::default()
            .fg(app.theme().normal)
            .add_modifier(Modifier::BOLD),
    )))
    .block(block);

    frame.render_widget(instruction, area);
}

fn render_files(frame: &mut Frame, app: &App, area: Rect) {
    let collision = app.state().current_collision();
    let theme = app.theme();

    // borders, the "> [X] " prefix and the "(missing)" suffix
    let max_name_len = (area.width as usize).saturating_sub(2 + 6 + 10);

    let items: Vec<ListItem> = collision
        .files()
        .iter()
        .enumerate()
        .map(|(i, file)| {
            let marker = if i == collision.cursor() { '>' } else { ' ' };
            let check = if file.is_selected() { "[X]" } else { "[ ]" };
            let missing = if file.is_valid() { "" } else { " (missing)" };
            let text = format!(
                "{} {} {}{}",
                marker,
                check,
                truncate_path(file.name(), max_name_len),
                missing
            );

            let style = if !file.is_valid() {
                Style::default().fg(theme.danger)
            } else if file.is_selected() {
                Style::default().fg(theme.success)
            } else {
                Style::default().fg(theme.dim)
            };

            ListItem::new(text).style(style)
        })
        .collect();

    let title = format!(
        " {} ",
        truncate_string(collision.hash(), (area.width as usize).saturating_sub(4))
    );

    let list = List::new(items)
        .block(
            create_block_with_title(app.is_accessible(), title)
                .border_style(Style::default().fg(theme.secondary)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(collision.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let position = state.cursor() + 1;
    let total = state.collision_count();

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme().primary)
                .bg(app.theme().inverted_fg),
        )
        .ratio(position as f64 / total as f64)
        .label(format!("{position}/{total}"))
        .use_unicode(!app.is_accessible());

    frame.render_widget(gauge, area);
}

fn render_errors(frame: &mut Frame, app: &App, area: Rect) {
    let errors = app.state().errors();
    let shown = &errors[errors.len().saturating_sub(MAX_ERROR_LINES)..];

    let lines: Vec<Line> = shown
        .iter()
        .map(|e| {
            Line::from(Span::styled(
                e.clone(),
                Style::default()
                    .fg(app.theme().dim)
                    .add_modifier(Modifier::DIM),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Help text from the active keybindings: one line, or one line per action.
fn help_lines(app: &App) -> Vec<Line<'static>> {
    let bindings = app.keybindings();
    let key_style = Style::default().fg(app.theme().primary);
    let desc_style = Style::default().fg(app.theme().dim);

    if app.show_help() {
        return Action::all()
            .iter()
            .map(|action| {
                Line::from(vec![
                    Span::styled(format!("{:>16}", bindings.key_hint(action)), key_style),
                    Span::styled(format!("  {}", action.description()), desc_style),
                ])
            })
            .collect();
    }

    let mut spans = Vec::new();
    for (i, action) in SHORT_HELP.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", desc_style));
        }
        let desc = if *action == Action::ToggleHelp {
            "more"
        } else {
            action.description()
        };
        spans.push(Span::styled(bindings.key_hint(action), key_style));
        spans.push(Span::styled(format!(" {desc}"), desc_style));
    }
    vec![Line::from(spans)]
}

/// Truncate a string with ellipsis if it exceeds `max_len` characters.
///
/// # Examples
///
/// ```
/// use dupesweep::tui::ui::truncate_string;
///
/// assert_eq!(truncate_string("hello", 10), "hello");
/// assert_eq!(truncate_string("hello world", 8), "hello...");
/// ```
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Truncate a path to `max_len` characters, keeping the filename visible.
///
/// # Examples
///
/// ```
/// use dupesweep::tui::ui::truncate_path;
///
/// let long = "/very/long/path/to/some/deeply/nested/file.txt";
/// let truncated = truncate_path(long, 30);
/// assert!(truncated.ends_with("file.txt"));
/// assert!(truncated.contains("..."));
/// ```
#[must_use]
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    if max_len <= 6 {
        return truncate_string(path, max_len);
    }

    let filename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let filename_len = filename.chars().count();
    if filename_len + 4 <= max_len {
        let head: String = path.chars().take(max_len - filename_len - 4).collect();
        return format!("{head}.../{filename}");
    }

    truncate_string(path, max_len)
}
