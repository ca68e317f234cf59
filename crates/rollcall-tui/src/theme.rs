//! Chalkboard palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const CHALK: Color = Color::Rgb(232, 230, 223); // #e8e6df
pub const CHALK_DIM: Color = Color::Rgb(150, 156, 150); // #969c96
pub const MARKER_YELLOW: Color = Color::Rgb(240, 215, 120); // #f0d778
pub const MARKER_BLUE: Color = Color::Rgb(138, 190, 220); // #8abedc
pub const SUCCESS_GREEN: Color = Color::Rgb(136, 204, 136); // #88cc88
pub const ERROR_RED: Color = Color::Rgb(232, 106, 106); // #e86a6a

// ── Extended Palette ──────────────────────────────────────────────────

pub const BORDER_GRAY: Color = Color::Rgb(96, 108, 100); // #606c64
pub const BG_HIGHLIGHT: Color = Color::Rgb(48, 66, 56); // #304238
pub const BG_DARK: Color = Color::Rgb(28, 36, 31); // #1c241f

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(MARKER_BLUE)
        .add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(MARKER_YELLOW)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Activity name in the roster list.
pub fn activity_name() -> Style {
    Style::default().fg(CHALK).add_modifier(Modifier::BOLD)
}

/// Participant rows and other secondary text.
pub fn list_row() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// Selected / highlighted list row.
pub fn list_selected() -> Style {
    Style::default()
        .fg(MARKER_YELLOW)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// "No participants yet" and similar placeholder affordances.
pub fn placeholder() -> Style {
    Style::default()
        .fg(CHALK_DIM)
        .add_modifier(Modifier::ITALIC)
}

// ── Availability tiers ────────────────────────────────────────────────

/// Activity with no spots left.
pub fn tier_full() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Activity down to its last spot.
pub fn tier_low() -> Style {
    Style::default()
        .fg(MARKER_YELLOW)
        .add_modifier(Modifier::BOLD)
}

/// Activity with plain remaining capacity.
pub fn tier_open() -> Style {
    Style::default().fg(CHALK_DIM)
}

// ── Status line ───────────────────────────────────────────────────────

/// Transient status text after a successful command.
pub fn status_success() -> Style {
    Style::default()
        .fg(SUCCESS_GREEN)
        .add_modifier(Modifier::BOLD)
}

/// Transient status text after a failed command.
pub fn status_error() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

// ── Chrome ────────────────────────────────────────────────────────────

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(MARKER_YELLOW)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(CHALK_DIM)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(MARKER_BLUE)
        .add_modifier(Modifier::BOLD)
}
