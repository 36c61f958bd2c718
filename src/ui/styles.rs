use ratatui::style::{Color, Modifier, Style};

/// Bar and legend colors, cycled by subject position
const SUBJECT_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
    Color::LightMagenta,
    Color::LightGreen,
];

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Table header style
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Local changes not yet saved
pub fn warning_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn info_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Synced status style
pub fn synced_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn subject_color(index: usize) -> Color {
    SUBJECT_COLORS[index % SUBJECT_COLORS.len()]
}
