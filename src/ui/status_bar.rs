use crate::app::AppState;
use crate::domain::SyncState;
use crate::notifications::Level;
use crate::ui::styles::{error_style, hint_style, info_style, synced_style, warning_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sync summary, e.g. "Lan · unsaved changes (2) · stale"
fn sync_text(app: &AppState) -> (String, Style) {
    let Some(identity) = app.identity() else {
        return (" signed out".to_string(), hint_style());
    };

    let state = app.sync_state();
    let mut text = format!(" {} · {}", identity.display_name, state.label());
    let mut style = match state {
        SyncState::Synced => synced_style(),
        SyncState::LocalAhead => warning_style(),
        SyncState::Idle | SyncState::Loading => hint_style(),
    };

    if state == SyncState::LocalAhead {
        text.push_str(&format!(" ({})", app.pending_persists()));
    }
    if app.is_stale() {
        text.push_str(" · stale data");
        style = error_style();
    }
    (text, style)
}

/// Render the bottom status bar
pub fn render_status_bar(f: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let (text, style) = sync_text(app);
    f.render_widget(Paragraph::new(Span::styled(text, style)), chunks[0]);

    if let Some(notification) = app.notifications.latest() {
        let (icon, style) = match (notification.level, app.config.use_emoji) {
            (Level::Info, true) => ("ℹ️ ", info_style()),
            (Level::Error, true) => ("⚠️ ", error_style()),
            (Level::Info, false) => ("", info_style()),
            (Level::Error, false) => ("! ", error_style()),
        };
        let line = Line::from(vec![
            Span::styled(format!("{}{}", icon, notification.message), style),
            Span::styled("  (Esc)", hint_style()),
        ]);
        f.render_widget(Paragraph::new(line), chunks[1]);
    }
}
