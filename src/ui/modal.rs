use crate::app::AppState;
use crate::domain::UiMode;
use crate::report::format_minutes;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the sign-in prompt
pub fn render_sign_in_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::SigningIn {
        return;
    }
    let modal_area = create_modal_area(area, 11);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(Line::raw("  Sign in to load your study plan."));
    lines.push(Line::raw(""));
    lines.push(Line::raw("  Name:"));
    lines.push(Line::from(vec![
        Span::raw("  > "),
        Span::styled(app.login_name.as_str(), modal_title_style()),
        Span::styled("█", modal_title_style()),
    ]));
    lines.push(Line::raw(""));

    let escape_hint = if app.identity().is_some() {
        " Back"
    } else {
        " Quit"
    };
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", modal_title_style()),
        Span::raw(" Sign in  "),
        Span::styled("[Esc]", modal_title_style()),
        Span::raw(escape_hint),
    ]));

    let title = if app.config.use_emoji {
        " 📚 Study Planner "
    } else {
        " Study Planner "
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the delete confirmation
pub fn render_confirm_delete_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if app.ui_mode != UiMode::ConfirmDelete {
        return;
    }
    let Some(task) = app
        .pending_delete
        .and_then(|id| app.session.controller().find(id))
    else {
        return;
    };

    let modal_area = create_modal_area(area, 8);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!(
            "  Delete {} on {} ({})?",
            task.subject,
            task.day_label(),
            format_minutes(task.duration_minutes as u64)
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Delete  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Keep"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Delete Task ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
