use crate::app::AppState;
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

/// Label plus value line for one text field, with a cursor when active
fn field_lines<'a>(label: &'a str, value: &'a str, active: bool) -> [Line<'a>; 2] {
    let label = if active {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label)
    };
    let value = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if active {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);
    [label, value]
}

/// Render the input form for adding tasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area, 14);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let mut lines = Vec::new();

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("Day:  ◀ "),
            Span::styled(form.day.label(), modal_title_style()),
            Span::raw(" ▶"),
        ]));
        lines.push(Line::raw(""));

        lines.extend(field_lines("Subject:", &form.subject, form.editing_field == 0));
        lines.push(Line::raw(""));
        lines.extend(field_lines("Minutes:", &form.minutes, form.editing_field == 1));
        lines.push(Line::raw(""));

        // Instructions
        lines.push(Line::raw(
            "←/→ day  ·  Tab switch field  ·  Enter add  ·  Esc cancel",
        ));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Add Study Task ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
