use crate::app::AppState;
use crate::domain::Task;
use crate::report::format_minutes;
use crate::ui::styles::{
    border_style, default_style, done_style, header_style, hint_style, selected_style, title_style,
};
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

fn completion_mark(completed: bool, use_emoji: bool) -> &'static str {
    match (completed, use_emoji) {
        (true, true) => "✅",
        (false, true) => "⬜",
        (true, false) => "[x]",
        (false, false) => "[ ]",
    }
}

/// Cells for one task row: mark, day, subject, time
fn task_cells(task: &Task, use_emoji: bool) -> [String; 4] {
    [
        completion_mark(task.completed, use_emoji).to_string(),
        task.day_label().to_string(),
        task.subject.clone(),
        format_minutes(task.duration_minutes as u64),
    ]
}

/// Render the task table
pub fn render_plan_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let tasks = app.tasks();
    let title = match app.identity() {
        Some(identity) => format!(" {}'s study plan ({} tasks) ", identity.display_name, tasks.len()),
        None => " Study plan ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    if tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
            .style(hint_style())
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = tasks
        .iter()
        .map(|task| {
            let style = if task.completed {
                done_style()
            } else {
                default_style()
            };
            Row::new(task_cells(task, app.config.use_emoji).map(Cell::from)).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Min(12),
        Constraint::Length(8),
    ];
    let header = Row::new(["", "Day", "Subject", "Time"]).style(header_style());
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    f.render_stateful_widget(table, area, &mut state);
}
