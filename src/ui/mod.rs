pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod modal;
pub mod plan_pane;
pub mod stats_pane;
pub mod status_bar;
pub mod styles;

use crate::app::AppState;
use crate::domain::{Screen, UiMode};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use modal::{render_confirm_delete_modal, render_sign_in_modal};
use plan_pane::render_plan_pane;
use ratatui::{
    text::Span,
    widgets::{Block, Borders, Tabs},
    Frame,
};
use stats_pane::render_stats_pane;
use status_bar::render_status_bar;
use styles::{border_style, default_style, selected_style, title_style};

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app.screen, layout.keybindings_area);

    let selected = match app.screen {
        Screen::Plan => 0,
        Screen::Stats => 1,
    };
    let tabs = Tabs::new(vec![Screen::Plan.title(), Screen::Stats.title()])
        .select(selected)
        .style(default_style())
        .highlight_style(selected_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Study Planner ", title_style())),
        );
    f.render_widget(tabs, layout.tabs_area);

    match app.screen {
        Screen::Plan => render_plan_pane(f, app, layout.content_area),
        Screen::Stats => render_stats_pane(f, app, layout.content_area),
    }

    render_status_bar(f, app, layout.status_area);

    // Sign-in prompt takes precedence
    if app.ui_mode == UiMode::SigningIn {
        render_sign_in_modal(f, app, size);
        return;
    }

    render_confirm_delete_modal(f, app, size);

    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
