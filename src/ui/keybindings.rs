use crate::domain::Screen;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

fn hints(screen: Screen) -> Vec<&'static str> {
    let mut hints = vec![" Tab screen   "];
    match screen {
        Screen::Plan => hints.extend([
            "↑/↓ select   ",
            "Enter done   ",
            "a add   ",
            "x delete   ",
        ]),
        Screen::Stats => hints.extend(["←/→ day   ", "1-7 pick day   ", "w week   "]),
    }
    hints.extend(["r retry save   ", "u switch user   ", "L sign out   ", "Esc dismiss   ", "q quit"]);
    hints
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, screen: Screen, area: Rect) {
    let line = Line::from(hints(screen).into_iter().map(Span::raw).collect::<Vec<_>>());
    let paragraph = Paragraph::new(line).style(hint_style());
    f.render_widget(paragraph, area);
}
