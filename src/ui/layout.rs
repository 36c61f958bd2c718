use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub tabs_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

/// Stats screen areas
pub struct StatsLayout {
    pub selector_area: Rect,
    pub chart_area: Rect,
    pub legend_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Tabs: Plan / Stats (3 rows)
/// - Content: the active screen
/// - Bottom bar: sync state and notifications (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    MainLayout {
        keybindings_area: chunks[0],
        tabs_area: chunks[1],
        content_area: chunks[2],
        status_area: chunks[3],
    }
}

/// Split the Stats screen: day selector on top, chart (65%) | legend (35%) below
pub fn create_stats_layout(area: Rect) -> StatsLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(vertical[1]);

    StatsLayout {
        selector_area: vertical[0],
        chart_area: horizontal[0],
        legend_area: horizontal[1],
    }
}

/// Create centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.tabs_area.height, 3);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.content_area.height, 45);
        assert_eq!(layout.status_area.y, 49);
    }

    #[test]
    fn test_create_stats_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = create_stats_layout(area);

        assert_eq!(layout.selector_area.height, 3);
        assert!(layout.chart_area.width > layout.legend_area.width);
        assert_eq!(layout.chart_area.height, 37);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 12);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 12);
    }
}
