use crate::app::AppState;
use crate::domain::{total_minutes, AggregationView, Bucket, DayFilter};
use crate::report::format_minutes;
use crate::ui::layout::create_stats_layout;
use crate::ui::styles::{border_style, default_style, hint_style, selected_style, subject_color, title_style};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

/// Longest bar label before truncation
const LABEL_WIDTH: usize = 8;

fn short_label(label: &str) -> String {
    if label.chars().count() <= LABEL_WIDTH {
        label.to_string()
    } else {
        let head: String = label.chars().take(LABEL_WIDTH - 1).collect();
        format!("{}…", head)
    }
}

/// Selector entries: ALL followed by the days that have tasks
fn selector_titles(view: &AggregationView) -> (Vec<String>, usize) {
    let mut titles = vec!["ALL".to_string()];
    let mut selected = 0;
    for (i, day) in view.days.iter().enumerate() {
        titles.push(day.short().to_string());
        if view.selected == DayFilter::Day(*day) {
            selected = i + 1;
        }
    }
    (titles, selected)
}

/// Legend lines: subject, time and share of the total
fn legend_lines(buckets: &[Bucket]) -> Vec<(String, usize)> {
    let total = total_minutes(buckets);
    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            (
                format!(
                    "{}  {}  {:.1}%",
                    bucket.label,
                    format_minutes(bucket.value),
                    bucket.share(total)
                ),
                i,
            )
        })
        .collect()
}

/// Render the Stats screen: day selector, bar chart and legend
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let layout = create_stats_layout(area);
    let view = app.aggregation_view();
    let buckets = app.current_buckets();

    let (titles, selected) = selector_titles(&view);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(default_style())
        .highlight_style(selected_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(" Day ", title_style())),
        );
    f.render_widget(tabs, layout.selector_area);

    let chart_title = format!(
        " Minutes per subject: {} ({}) ",
        view.selected,
        format_minutes(total_minutes(&buckets))
    );
    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(chart_title, title_style()));

    if buckets.is_empty() {
        let empty = Paragraph::new("Nothing planned yet.")
            .style(hint_style())
            .block(chart_block);
        f.render_widget(empty, layout.chart_area);
    } else {
        let bars: Vec<Bar> = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                Bar::default()
                    .value(bucket.value)
                    .label(Line::from(short_label(&bucket.label)))
                    .text_value(format_minutes(bucket.value))
                    .style(Style::default().fg(subject_color(i)))
            })
            .collect();

        let chart = BarChart::default()
            .block(chart_block)
            .bar_width(LABEL_WIDTH as u16)
            .bar_gap(2)
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, layout.chart_area);
    }

    let items: Vec<ListItem> = legend_lines(&buckets)
        .into_iter()
        .map(|(text, i)| {
            ListItem::new(Line::from(vec![
                Span::styled("■ ", Style::default().fg(subject_color(i))),
                Span::raw(text),
            ]))
        })
        .collect();
    let legend = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Legend ", title_style())),
    );
    f.render_widget(legend, layout.legend_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Day;
    use std::collections::BTreeSet;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Math"), "Math");
        assert_eq!(short_label("Literature"), "Literat…");
    }

    #[test]
    fn test_selector_titles_mark_selected_day() {
        let view = AggregationView {
            selected: DayFilter::Day(Day::Friday),
            days: BTreeSet::from([Day::Friday, Day::Monday]),
        };
        let (titles, selected) = selector_titles(&view);
        assert_eq!(titles, vec!["ALL", "Mon", "Fri"]);
        assert_eq!(selected, 2);
    }

    #[test]
    fn test_legend_lines_show_shares() {
        let buckets = vec![
            Bucket { label: "Math".to_string(), value: 90 },
            Bucket { label: "Physics".to_string(), value: 30 },
        ];
        let lines = legend_lines(&buckets);
        assert_eq!(lines[0].0, "Math  1h 30m  75.0%");
        assert_eq!(lines[1].0, "Physics  30m  25.0%");
        assert!(legend_lines(&[]).is_empty());
    }
}
