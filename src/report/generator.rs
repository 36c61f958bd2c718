use crate::domain::{sort_by_value, DayFilter, Task};
use crate::identity::Identity;
use crate::persistence::{atomic_write, ensure_dir};
use crate::report::stats::{minutes_per_day, summarize};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Format minutes as "Xh Ym" or "Xm" for display
pub fn format_minutes(total_mins: u64) -> String {
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Default report location inside the data directory
pub fn default_report_path(data_dir: &Path, filter: DayFilter, date: NaiveDate) -> PathBuf {
    let scope = match filter {
        DayFilter::All => "week".to_string(),
        DayFilter::Day(day) => day.label().to_lowercase(),
    };
    data_dir.join(format!("report-{}-{}.md", date, scope))
}

/// Render the markdown study report for `identity`
pub fn generate_report(identity: &Identity, tasks: &[Task], filter: DayFilter) -> String {
    render_report(identity, tasks, filter, Local::now().date_naive())
}

fn render_report(identity: &Identity, tasks: &[Task], filter: DayFilter, date: NaiveDate) -> String {
    let summary = summarize(tasks, filter);
    let mut report = String::new();

    // Header
    report.push_str(&format!("# Study Report - {}\n\n", identity.display_name));
    report.push_str(&format!("_Generated {} · view: {}_\n\n", date, filter));

    // Summary
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Tasks:** {} ({} completed)\n",
        summary.task_count, summary.completed_count
    ));
    report.push_str(&format!(
        "- **Planned Time:** {}\n",
        format_minutes(summary.total_minutes)
    ));
    report.push_str(&format!(
        "- **Completed Time:** {} ({})\n\n",
        format_minutes(summary.completed_minutes),
        format_percent(summary.completion_percent())
    ));

    if summary.buckets.is_empty() {
        report.push_str("No study time planned.\n");
        return report;
    }

    // Subjects, largest first
    let mut buckets = summary.buckets.clone();
    sort_by_value(&mut buckets);
    report.push_str("## Subjects\n\n");
    report.push_str("| Subject | Time | Share |\n");
    report.push_str("|---|---:|---:|\n");
    for bucket in &buckets {
        report.push_str(&format!(
            "| {} | {} | {} |\n",
            bucket.label,
            format_minutes(bucket.value),
            format_percent(bucket.share(summary.total_minutes))
        ));
    }
    report.push('\n');

    // Days are only broken down for the whole week
    if filter == DayFilter::All {
        report.push_str("## Days\n\n");
        report.push_str("| Day | Time |\n");
        report.push_str("|---|---:|\n");
        for (day, minutes) in minutes_per_day(tasks) {
            report.push_str(&format!("| {} | {} |\n", day, format_minutes(minutes)));
        }
        report.push('\n');
    }

    // Task list
    report.push_str("## Tasks\n\n");
    for task in tasks.iter().filter(|t| filter.matches(t)) {
        let mark = if task.completed { "x" } else { " " };
        report.push_str(&format!(
            "- [{}] **{}** ({}) {}\n",
            mark,
            task.subject,
            task.day_label(),
            format_minutes(task.duration_minutes as u64)
        ));
    }

    report
}

/// Write a generated report, creating the parent directory if needed
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_dir(dir)?;
    }
    atomic_write(path, content)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
