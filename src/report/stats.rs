use crate::domain::{aggregate, total_minutes, Bucket, Day, DayFilter, Task};
use std::collections::BTreeMap;

/// Totals for the tasks a filter selects
#[derive(Debug, Clone, PartialEq)]
pub struct StudySummary {
    pub filter: DayFilter,
    /// Per-subject minutes in first-seen order
    pub buckets: Vec<Bucket>,
    pub total_minutes: u64,
    pub completed_minutes: u64,
    pub task_count: usize,
    pub completed_count: usize,
}

impl StudySummary {
    /// Completed share of planned minutes, as a percentage
    pub fn completion_percent(&self) -> f64 {
        if self.total_minutes == 0 {
            return 0.0;
        }
        self.completed_minutes as f64 / self.total_minutes as f64 * 100.0
    }
}

/// Tasks that count toward subject totals
fn counted(task: &Task) -> bool {
    !task.subject.trim().is_empty()
}

/// Summarize the tasks matching `filter`.
///
/// Tasks without a subject are left out of every total, as in `aggregate`.
pub fn summarize(tasks: &[Task], filter: DayFilter) -> StudySummary {
    let buckets = aggregate(tasks, filter);
    let total_minutes = total_minutes(&buckets);

    let mut task_count = 0;
    let mut completed_count = 0;
    let mut completed_minutes = 0;
    for task in tasks.iter().filter(|t| filter.matches(t) && counted(t)) {
        task_count += 1;
        if task.completed {
            completed_count += 1;
            completed_minutes += task.duration_minutes as u64;
        }
    }

    StudySummary {
        filter,
        buckets,
        total_minutes,
        completed_minutes,
        task_count,
        completed_count,
    }
}

/// Planned minutes per day, in week order; days without tasks are omitted
pub fn minutes_per_day(tasks: &[Task]) -> Vec<(Day, u64)> {
    let mut per_day: BTreeMap<Day, u64> = BTreeMap::new();
    for task in tasks.iter().filter(|t| counted(t)) {
        if let Some(day) = task.day {
            *per_day.entry(day).or_default() += task.duration_minutes as u64;
        }
    }
    per_day.into_iter().collect()
}
