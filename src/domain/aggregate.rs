use super::day::Day;
use super::task::Task;
use super::view::DayFilter;
use std::collections::{BTreeSet, HashMap};

/// Minutes studied for one subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub value: u64,
}

impl Bucket {
    /// Percentage of `total` this bucket represents (0.0 when total is 0)
    pub fn share(&self, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.value as f64 / total as f64 * 100.0
    }
}

/// Group tasks matching `filter` by subject and sum their minutes.
///
/// Buckets come out in first-seen order. Tasks with an empty subject are
/// skipped.
pub fn aggregate(tasks: &[Task], filter: DayFilter) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for task in tasks.iter().filter(|t| filter.matches(t)) {
        let subject = task.subject.as_str();
        if subject.trim().is_empty() {
            continue;
        }

        match index.get(subject) {
            Some(&i) => buckets[i].value += task.duration_minutes as u64,
            None => {
                index.insert(subject, buckets.len());
                buckets.push(Bucket {
                    label: subject.to_string(),
                    value: task.duration_minutes as u64,
                });
            }
        }
    }

    buckets
}

/// Distinct days present in `tasks`, in week order
pub fn list_days(tasks: &[Task]) -> BTreeSet<Day> {
    tasks.iter().filter_map(|t| t.day).collect()
}

/// Sum of all bucket values
pub fn total_minutes(buckets: &[Bucket]) -> u64 {
    buckets.iter().map(|b| b.value).sum()
}

/// Largest bucket first; equal values ordered by label
pub fn sort_by_value(buckets: &mut [Bucket]) {
    buckets.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
}

pub fn sort_by_label(buckets: &mut [Bucket]) {
    buckets.sort_by(|a, b| a.label.cmp(&b.label));
}
