use super::aggregate::{aggregate, list_days, Bucket};
use super::day::Day;
use super::task::Task;
use crate::error::ValidationError;
use std::collections::BTreeSet;
use std::fmt;

/// Which tasks an aggregation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Day),
}

impl DayFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(day) => task.day == Some(*day),
        }
    }

    /// Parse `"ALL"` (any case) or a day label
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }
        Day::parse(input)
            .map(DayFilter::Day)
            .ok_or_else(|| ValidationError::UnknownDay(input.to_string()))
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("ALL"),
            DayFilter::Day(day) => write!(f, "{}", day),
        }
    }
}

/// Selected filter plus the days that can be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationView {
    pub selected: DayFilter,
    pub days: BTreeSet<Day>,
}

/// Tracks the active aggregation view (whole week or one day)
#[derive(Debug, Clone, Default)]
pub struct ViewSelector {
    selected: DayFilter,
}

impl ViewSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> DayFilter {
        self.selected
    }

    pub fn select_all(&mut self) {
        self.selected = DayFilter::All;
    }

    /// Select a single day; only days that currently have tasks are allowed
    pub fn select_day(&mut self, day: Day, tasks: &[Task]) -> Result<(), ValidationError> {
        if !list_days(tasks).contains(&day) {
            return Err(ValidationError::DayNotPresent(day));
        }
        self.selected = DayFilter::Day(day);
        Ok(())
    }

    /// Fall back to ALL when the selected day no longer has any tasks.
    ///
    /// Returns true when the selection was reverted.
    pub fn reconcile(&mut self, tasks: &[Task]) -> bool {
        if let DayFilter::Day(day) = self.selected {
            if !tasks.iter().any(|t| t.day == Some(day)) {
                log::debug!("no tasks left for {}, showing all days", day);
                self.selected = DayFilter::All;
                return true;
            }
        }
        false
    }

    /// Step forward through ALL and each present day, wrapping around
    pub fn cycle_next(&mut self, tasks: &[Task]) {
        let options = self.options(tasks);
        let pos = options.iter().position(|f| *f == self.selected).unwrap_or(0);
        self.selected = options[(pos + 1) % options.len()];
    }

    /// Step backward through ALL and each present day, wrapping around
    pub fn cycle_prev(&mut self, tasks: &[Task]) {
        let options = self.options(tasks);
        let pos = options.iter().position(|f| *f == self.selected).unwrap_or(0);
        self.selected = options[(pos + options.len() - 1) % options.len()];
    }

    pub fn current_view(&self, tasks: &[Task]) -> Vec<Bucket> {
        aggregate(tasks, self.selected)
    }

    pub fn aggregation_view(&self, tasks: &[Task]) -> AggregationView {
        AggregationView {
            selected: self.selected,
            days: list_days(tasks),
        }
    }

    /// ALL followed by the present days in week order
    fn options(&self, tasks: &[Task]) -> Vec<DayFilter> {
        std::iter::once(DayFilter::All)
            .chain(list_days(tasks).into_iter().map(DayFilter::Day))
            .collect()
    }
}
