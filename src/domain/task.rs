use super::day::Day;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fmt;

/// Creation-ordered task identifier (milliseconds since the Unix epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Fresh id for a new task: the current time, bumped past every existing id
    /// so ids stay unique and increasing even within one millisecond.
    ///
    /// `None` when an existing id already sits at `i64::MAX`.
    pub fn next(existing: &[Task], now_millis: i64) -> Option<Self> {
        let newest = existing.iter().map(|t| t.id.0).max();
        match newest {
            Some(newest) if newest >= now_millis => newest.checked_add(1).map(TaskId),
            _ => Some(TaskId(now_millis)),
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<i64>().ok().map(TaskId)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One planned study session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    /// `None` only for records read from the store with a missing or unknown day
    pub day: Option<Day>,
    pub subject: String,
    pub duration_minutes: u32,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, day: Day, subject: String, duration_minutes: u32) -> Self {
        Self {
            id,
            day: Some(day),
            subject,
            duration_minutes,
            completed: false,
        }
    }

    /// Label of the task's day, empty when the day is unknown
    pub fn day_label(&self) -> &'static str {
        self.day.map(|d| d.label()).unwrap_or("")
    }

    /// Persisted record shape: `{id, day, subject, time, completed}`
    pub fn to_record(&self) -> Value {
        json!({
            "id": self.id.0,
            "day": self.day_label(),
            "subject": self.subject,
            "time": self.duration_minutes,
            "completed": self.completed,
        })
    }

    /// Decode one raw record, coercing malformed fields.
    ///
    /// Returns `None` only when the record has no usable id.
    pub fn from_record(record: &Value) -> Option<Self> {
        let id = record.get("id").and_then(coerce_id)?;

        let day = record
            .get("day")
            .and_then(Value::as_str)
            .and_then(Day::parse);

        let subject = record
            .get("subject")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let duration_minutes = record.get("time").map(coerce_minutes).unwrap_or(0);

        let completed = record
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Some(Self {
            id,
            day,
            subject,
            duration_minutes,
            completed,
        })
    }
}

/// The per-identity document held by the task store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    #[serde(default)]
    pub tasks: Vec<Value>,
}

impl TaskDocument {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            tasks: tasks.iter().map(Task::to_record).collect(),
        }
    }

    /// Decode every record, dropping records without an id and repeated ids
    pub fn decode(&self) -> Vec<Task> {
        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(self.tasks.len());

        for (index, record) in self.tasks.iter().enumerate() {
            match Task::from_record(record) {
                Some(task) => {
                    if seen.insert(task.id) {
                        tasks.push(task);
                    } else {
                        log::warn!("dropping task record {} with duplicate id {}", index, task.id);
                    }
                }
                None => log::warn!("dropping task record {} without a usable id", index),
            }
        }

        tasks
    }
}

/// Validated input for a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub day: Day,
    pub subject: String,
    pub duration_minutes: u32,
}

impl NewTask {
    pub fn validate(day: &str, subject: &str, duration_minutes: i64) -> Result<Self, ValidationError> {
        let day = Day::parse(day).ok_or_else(|| ValidationError::UnknownDay(day.to_string()))?;

        let subject = subject.trim();
        if subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }

        let duration_minutes = u32::try_from(duration_minutes)
            .map_err(|_| ValidationError::InvalidDuration(duration_minutes.to_string()))?;

        Ok(Self {
            day,
            subject: subject.to_string(),
            duration_minutes,
        })
    }
}

/// Parse a duration typed into a form or passed on the command line
pub fn parse_duration(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidDuration(input.to_string()))
}

fn coerce_id(value: &Value) -> Option<TaskId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(TaskId),
        Value::String(s) => TaskId::parse(s),
        _ => None,
    }
}

/// Coerce a persisted `time` value to non-negative whole minutes.
///
/// Numbers are truncated and clamped at zero, strings are read by their
/// leading digits, everything else is zero.
pub fn coerce_minutes(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.clamp(0, u32::MAX as i64) as u32
            } else if n.as_u64().is_some() {
                u32::MAX
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f > 0.0 => f.trunc().min(u32::MAX as f64) as u32,
                    _ => 0,
                }
            }
        }
        Value::String(s) => leading_minutes(s),
        _ => 0,
    }
}

fn leading_minutes(text: &str) -> u32 {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    if negative || digits.is_empty() {
        return 0;
    }

    digits
        .parse::<u64>()
        .map(|n| n.min(u32::MAX as u64) as u32)
        .unwrap_or(u32::MAX)
}
