pub mod aggregate;
pub mod day;
pub mod enums;
pub mod task;
pub mod view;

pub use aggregate::{aggregate, list_days, sort_by_label, sort_by_value, total_minutes, Bucket};
pub use day::Day;
pub use enums::{Screen, SyncState, UiMode};
pub use task::{parse_duration, NewTask, Task, TaskDocument, TaskId};
pub use view::{AggregationView, DayFilter, ViewSelector};
