pub mod generator;
pub mod stats;

pub use generator::{default_report_path, format_minutes, generate_report, write_report};
pub use stats::{minutes_per_day, summarize, StudySummary};
