use crate::config::PlannerConfig;
use std::time::Duration;

/// Lower bound so a bad config can't spin the event loop
pub const MIN_TICK_MS: u64 = 20;

/// Get tick duration
pub fn tick_duration(config: &PlannerConfig) -> Duration {
    Duration::from_millis(config.tick_ms.max(MIN_TICK_MS))
}
