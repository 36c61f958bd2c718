use crate::persistence::read_file;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

/// User preferences read from `config.json` in the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// UI refresh and store poll interval
    pub tick_ms: u64,
    /// How long a notification stays on screen
    pub notification_secs: u64,
    pub use_emoji: bool,
    /// Ask before deleting a task
    pub confirm_delete: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            notification_secs: 3,
            use_emoji: true,
            confirm_delete: true,
        }
    }
}

impl PlannerConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config; a missing or empty file gives the defaults
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path(data_dir);
        let content = read_file(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if config.tick_ms == 0 {
            config.tick_ms = Self::default().tick_ms;
        }
        Ok(config)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}
