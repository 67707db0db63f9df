//! pagewatch.toml configuration parser.
//!
//! File values sit between the built-in defaults and the command line:
//! flags win over the file, the file wins over defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use pagewatch_collector::CollectorConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub collector: CollectorConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Consumer poll cadence in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
        }
    }
}

impl DaemonConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
