//! Weight log storage configuration.

use serde::{Deserialize, Serialize};

fn default_log_path() -> String {
    "data/weight.csv".to_string()
}

/// strftime pattern used for persisted timestamps.
fn default_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Location of the CSV weight log.
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Timestamp format for persisted entries. Part of the on-disk format:
    /// changing it orphans existing rows, which are then skipped on load.
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            datetime_format: default_datetime_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StoreConfig::default();
        assert_eq!(config.log_path, "data/weight.csv");
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M:%S");
    }
}
