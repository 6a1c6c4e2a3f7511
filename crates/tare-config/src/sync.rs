//! Sync reconciliation configuration.

use serde::{Deserialize, Serialize};

/// Default reconciliation cycle period, in seconds.
const fn default_interval_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Whether to run the reconciler at all. Off by default: the tracker is
    /// fully usable stand-alone and entries simply accumulate unsynced.
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between reconciliation cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_interval_secs(),
        }
    }
}
