//! Balance-board measurement tuning.

use serde::{Deserialize, Serialize};

/// Default ring buffer capacity (samples).
const fn default_buffer_len() -> usize {
    600
}

/// Default convergence gate on standard deviation, in raw sensor units.
const fn default_max_stddev() -> f64 {
    30.0
}

/// Default lower bound on the mean for a reading to count as "someone is
/// standing on the board", in raw sensor units.
const fn default_lower_bound() -> f64 {
    100.0
}

/// Default settle delay before sampling starts, in seconds.
const fn default_settle_delay_secs() -> u64 {
    2
}

/// Default measurement window before the relaxed gate kicks in, in seconds.
const fn default_max_measure_secs() -> u64 {
    5
}

/// Default hard cap on samples before a session is abandoned.
const fn default_max_samples() -> u32 {
    5000
}

/// Default number of device-type probe attempts.
const fn default_probe_attempts() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Ring buffer capacity for summed corner loads.
    #[serde(default = "default_buffer_len")]
    pub buffer_len: usize,

    /// Strict convergence gate: stddev must drop below this.
    #[serde(default = "default_max_stddev")]
    pub max_stddev: f64,

    /// Mean must exceed this for any convergence (filters the empty board
    /// and the zero-padded buffer).
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,

    /// Seconds to wait after connection so the person is fully on the board.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Seconds of sampling after which the relaxed stddev gate applies.
    #[serde(default = "default_max_measure_secs")]
    pub max_measure_secs: u64,

    /// Hard cap on samples; hitting it abandons the session with no reading.
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,

    /// Bounded retries when probing a freshly connected device's type.
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            buffer_len: default_buffer_len(),
            max_stddev: default_max_stddev(),
            lower_bound: default_lower_bound(),
            settle_delay_secs: default_settle_delay_secs(),
            max_measure_secs: default_max_measure_secs(),
            max_samples: default_max_samples(),
            probe_attempts: default_probe_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = BoardConfig::default();
        assert_eq!(config.buffer_len, 600);
        assert!((config.max_stddev - 30.0).abs() < f64::EPSILON);
        assert!((config.lower_bound - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.settle_delay_secs, 2);
        assert_eq!(config.max_measure_secs, 5);
        assert_eq!(config.max_samples, 5000);
        assert_eq!(config.probe_attempts, 5);
    }
}
