//! User attribution tuning.

use serde::{Deserialize, Serialize};

/// Default allowed weight fluctuation, in kilograms.
///
/// Low values misattribute after long gaps between weigh-ins; the heuristic
/// cannot separate users of near-identical weight at any value.
const fn default_allowed_fluctuation_kg() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributionConfig {
    /// Largest difference from a user's last logged weight that still
    /// attributes a reading to that user; anything beyond mints a new user.
    #[serde(default = "default_allowed_fluctuation_kg")]
    pub allowed_fluctuation_kg: f64,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            allowed_fluctuation_kg: default_allowed_fluctuation_kg(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fluctuation_is_ten_kg() {
        let config = AttributionConfig::default();
        assert!((config.allowed_fluctuation_kg - 10.0).abs() < f64::EPSILON);
    }
}
