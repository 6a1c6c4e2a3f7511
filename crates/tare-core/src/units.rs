//! Raw-unit to display-unit conversion.
//!
//! The board reports centi-kilograms; storage and sync always work in
//! kilograms. Display conversion to pounds is a pure transform applied after
//! convergence, never inside the measurement pipeline.

use serde::{Deserialize, Serialize};

/// Display unit system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Unit label for log messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }

    /// Convert a kilogram value into this unit system.
    #[must_use]
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            Self::Metric => kg,
            Self::Imperial => kg * 2.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_is_identity() {
        assert!((Units::Metric.from_kg(72.5) - 72.5).abs() < f64::EPSILON);
        assert_eq!(Units::Metric.label(), "kg");
    }

    #[test]
    fn imperial_converts_to_pounds() {
        assert!((Units::Imperial.from_kg(100.0) - 220.0).abs() < 1e-9);
        assert_eq!(Units::Imperial.label(), "lbs");
    }
}
