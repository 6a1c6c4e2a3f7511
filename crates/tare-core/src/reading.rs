//! Sample and reading types produced by the measurement pipeline.

use serde::{Deserialize, Serialize};

/// One raw tick from the balance board: the four corner load cells.
///
/// Values are in raw sensor units (centi-kilograms). A sample is ephemeral —
/// it lives only inside one measurement session and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub top_left: i32,
    pub top_right: i32,
    pub bottom_right: i32,
    pub bottom_left: i32,
}

impl RawSample {
    #[must_use]
    pub const fn new(top_left: i32, top_right: i32, bottom_right: i32, bottom_left: i32) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Total load across all four corners, in raw sensor units.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.top_left as i64
            + self.top_right as i64
            + self.bottom_right as i64
            + self.bottom_left as i64
    }
}

/// A stabilized measurement in raw sensor units, produced once per
/// successful session by the convergence engine.
///
/// `mean` is the converged total load; `stddev` is the residual spread and
/// doubles as the measurement uncertainty. Raw units are centi-kilograms:
/// divide by 100 for kg (see [`crate::units`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StableReading {
    pub mean: f64,
    pub stddev: f64,
}

impl StableReading {
    /// The reading expressed in kilograms.
    #[must_use]
    pub fn kilograms(&self) -> f64 {
        self.mean / 100.0
    }

    /// The uncertainty expressed in kilograms.
    #[must_use]
    pub fn uncertainty_kg(&self) -> f64 {
        self.stddev / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_corners() {
        let sample = RawSample::new(10, 20, 30, 40);
        assert_eq!(sample.total(), 100);
    }

    #[test]
    fn total_does_not_overflow_extreme_corners() {
        let sample = RawSample::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX);
        assert_eq!(sample.total(), i64::from(i32::MAX) * 4);
    }

    #[test]
    fn reading_converts_raw_units_to_kg() {
        let reading = StableReading {
            mean: 7250.0,
            stddev: 12.0,
        };
        assert!((reading.kilograms() - 72.5).abs() < f64::EPSILON);
        assert!((reading.uncertainty_kg() - 0.12).abs() < f64::EPSILON);
    }
}
