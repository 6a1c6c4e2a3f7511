//! The durable weight-log entry.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One record in the append-only weight log.
///
/// Entries are created once by the store's append path and the only mutation
/// ever applied afterwards is flipping `synced` from `false` to `true` once
/// the external service has accepted the record. Entries are never deleted
/// or reordered.
///
/// `weight_kg` is persisted with exactly two decimal digits; in-memory
/// values carry full precision, and sync matching always goes through the
/// persisted representation (see `tare-store`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Household member identifier, always `>= 1`.
    pub user_id: u32,
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Wall-clock UTC time of the measurement. The persisted format carries
    /// no zone, so this is naive by construction.
    pub logged_at: NaiveDateTime,
    /// Whether the external service has acknowledged this record.
    pub synced: bool,
}

impl WeightEntry {
    /// Create a fresh, not-yet-synced entry.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `user_id` is zero.
    pub fn new(user_id: u32, weight_kg: f64, logged_at: NaiveDateTime) -> Result<Self, CoreError> {
        if user_id == 0 {
            return Err(CoreError::Validation(
                "user_id must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            user_id,
            weight_kg,
            logged_at,
            synced: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, secs)
            .unwrap()
    }

    #[test]
    fn new_entry_starts_unsynced() {
        let entry = WeightEntry::new(1, 72.5, ts(0)).unwrap();
        assert!(!entry.synced);
        assert_eq!(entry.user_id, 1);
    }

    #[test]
    fn zero_user_id_is_rejected() {
        let err = WeightEntry::new(0, 72.5, ts(0)).unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }
}
