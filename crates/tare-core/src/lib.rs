//! # tare-core
//!
//! Core types and pure domain logic shared across all Tare crates:
//! - Sample and reading types produced by the measurement pipeline
//! - The durable weight-log entry
//! - Weight-similarity user attribution
//! - Raw-unit to display-unit conversion
//! - Cross-cutting error types

pub mod attribution;
pub mod entry;
pub mod errors;
pub mod reading;
pub mod units;

pub use attribution::resolve_user;
pub use entry::WeightEntry;
pub use errors::CoreError;
pub use reading::{RawSample, StableReading};
pub use units::Units;
