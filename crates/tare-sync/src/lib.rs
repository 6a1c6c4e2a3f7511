//! # tare-sync
//!
//! Pushes recorded-but-unacknowledged weight entries to the external
//! service and records the acknowledgment back into the log.
//!
//! The external service is opaque behind [`SyncBackend`]; the reconciler
//! only assumes "log weight for user X at time T, tell me if it stuck".
//! Delivery is at-least-once: a crash between a successful push and the
//! synced-flag update simply replays the entry next cycle, and the remote
//! side is expected to tolerate the duplicate.

mod backend;
mod error;
mod reconciler;

pub use backend::{DisabledBackend, SyncBackend};
pub use error::SyncError;
pub use reconciler::{CycleReport, Reconciler};
