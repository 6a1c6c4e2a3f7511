//! # tare-daemon
//!
//! Wires the measurement, attribution/append, and reconciliation activities
//! into one long-running process. The Bluetooth layer is not part of this
//! crate: it hands freshly opened board sessions to the runtime's session
//! channel and everything downstream of that lives here.

pub mod runtime;

pub use runtime::Runtime;
