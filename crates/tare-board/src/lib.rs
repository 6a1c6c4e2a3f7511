//! # tare-board
//!
//! The measurement half of the pipeline: consumes a session's raw 4-corner
//! sample stream and produces a single stabilized reading, or nothing when
//! the stream never settles.
//!
//! The Bluetooth plumbing itself (adapter discovery, pairing, the HID
//! protocol) lives outside this crate; a connected board is handed in as a
//! [`SampleSession`] and this crate only decides when the numbers coming
//! out of it can be trusted.

mod engine;
mod error;
mod probe;
mod ring;
mod source;

pub use engine::ConvergenceEngine;
pub use error::BoardError;
pub use probe::{BALANCE_BOARD_DEVTYPE, is_balance_board, probe_device_type};
pub use ring::RingBuffer;
pub use source::{BoxedSession, SampleSession};
