//! Device-type probing for freshly connected devices.
//!
//! The kernel driver reports `unknown` when a device is interrogated too
//! soon after connecting, so the probe sleeps before every read and retries
//! a bounded number of times.

use std::thread;
use std::time::Duration;

/// Device type string reported for a balance board.
pub const BALANCE_BOARD_DEVTYPE: &str = "balanceboard";

/// Read a device's type, retrying while the driver still reports it as
/// unknown.
///
/// `read_type` performs one raw read and returns `None` when the type is
/// unavailable. Returns the first usable type string, or `None` once
/// `max_attempts` reads came back empty or `unknown`.
pub fn probe_device_type<F>(mut read_type: F, max_attempts: u32, delay: Duration) -> Option<String>
where
    F: FnMut() -> Option<String>,
{
    for attempt in 1..=max_attempts {
        thread::sleep(delay);
        match read_type() {
            Some(devtype) if !devtype.is_empty() && devtype != "unknown" => {
                return Some(devtype);
            }
            _ => {
                tracing::debug!(attempt, max_attempts, "device type not ready yet");
            }
        }
    }
    None
}

/// Whether a probed device type identifies a balance board.
#[must_use]
pub fn is_balance_board(devtype: &str) -> bool {
    devtype == BALANCE_BOARD_DEVTYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_DELAY: Duration = Duration::ZERO;

    #[test]
    fn returns_type_once_driver_settles() {
        let mut reads = 0;
        let result = probe_device_type(
            || {
                reads += 1;
                if reads < 3 {
                    Some("unknown".to_string())
                } else {
                    Some(BALANCE_BOARD_DEVTYPE.to_string())
                }
            },
            5,
            NO_DELAY,
        );
        assert_eq!(result.as_deref(), Some(BALANCE_BOARD_DEVTYPE));
        assert_eq!(reads, 3);
    }

    #[test]
    fn gives_up_after_bounded_attempts() {
        let mut reads = 0;
        let result = probe_device_type(
            || {
                reads += 1;
                None
            },
            5,
            NO_DELAY,
        );
        assert!(result.is_none());
        assert_eq!(reads, 5);
    }

    #[test]
    fn recognizes_balance_board() {
        assert!(is_balance_board("balanceboard"));
        assert!(!is_balance_board("gamepad"));
        assert!(!is_balance_board("unknown"));
    }
}
