//! Collaborator interface to an open board session.

use tare_core::RawSample;

use crate::error::BoardError;

/// A live stream of raw samples from a connected board.
///
/// `next_sample` blocks until the next tick arrives; the convergence engine
/// drives it in a tight loop on a blocking worker. Sessions are not
/// cancellable mid-measurement — a session runs until convergence or the
/// engine's hard sample cap.
pub trait SampleSession {
    /// Block until the board produces its next 4-corner reading.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::SessionClosed`] when the stream ends before the
    /// engine is done with it.
    fn next_sample(&mut self) -> Result<RawSample, BoardError>;
}

/// Owned session handed across the connection channel to the measurement
/// task.
pub type BoxedSession = Box<dyn SampleSession + Send>;

impl SampleSession for BoxedSession {
    fn next_sample(&mut self) -> Result<RawSample, BoardError> {
        (**self).next_sample()
    }
}
