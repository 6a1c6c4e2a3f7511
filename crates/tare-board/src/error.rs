use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    /// The sample source stopped yielding mid-session (board powered off or
    /// disconnected before convergence).
    #[error("sample session ended unexpectedly: {0}")]
    SessionClosed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
