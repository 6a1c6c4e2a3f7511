use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("weight log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The atomic rewrite could not be published over the live log.
    #[error("weight log rewrite failed: {0}")]
    Rewrite(String),

    #[error(transparent)]
    Core(#[from] tare_core::CoreError),
}
