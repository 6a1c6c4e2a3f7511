use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The stored credential for this user has expired. The reconciler
    /// responds with exactly one refresh-and-retry per entry per cycle.
    #[error("expired credential for user {0}")]
    ExpiredCredential(u32),

    /// The service answered but did not accept the record.
    #[error("sync rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("sync transport failure: {0}")]
    Transport(String),

    #[error(transparent)]
    Store(#[from] tare_store::StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
