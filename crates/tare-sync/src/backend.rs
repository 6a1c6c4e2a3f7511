//! Collaborator interface to the external weight-sync service.

use chrono::NaiveDateTime;

use crate::error::SyncError;

/// The opaque "log weight for user X at time T" capability.
///
/// Authorization flows, credential storage, and the wire protocol all live
/// behind this trait; the reconciler never sees them. Implementations must
/// tolerate duplicate submissions for the same user and timestamp — the
/// reconciler's at-least-once delivery will occasionally replay a push
/// whose acknowledgment was lost.
pub trait SyncBackend: Send + Sync {
    /// Whether this user has a usable credential at all. A whole per-user
    /// batch is skipped for the cycle when this is false.
    fn is_authorized(&self, user_id: u32) -> impl Future<Output = bool> + Send;

    /// Push one weight record.
    fn log_weight(
        &self,
        user_id: u32,
        weight_kg: f64,
        logged_at: NaiveDateTime,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Attempt to refresh this user's credential after
    /// [`SyncError::ExpiredCredential`].
    fn refresh_credentials(&self, user_id: u32) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// Backend used when sync is disabled: nobody is ever authorized, so the
/// reconciler idles and entries simply accumulate unsynced.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

impl SyncBackend for DisabledBackend {
    async fn is_authorized(&self, _user_id: u32) -> bool {
        false
    }

    async fn log_weight(
        &self,
        _user_id: u32,
        _weight_kg: f64,
        _logged_at: NaiveDateTime,
    ) -> Result<(), SyncError> {
        Err(SyncError::Rejected("sync is disabled".to_string()))
    }

    async fn refresh_credentials(&self, _user_id: u32) -> Result<(), SyncError> {
        Err(SyncError::Rejected("sync is disabled".to_string()))
    }
}
