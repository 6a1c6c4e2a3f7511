//! The periodic reconciliation loop.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tare_config::SyncConfig;
use tare_core::WeightEntry;
use tare_store::WeightLogStore;

use crate::backend::SyncBackend;
use crate::error::SyncError;

/// What one reconciliation cycle did, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Unsynced entries found at the start of the cycle.
    pub pending: usize,
    /// Entries the external service accepted this cycle.
    pub accepted: usize,
    /// Rows whose synced flag was flipped in the store.
    pub flipped: usize,
}

/// Periodically drains the store's unsynced set into the external service.
///
/// Per cycle: read the unsynced entries, group them by user, skip users the
/// backend reports as unauthorized, push the rest entry by entry, then mark
/// everything that was accepted in a single store update. A failed entry
/// just stays unsynced and is retried on the next cycle — there is no
/// within-cycle retry beyond the single credential-refresh attempt.
pub struct Reconciler<B: SyncBackend> {
    store: Arc<WeightLogStore>,
    backend: B,
    interval: Duration,
}

impl<B: SyncBackend> Reconciler<B> {
    #[must_use]
    pub fn new(store: Arc<WeightLogStore>, backend: B, config: &SyncConfig) -> Self {
        Self {
            store,
            backend,
            interval: Duration::from_secs(config.interval_secs),
        }
    }

    /// Run cycles forever. Cycle failures are logged and swallowed; nothing
    /// that happens here may take the process down.
    pub async fn run(&self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "reconciler started");
        loop {
            match self.run_cycle().await {
                Ok(report) if report.pending > 0 => {
                    tracing::info!(
                        pending = report.pending,
                        accepted = report.accepted,
                        flipped = report.flipped,
                        "reconciliation cycle finished"
                    );
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, "reconciliation cycle failed, will retry");
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Execute a single reconciliation cycle.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Store` when the log cannot be read or updated.
    /// Per-entry push failures are not errors — those entries are simply
    /// left unsynced for the next cycle.
    pub async fn run_cycle(&self) -> Result<CycleReport, SyncError> {
        let unsynced = {
            let store = Arc::clone(&self.store);
            tokio::task::spawn_blocking(move || store.unsynced())
                .await
                .map_err(|e| SyncError::Other(e.into()))??
        };
        let mut report = CycleReport {
            pending: unsynced.len(),
            ..CycleReport::default()
        };
        if unsynced.is_empty() {
            return Ok(report);
        }

        let mut by_user: BTreeMap<u32, Vec<WeightEntry>> = BTreeMap::new();
        for entry in unsynced {
            by_user.entry(entry.user_id).or_default().push(entry);
        }

        let mut accepted = Vec::new();
        for (user_id, batch) in by_user {
            if !self.backend.is_authorized(user_id).await {
                tracing::debug!(user_id, skipped = batch.len(), "user not authorized, skipping batch");
                continue;
            }
            for entry in batch {
                match self.push_entry(&entry).await {
                    Ok(()) => accepted.push(entry),
                    Err(error) => {
                        tracing::warn!(
                            user_id,
                            logged_at = %entry.logged_at,
                            %error,
                            "entry not accepted, leaving unsynced"
                        );
                    }
                }
            }
        }

        report.accepted = accepted.len();
        if !accepted.is_empty() {
            let store = Arc::clone(&self.store);
            report.flipped = tokio::task::spawn_blocking(move || store.mark_synced(&accepted))
                .await
                .map_err(|e| SyncError::Other(e.into()))??;
        }
        Ok(report)
    }

    /// Push one entry, with at most one credential refresh-and-retry.
    async fn push_entry(&self, entry: &WeightEntry) -> Result<(), SyncError> {
        match self
            .backend
            .log_weight(entry.user_id, entry.weight_kg, entry.logged_at)
            .await
        {
            Err(SyncError::ExpiredCredential(user_id)) => {
                tracing::info!(user_id, "credential expired, refreshing once");
                self.backend.refresh_credentials(user_id).await?;
                self.backend
                    .log_weight(entry.user_id, entry.weight_kg, entry.logged_at)
                    .await
            }
            result => result,
        }
    }
}
