//! Task wiring for the measurement-to-record pipeline.
//!
//! Three independent activities, each its own tokio task:
//! 1. the measurement loop, blocking on the session channel and running the
//!    convergence engine for each connected board;
//! 2. the append worker, which attributes readings to users and writes the
//!    log, off the measurement path so a session can start while the
//!    previous reading is still being persisted;
//! 3. the reconciler, periodically draining unsynced entries.
//!
//! The session channel is the integration seam for the external Bluetooth
//! layer: whoever detects a board connection pushes an open session in and
//! the pipeline takes it from there.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tare_board::{BoxedSession, ConvergenceEngine};
use tare_config::{BoardConfig, TareConfig};
use tare_core::{StableReading, Units, WeightEntry, resolve_user};
use tare_store::{StoreError, WeightLogStore};
use tare_sync::{Reconciler, SyncBackend};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sessions waiting behind an in-flight measurement; connections are rare,
/// so a small backlog is plenty.
const SESSION_QUEUE_DEPTH: usize = 4;
const READING_QUEUE_DEPTH: usize = 16;

/// Handle to the running pipeline.
pub struct Runtime {
    sessions: mpsc::Sender<BoxedSession>,
    store: Arc<WeightLogStore>,
    workers: Vec<JoinHandle<()>>,
    reconciler: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Spawn the pipeline tasks. Must be called inside a tokio runtime.
    ///
    /// The reconciler is only spawned when `config.sync.enabled` is set;
    /// `backend` is the opaque capability it pushes entries through.
    pub fn start<B>(config: &TareConfig, backend: B) -> Self
    where
        B: SyncBackend + 'static,
    {
        let store = Arc::new(WeightLogStore::from_config(&config.store));
        let (session_tx, session_rx) = mpsc::channel(SESSION_QUEUE_DEPTH);
        let (reading_tx, reading_rx) = mpsc::channel(READING_QUEUE_DEPTH);

        let measure = tokio::spawn(measure_loop(
            session_rx,
            config.board.clone(),
            config.general.units,
            reading_tx,
        ));
        let append = tokio::spawn(append_loop(
            reading_rx,
            Arc::clone(&store),
            config.attribution.allowed_fluctuation_kg,
        ));

        let reconciler = config.sync.enabled.then(|| {
            let reconciler = Reconciler::new(Arc::clone(&store), backend, &config.sync);
            tokio::spawn(async move { reconciler.run().await })
        });

        Self {
            sessions: session_tx,
            store,
            workers: vec![measure, append],
            reconciler,
        }
    }

    /// Producer half of the session channel, for the Bluetooth integration.
    #[must_use]
    pub fn session_sender(&self) -> mpsc::Sender<BoxedSession> {
        self.sessions.clone()
    }

    /// The shared weight log.
    #[must_use]
    pub fn store(&self) -> Arc<WeightLogStore> {
        Arc::clone(&self.store)
    }

    /// Stop accepting sessions, drain in-flight work, stop the reconciler.
    pub async fn shutdown(self) {
        // Closing the session channel cascades: the measurement loop ends,
        // dropping the reading sender, which ends the append worker after
        // it drains what is queued.
        drop(self.sessions);
        for worker in self.workers {
            let _ = worker.await;
        }
        if let Some(reconciler) = self.reconciler {
            // Mid-cycle external calls are abandoned; at-least-once
            // delivery picks the entries up again on the next start.
            reconciler.abort();
            let _ = reconciler.await;
        }
    }
}

/// Activity 1: one board session at a time, settle delay then the blocking
/// sampling loop.
async fn measure_loop(
    mut sessions: mpsc::Receiver<BoxedSession>,
    board: BoardConfig,
    units: Units,
    readings: mpsc::Sender<StableReading>,
) {
    while let Some(mut session) = sessions.recv().await {
        tracing::info!("board connected, settling before measurement");
        tokio::time::sleep(Duration::from_secs(board.settle_delay_secs)).await;

        let engine = ConvergenceEngine::new(board.clone());
        let outcome = tokio::task::spawn_blocking(move || engine.measure(&mut session)).await;

        match outcome {
            Ok(Ok(Some(reading))) => {
                tracing::info!(
                    weight = %format!("{:.2}{}", units.from_kg(reading.kilograms()), units.label()),
                    uncertainty = %format!(
                        "{:.2}{}",
                        units.from_kg(reading.uncertainty_kg()),
                        units.label()
                    ),
                    "weight registered"
                );
                if readings.send(reading).await.is_err() {
                    break;
                }
            }
            Ok(Ok(None)) => {
                tracing::warn!("session never stabilized, no weight recorded");
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "measurement session failed");
            }
            Err(error) => {
                tracing::error!(%error, "measurement worker panicked");
            }
        }
    }
}

/// Activity 2: attribute each stabilized reading and append it, off the
/// measurement path.
async fn append_loop(
    mut readings: mpsc::Receiver<StableReading>,
    store: Arc<WeightLogStore>,
    allowed_fluctuation_kg: f64,
) {
    while let Some(reading) = readings.recv().await {
        let store = Arc::clone(&store);
        let result = tokio::task::spawn_blocking(move || record_reading(
            &store,
            &reading,
            allowed_fluctuation_kg,
        ))
        .await;

        match result {
            Ok(Ok(entry)) => {
                tracing::info!(user_id = entry.user_id, "weight attributed and logged");
            }
            Ok(Err(error)) => {
                tracing::warn!(%error, "failed to log weight entry");
            }
            Err(error) => {
                tracing::error!(%error, "append worker panicked");
            }
        }
    }
}

/// Resolve the user for a reading and append the entry. Runs on a blocking
/// worker; both steps read/write the store under its internal lock.
fn record_reading(
    store: &WeightLogStore,
    reading: &StableReading,
    allowed_fluctuation_kg: f64,
) -> Result<WeightEntry, StoreError> {
    let kg = reading.kilograms();
    let latest = store.latest_weight_per_user()?;
    let user_id = resolve_user(kg, &latest, allowed_fluctuation_kg);
    store.append(user_id, kg, Utc::now().naive_utc())
}
