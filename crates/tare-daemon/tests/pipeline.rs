//! End-to-end pipeline tests: mock board sessions in, attributed CSV rows
//! out.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tare_board::{BoardError, SampleSession};
use tare_config::TareConfig;
use tare_core::RawSample;
use tare_daemon::Runtime;
use tare_store::WeightLogStore;
use tare_sync::DisabledBackend;
use tempfile::TempDir;

/// A board with a perfectly still person on it.
struct ConstantSession {
    total: i32,
}

impl ConstantSession {
    fn kg(kg: f64) -> Self {
        Self {
            total: (kg * 100.0) as i32,
        }
    }
}

impl SampleSession for ConstantSession {
    fn next_sample(&mut self) -> Result<RawSample, BoardError> {
        Ok(RawSample::new(self.total, 0, 0, 0))
    }
}

fn test_config(dir: &TempDir) -> TareConfig {
    let mut config = TareConfig::default();
    config.store.log_path = dir
        .path()
        .join("weight.csv")
        .to_string_lossy()
        .into_owned();
    // Fast-converging board tuning for tests.
    config.board.buffer_len = 50;
    config.board.settle_delay_secs = 0;
    config.board.max_samples = 500;
    config.board.max_measure_secs = 3600;
    config
}

async fn wait_for_entries(store: &WeightLogStore, count: usize) {
    for _ in 0..250 {
        if store.all_entries().unwrap().len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("store never reached {count} entries");
}

#[tokio::test]
async fn pipeline_attributes_sessions_to_users() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::start(&test_config(&dir), DisabledBackend);
    let sessions = runtime.session_sender();
    let store = runtime.store();

    // First ever reading belongs to user 1.
    sessions.send(Box::new(ConstantSession::kg(70.0))).await.unwrap();
    wait_for_entries(&store, 1).await;

    // 71.0 is within the default 10 kg fluctuation of user 1's 70.0.
    sessions.send(Box::new(ConstantSession::kg(71.0))).await.unwrap();
    wait_for_entries(&store, 2).await;

    // 95.0 is 24 kg away from user 1's latest: a new user is minted.
    sessions.send(Box::new(ConstantSession::kg(95.0))).await.unwrap();
    wait_for_entries(&store, 3).await;

    drop(sessions);
    runtime.shutdown().await;

    let entries = store.all_entries().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].user_id, 1);
    assert_eq!(entries[0].weight_kg, 70.0);
    assert_eq!(entries[1].user_id, 1);
    assert_eq!(entries[1].weight_kg, 71.0);
    assert_eq!(entries[2].user_id, 2);
    assert_eq!(entries[2].weight_kg, 95.0);
    assert!(entries.iter().all(|entry| !entry.synced));
}

#[tokio::test]
async fn unstable_session_leaves_no_record() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::start(&test_config(&dir), DisabledBackend);
    let sessions = runtime.session_sender();
    let store = runtime.store();

    // Nobody on the board: the mean never clears the lower bound, the hard
    // cap fires, and no entry may be written for the session.
    sessions.send(Box::new(ConstantSession { total: 50 })).await.unwrap();
    // A real session afterwards proves the abandoned one is fully skipped.
    sessions.send(Box::new(ConstantSession::kg(80.0))).await.unwrap();
    wait_for_entries(&store, 1).await;

    drop(sessions);
    runtime.shutdown().await;

    let entries = store.all_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].weight_kg, 80.0);
}

#[tokio::test]
async fn shutdown_drains_in_flight_sessions() {
    let dir = TempDir::new().unwrap();
    let runtime = Runtime::start(&test_config(&dir), DisabledBackend);
    let sessions = runtime.session_sender();
    let store = runtime.store();

    sessions.send(Box::new(ConstantSession::kg(70.0))).await.unwrap();
    drop(sessions);
    runtime.shutdown().await;

    assert_eq!(store.all_entries().unwrap().len(), 1);
}
