//! The remote document store collaborator. Records are opaque JSON
//! documents merged at the top level; neither call ever raises — failures
//! are logged and degrade to `None` or a dropped write.

use crate::models::{RecordPatch, UserRecord};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::error;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a user's full record. `None` means the backend is unavailable;
    /// a record that simply does not exist yet comes back as a fresh
    /// default record instead.
    async fn get_record(&self, user_id: &str) -> Option<UserRecord>;

    /// Merge the keys present in `patch` into the stored document, leaving
    /// other top-level keys untouched. Failures are swallowed after being
    /// logged; there is no retry.
    async fn save_record(&self, user_id: &str, patch: RecordPatch);
}

fn apply_patch(record: &mut UserRecord, patch: RecordPatch) {
    if let Some(password_hash) = patch.password_hash {
        record.password_hash = password_hash;
    }
    if let Some(goals) = patch.goals {
        record.goals = goals;
    }
    if let Some(stats) = patch.stats {
        record.stats = stats;
    }
}

/// File-backed store: one JSON document holding every user's record.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> Option<BTreeMap<String, UserRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => Some(records),
                Err(err) => {
                    error!("failed to parse records file: {err}");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Some(BTreeMap::new()),
            Err(err) => {
                error!("failed to read records file: {err}");
                None
            }
        }
    }

    async fn write_all(&self, records: &BTreeMap<String, UserRecord>) -> std::io::Result<()> {
        let payload = serde_json::to_vec_pretty(records).map_err(std::io::Error::other)?;
        fs::write(&self.path, payload).await
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn get_record(&self, user_id: &str) -> Option<UserRecord> {
        let records = self.read_all().await?;
        Some(records.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_record(&self, user_id: &str, patch: RecordPatch) {
        let Some(mut records) = self.read_all().await else {
            error!("dropping save for {user_id}: records file unreadable");
            return;
        };
        let record = records.entry(user_id.to_string()).or_default();
        apply_patch(record, patch);
        if let Err(err) = self.write_all(&records).await {
            error!("failed to persist record for {user_id}: {err}");
        }
    }
}

/// In-process store: demo mode when no backend is configured, and the test
/// double for the data layer.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, UserRecord>>,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_record(&self, user_id: &str) -> Option<UserRecord> {
        let records = self.records.lock().await;
        Some(records.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_record(&self, user_id: &str, patch: RecordPatch) {
        let mut records = self.records.lock().await;
        apply_patch(records.entry(user_id.to_string()).or_default(), patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyStats, Goal, StatsMap};

    #[tokio::test]
    async fn missing_record_yields_defaults() {
        let store = MemoryStore::default();
        let record = store.get_record("nobody").await.expect("available");
        assert_eq!(record, UserRecord::default());
        assert_eq!(record.goals, Goal::default());
        assert!(record.stats.is_empty());
        assert!(record.password_hash.is_empty());
    }

    #[tokio::test]
    async fn save_merges_only_present_keys() {
        let store = MemoryStore::default();
        store
            .save_record(
                "ana",
                RecordPatch {
                    password_hash: Some("abc123".to_string()),
                    ..RecordPatch::default()
                },
            )
            .await;

        let mut stats = StatsMap::new();
        stats.insert(
            "2024-01-01".to_string(),
            DailyStats {
                exercise: Some(10.0),
                ..DailyStats::default()
            },
        );
        store
            .save_record(
                "ana",
                RecordPatch {
                    stats: Some(stats),
                    ..RecordPatch::default()
                },
            )
            .await;

        let record = store.get_record("ana").await.expect("available");
        assert_eq!(record.password_hash, "abc123");
        assert_eq!(record.stats.len(), 1);
        assert_eq!(record.goals, Goal::default());
    }

    #[tokio::test]
    async fn file_store_round_trips_records() {
        let path = temp_file("records");
        let store = JsonFileStore::new(path.clone());
        store
            .save_record(
                "ana",
                RecordPatch {
                    goals: Some(Goal {
                        exercise: 45.0,
                        sleep: 7.0,
                        calories: 1800.0,
                    }),
                    ..RecordPatch::default()
                },
            )
            .await;

        let record = store.get_record("ana").await.expect("available");
        assert_eq!(record.goals.exercise, 45.0);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_unavailable() {
        let path = temp_file("corrupt");
        std::fs::write(&path, b"{ not json").expect("seed file");
        let store = JsonFileStore::new(path.clone());
        assert!(store.get_record("ana").await.is_none());
        // A save against an unreadable backend is dropped, not applied over
        // garbage.
        store
            .save_record(
                "ana",
                RecordPatch {
                    password_hash: Some("abc".to_string()),
                    ..RecordPatch::default()
                },
            )
            .await;
        assert!(store.get_record("ana").await.is_none());
        let _ = std::fs::remove_file(path);
    }

    fn temp_file(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "vita_track_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ));
        path
    }
}
