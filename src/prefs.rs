//! Local preferences: a single persisted flag for daily reminders, read at
//! process start and written whenever the user toggles it. Not part of the
//! user record.

use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs;
use tracing::error;

pub const REMINDERS_KEY: &str = "daily_reminders_enabled";

/// Missing file or unreadable contents default to off.
pub async fn load_reminders(path: &Path) -> bool {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
            Ok(prefs) => prefs
                .get(REMINDERS_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                false
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(err) => {
            error!("failed to read preferences file: {err}");
            false
        }
    }
}

/// Write the flag under its fixed key, keeping any other keys in the file.
/// Failures are logged and swallowed; the in-memory flag stays authoritative
/// for the rest of the session.
pub async fn store_reminders(path: &Path, enabled: bool) {
    let mut prefs = match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| Map::new()),
        Err(_) => Map::new(),
    };
    prefs.insert(REMINDERS_KEY.to_string(), Value::Bool(enabled));

    match serde_json::to_vec_pretty(&prefs) {
        Ok(payload) => {
            if let Err(err) = fs::write(path, payload).await {
                error!("failed to write preferences file: {err}");
            }
        }
        Err(err) => error!("failed to serialize preferences: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "vita_track_prefs_{tag}_{}_{}.json",
            std::process::id(),
            nanos
        ));
        path
    }

    #[tokio::test]
    async fn missing_file_defaults_to_off() {
        assert!(!load_reminders(&temp_file("missing")).await);
    }

    #[tokio::test]
    async fn toggle_round_trips() {
        let path = temp_file("toggle");
        store_reminders(&path, true).await;
        assert!(load_reminders(&path).await);
        store_reminders(&path, false).await;
        assert!(!load_reminders(&path).await);
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn other_keys_survive_a_toggle() {
        let path = temp_file("other_keys");
        std::fs::write(&path, br#"{ "theme": "dark" }"#).expect("seed file");
        store_reminders(&path, true).await;

        let bytes = std::fs::read(&path).expect("read back");
        let prefs: Map<String, Value> = serde_json::from_slice(&bytes).expect("parse");
        assert_eq!(prefs.get("theme"), Some(&Value::String("dark".into())));
        assert_eq!(prefs.get(REMINDERS_KEY), Some(&Value::Bool(true)));
        let _ = std::fs::remove_file(path);
    }
}
