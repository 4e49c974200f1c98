use crate::remote::RecordStore;
use crate::store::UserDataStore;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// One session slot: the source is a single-user device app, so the process
/// carries at most one active session at a time.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub session: Arc<Mutex<Option<UserDataStore>>>,
    pub reminders: Arc<Mutex<bool>>,
    pub prefs_path: PathBuf,
}

impl AppState {
    pub fn new(records: Arc<dyn RecordStore>, prefs_path: PathBuf, reminders: bool) -> Self {
        Self {
            records,
            session: Arc::new(Mutex::new(None)),
            reminders: Arc::new(Mutex::new(reminders)),
            prefs_path,
        }
    }
}
