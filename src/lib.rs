pub mod app;
pub mod auth;
pub mod codec;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prefs;
pub mod remote;
pub mod state;
pub mod store;
pub mod weekly;

pub use app::router;
pub use remote::{JsonFileStore, MemoryStore, RecordStore};
pub use state::AppState;
