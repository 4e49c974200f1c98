use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use vita_track::{prefs, AppState, JsonFileStore, MemoryStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let records_path = resolve_path("APP_DATA_PATH", "data/users.json");
    let prefs_path = resolve_path("APP_PREFS_PATH", "data/prefs.json");
    for path in [&records_path, &prefs_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
    }

    let records: Arc<dyn RecordStore> = if env::var("APP_DEMO_MODE").is_ok_and(|v| v == "1") {
        info!("demo mode: records are kept in memory and dropped on exit");
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(JsonFileStore::new(records_path))
    };

    let reminders = prefs::load_reminders(&prefs_path).await;
    let state = AppState::new(records, prefs_path, reminders);
    let app = vita_track::router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn resolve_path(var: &str, default: &str) -> PathBuf {
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
