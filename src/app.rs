use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/record", get(handlers::get_record))
        .route("/api/today", get(handlers::get_today))
        .route("/api/stats/:date", put(handlers::update_stats))
        .route("/api/goals", get(handlers::get_goals).put(handlers::update_goals))
        .route("/api/weekly", get(handlers::get_weekly))
        .route(
            "/api/reminders",
            get(handlers::get_reminders).put(handlers::set_reminders),
        )
        .with_state(state)
}
