use crate::auth::CredentialStore;
use crate::errors::AppError;
use crate::models::{
    CredentialsRequest, Goal, RecordResponse, ReminderSettings, SessionResponse, StatsPatch,
    TodayResponse, WeeklySeries,
};
use crate::prefs;
use crate::state::AppState;
use crate::store::UserDataStore;
use crate::weekly::{self, Category};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let credentials = CredentialStore::new(Arc::clone(&state.records));
    let session = credentials
        .register(&payload.username, &payload.password)
        .await?;
    let response = SessionResponse {
        user_id: session.user_id.clone(),
        name: session.display_name.clone(),
    };

    let mut store = UserDataStore::new(Arc::clone(&state.records), session);
    store.load().await;
    *state.session.lock().await = Some(store);

    Ok(Json(response))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let credentials = CredentialStore::new(Arc::clone(&state.records));
    let session = credentials
        .login(&payload.username, &payload.password)
        .await?;
    let response = SessionResponse {
        user_id: session.user_id.clone(),
        name: session.display_name.clone(),
    };

    let mut store = UserDataStore::new(Arc::clone(&state.records), session);
    store.load().await;
    *state.session.lock().await = Some(store);

    Ok(Json(response))
}

pub async fn logout(State(state): State<AppState>) -> StatusCode {
    *state.session.lock().await = None;
    StatusCode::NO_CONTENT
}

pub async fn get_record(State(state): State<AppState>) -> Result<Json<RecordResponse>, AppError> {
    let session = state.session.lock().await;
    let store = session
        .as_ref()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;

    Ok(Json(RecordResponse {
        user_id: store.session().user_id.clone(),
        name: store.session().display_name.clone(),
        state: store.state().label().to_string(),
        goals: store.record().map(|record| record.goals),
    }))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let session = state.session.lock().await;
    let store = session
        .as_ref()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;

    let date = today_key();
    let stats = store.decoded().get(&date).copied().unwrap_or_default();
    Ok(Json(TodayResponse { date, stats }))
}

pub async fn update_stats(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(patch): Json<StatsPatch>,
) -> Result<Json<TodayResponse>, AppError> {
    if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        return Err(AppError::bad_request("date must be YYYY-MM-DD"));
    }

    let mut session = state.session.lock().await;
    let store = session
        .as_mut()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;

    store.update_stats(&date, patch).await;
    let stats = store.decoded().get(&date).copied().unwrap_or_default();
    Ok(Json(TodayResponse { date, stats }))
}

pub async fn get_goals(State(state): State<AppState>) -> Result<Json<Goal>, AppError> {
    let session = state.session.lock().await;
    let store = session
        .as_ref()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;
    let record = store
        .record()
        .ok_or_else(|| AppError::unavailable("record not loaded"))?;
    Ok(Json(record.goals))
}

pub async fn update_goals(
    State(state): State<AppState>,
    Json(goals): Json<Goal>,
) -> Result<StatusCode, AppError> {
    let mut session = state.session.lock().await;
    let store = session
        .as_mut()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;
    store.update_goals(goals).await;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub category: Category,
}

pub async fn get_weekly(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> Result<Json<WeeklySeries>, AppError> {
    let session = state.session.lock().await;
    let store = session
        .as_ref()
        .ok_or_else(|| AppError::unauthorized("not logged in"))?;
    Ok(Json(weekly::build_series(store.decoded(), query.category)))
}

pub async fn get_reminders(State(state): State<AppState>) -> Json<ReminderSettings> {
    let enabled = *state.reminders.lock().await;
    Json(ReminderSettings { enabled })
}

pub async fn set_reminders(
    State(state): State<AppState>,
    Json(settings): Json<ReminderSettings>,
) -> Json<ReminderSettings> {
    *state.reminders.lock().await = settings.enabled;
    prefs::store_reminders(&state.prefs_path, settings.enabled).await;
    Json(settings)
}

fn today_key() -> String {
    weekly::date_key(Local::now().date_naive())
}
