use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily targets, replaced wholesale by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub exercise: f64,
    pub sleep: f64,
    pub calories: f64,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            exercise: 30.0,
            sleep: 8.0,
            calories: 2000.0,
        }
    }
}

/// A stat stored as a reversibly-encoded string instead of a plain number.
/// The encoded payload is a one-key JSON object named after the field, so
/// decoding a sleep entry yields `{"sleep": <number>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedField {
    pub value: String,
}

/// Stored shape of a sensitive stat: `number | { value: string }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatField {
    Plain(f64),
    Encoded(EncodedField),
}

/// One day's logged metrics. Every field is independent; a missing field
/// means "not logged that day", which is distinct from a logged zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<StatField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<StatField>,
}

/// Stats keyed by `YYYY-MM-DD` date string.
pub type StatsMap = BTreeMap<String, DailyStats>;

/// The full per-user document. Serde defaults on every field so a partially
/// populated stored document deserializes against the default record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub password_hash: String,
    pub goals: Goal,
    pub stats: StatsMap,
}

/// Top-level merge write: only the keys present here touch the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsMap>,
}

/// Caller-facing partial update for one date. Sleep and weight arrive as
/// plain numbers; the data store wraps them before they are persisted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// A day with every encoded field resolved to a plain number. `None` means
/// the field was absent or failed to decode. Derived, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedDay {
    pub exercise: Option<f64>,
    pub nutrition: Option<f64>,
    pub sleep: Option<f64>,
    pub weight: Option<f64>,
}

pub type DecodedStats = BTreeMap<String, DecodedDay>;

#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub user_id: String,
    pub name: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    #[serde(flatten)]
    pub stats: DecodedDay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub value: f64,
    pub label: String,
}

/// Fixed 7-point series for one metric category, oldest day first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub points: Vec<SeriesPoint>,
    pub average: f64,
    pub total: f64,
    pub max_value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
}
