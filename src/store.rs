//! The active user's canonical in-memory record, with merge writes and the
//! derived decoded view.

use crate::auth::Session;
use crate::codec;
use crate::models::{
    DailyStats, DecodedDay, DecodedStats, Goal, RecordPatch, StatField, StatsMap, StatsPatch,
    UserRecord,
};
use crate::remote::RecordStore;
use std::sync::Arc;

/// Load state of the session's record. `Unavailable` means the backend
/// could not be reached; the record is left absent rather than partial.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordState {
    Loading,
    Ready(UserRecord),
    Unavailable,
}

impl RecordState {
    pub fn label(&self) -> &'static str {
        match self {
            RecordState::Loading => "loading",
            RecordState::Ready(_) => "ready",
            RecordState::Unavailable => "unavailable",
        }
    }
}

/// Holds one session's record and keeps the decoded view in step with it.
/// Writes are optimistic: local state is mutated first, then the remote
/// save is issued with no rollback on failure, so local state can run
/// ahead of remote state indefinitely (at-least-once persistence).
pub struct UserDataStore {
    records: Arc<dyn RecordStore>,
    session: Session,
    state: RecordState,
    decoded: DecodedStats,
}

impl UserDataStore {
    pub fn new(records: Arc<dyn RecordStore>, session: Session) -> Self {
        Self {
            records,
            session,
            state: RecordState::Loading,
            decoded: DecodedStats::new(),
        }
    }

    /// Fetch the full record for the session's user.
    pub async fn load(&mut self) {
        self.state = RecordState::Loading;
        self.state = match self.records.get_record(&self.session.user_id).await {
            Some(record) => RecordState::Ready(record),
            None => RecordState::Unavailable,
        };
        self.refresh_decoded();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &RecordState {
        &self.state
    }

    pub fn record(&self) -> Option<&UserRecord> {
        match &self.state {
            RecordState::Ready(record) => Some(record),
            _ => None,
        }
    }

    /// The per-session projection with every encoded field resolved.
    pub fn decoded(&self) -> &DecodedStats {
        &self.decoded
    }

    /// Merge `patch` into one date's entry, field by field. Only the fields
    /// present in the patch are overwritten (replace, not accumulate);
    /// sleep and weight are wrapped through the codec first. A no-op until
    /// the record has loaded.
    pub async fn update_stats(&mut self, date: &str, patch: StatsPatch) {
        let RecordState::Ready(record) = &mut self.state else {
            return;
        };

        let mut stats = record.stats.clone();
        let entry = stats.entry(date.to_string()).or_default();
        if let Some(hours) = patch.sleep {
            entry.sleep = Some(StatField::Encoded(codec::encode_stat("sleep", hours)));
        }
        if let Some(kilograms) = patch.weight {
            entry.weight = Some(StatField::Encoded(codec::encode_stat("weight", kilograms)));
        }
        if let Some(minutes) = patch.exercise {
            entry.exercise = Some(minutes);
        }
        if let Some(kilocalories) = patch.nutrition {
            entry.nutrition = Some(kilocalories);
        }

        record.stats = stats.clone();
        self.refresh_decoded();
        self.records
            .save_record(
                &self.session.user_id,
                RecordPatch {
                    stats: Some(stats),
                    ..RecordPatch::default()
                },
            )
            .await;
    }

    /// Replace the goals wholesale; same optimistic-then-persist pattern.
    pub async fn update_goals(&mut self, goals: Goal) {
        let RecordState::Ready(record) = &mut self.state else {
            return;
        };
        record.goals = goals;
        self.records
            .save_record(
                &self.session.user_id,
                RecordPatch {
                    goals: Some(goals),
                    ..RecordPatch::default()
                },
            )
            .await;
    }

    fn refresh_decoded(&mut self) {
        self.decoded = match &self.state {
            RecordState::Ready(record) => decode_stats(&record.stats),
            _ => DecodedStats::new(),
        };
    }
}

/// Project a stats mapping into its decoded view. A field that fails to
/// decode comes out absent, not zero; the rest of the derivation continues.
pub fn decode_stats(stats: &StatsMap) -> DecodedStats {
    stats
        .iter()
        .map(|(date, day)| (date.clone(), decode_day(day)))
        .collect()
}

fn decode_day(day: &DailyStats) -> DecodedDay {
    DecodedDay {
        exercise: day.exercise,
        nutrition: day.nutrition,
        sleep: resolve(day.sleep.as_ref(), "sleep"),
        weight: resolve(day.weight.as_ref(), "weight"),
    }
}

fn resolve(field: Option<&StatField>, name: &str) -> Option<f64> {
    match field? {
        StatField::Plain(value) => Some(*value),
        StatField::Encoded(encoded) => codec::decode_stat(name, encoded),
    }
}
