//! Record store seam.
//!
//! The engine itself is synchronous; the only suspension point is the
//! one-shot read of a match's records before computation. A failed read is
//! surfaced as [`FetchError`] and is never confused with "no data".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::strategy::{attribute_match, precise_ready, AttributionReport};
use crate::types::{
    ActivityRecord, ActorId, ActorTotalRecord, MatchId, MatchInputs, ScoreTimelineDocument,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed {collection} record: {detail}")]
    Malformed {
        collection: &'static str,
        detail: String,
    },

    #[error("record store backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Read-only access to the three scouting collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Video score timeline for a match, if one was recorded.
    async fn score_timeline(&self, match_id: &MatchId) -> Result<Option<ScoreTimelineDocument>, FetchError>;

    /// Timer-scout records for a match.
    async fn activity_records(&self, match_id: &MatchId) -> Result<Vec<ActivityRecord>, FetchError>;

    /// Hand-counted totals for a match. Only read when the fallback runs.
    async fn actor_totals(&self, match_id: &MatchId) -> Result<Vec<ActorTotalRecord>, FetchError>;
}

/// Fetch one match's records and attribute them.
pub async fn calculate_match(
    store: &dyn RecordStore,
    match_id: &MatchId,
    config: &EngineConfig,
) -> Result<AttributionReport, FetchError> {
    let timeline = store.score_timeline(match_id).await?;
    if let Some(doc) = &timeline {
        ensure_match("scoreTimeline", match_id, [&doc.match_id])?;
    }
    let activity = store.activity_records(match_id).await?;
    ensure_match("activity", match_id, activity.iter().map(|r| &r.match_id))?;

    let totals = if precise_ready(timeline.as_ref(), &activity) {
        Vec::new()
    } else {
        let totals = store.actor_totals(match_id).await?;
        ensure_match("totals", match_id, totals.iter().map(|r| &r.match_id))?;
        totals
    };

    let inputs = MatchInputs {
        match_id: match_id.clone(),
        timeline,
        activity,
        totals,
    };
    Ok(attribute_match(&inputs, config))
}

/// A store answering for the wrong match is returning malformed data.
fn ensure_match<'a>(
    collection: &'static str,
    requested: &MatchId,
    found: impl IntoIterator<Item = &'a MatchId>,
) -> Result<(), FetchError> {
    match found.into_iter().find(|id| *id != requested) {
        Some(other) => Err(FetchError::Malformed {
            collection,
            detail: format!("record for match {other} returned for match {requested}"),
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Serialised form of an [`InMemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub timelines: Vec<ScoreTimelineDocument>,
    pub activity: Vec<ActivityRecord>,
    pub totals: Vec<ActorTotalRecord>,
}

/// HashMap-backed store for tests, the bench and offline replays.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    timelines: HashMap<MatchId, ScoreTimelineDocument>,
    activity: Vec<ActivityRecord>,
    totals: Vec<ActorTotalRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for doc in snapshot.timelines {
            store.insert_timeline(doc);
        }
        store.activity = snapshot.activity;
        store.totals = snapshot.totals;
        store
    }

    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let snapshot: StoreSnapshot =
            serde_json::from_str(json).map_err(|e| FetchError::Malformed {
                collection: "snapshot",
                detail: e.to_string(),
            })?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn insert_timeline(&mut self, doc: ScoreTimelineDocument) {
        self.timelines.insert(doc.match_id.clone(), doc);
    }

    pub fn insert_activity(&mut self, record: ActivityRecord) {
        self.activity.push(record);
    }

    pub fn insert_total(&mut self, record: ActorTotalRecord) {
        self.totals.push(record);
    }

    /// Drop every activity record an actor filed for a match.
    pub fn remove_activity(&mut self, match_id: &MatchId, actor: &ActorId) {
        self.activity
            .retain(|r| !(&r.match_id == match_id && &r.actor_id == actor));
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn score_timeline(&self, match_id: &MatchId) -> Result<Option<ScoreTimelineDocument>, FetchError> {
        Ok(self.timelines.get(match_id).cloned())
    }

    async fn activity_records(&self, match_id: &MatchId) -> Result<Vec<ActivityRecord>, FetchError> {
        Ok(self
            .activity
            .iter()
            .filter(|r| &r.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn actor_totals(&self, match_id: &MatchId) -> Result<Vec<ActorTotalRecord>, FetchError> {
        Ok(self
            .totals
            .iter()
            .filter(|r| &r.match_id == match_id)
            .cloned()
            .collect())
    }
}
