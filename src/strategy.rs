// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Strategy Selector
//
// Picks the attribution method for one match and assembles the report.
// Precise needs the video timeline plus exactly three activity records per
// group; anything less drops to the proportional fallback.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::EngineConfig;
use crate::conservation::{audit_results, ConservationBreach};
use crate::fallback::calculate_with_fallback;
use crate::precise::{calculate_with_precise, ActorDiagnostics};
use crate::types::{
    ActivityRecord, ActorId, AttributionResult, Group, MatchId, MatchInputs, Method,
    ScoreTimelineDocument,
};

pub const ACTORS_PER_GROUP: usize = 3;

/// Complete outcome of one match attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionReport {
    pub match_id: MatchId,
    pub method: Method,
    pub results: Vec<AttributionResult>,
    /// Actors left out for lack of a corroborating record.
    pub skipped_actors: Vec<ActorId>,
    /// Precise method only.
    pub diagnostics: Vec<ActorDiagnostics>,
    pub conservation_breaches: Vec<ConservationBreach>,
}

impl AttributionReport {
    pub fn result_for(&self, actor: &ActorId) -> Option<&AttributionResult> {
        self.results.iter().find(|r| &r.actor_id == actor)
    }
}

/// Whether the records support the precise method: a timeline, six
/// distinct actors, three per group.
pub fn precise_ready(timeline: Option<&ScoreTimelineDocument>, activity: &[ActivityRecord]) -> bool {
    if timeline.is_none() || activity.len() != 2 * ACTORS_PER_GROUP {
        return false;
    }
    let distinct: BTreeSet<&ActorId> = activity.iter().map(|r| &r.actor_id).collect();
    distinct.len() == activity.len()
        && Group::BOTH.into_iter().all(|g| {
            activity.iter().filter(|r| r.group_id == g).count() == ACTORS_PER_GROUP
        })
}

pub fn select_method(timeline: Option<&ScoreTimelineDocument>, activity: &[ActivityRecord]) -> Method {
    if precise_ready(timeline, activity) {
        Method::Precise
    } else {
        Method::Fallback
    }
}

/// Run the selected method over one match's records. Records carrying a
/// different match id are ignored.
pub fn attribute_match(inputs: &MatchInputs, config: &EngineConfig) -> AttributionReport {
    let match_id = &inputs.match_id;

    let timeline = inputs.timeline.as_ref().filter(|doc| &doc.match_id == match_id);
    let activity: Vec<ActivityRecord> = inputs
        .activity
        .iter()
        .filter(|r| &r.match_id == match_id)
        .cloned()
        .collect();
    let totals: Vec<_> = inputs
        .totals
        .iter()
        .filter(|r| &r.match_id == match_id)
        .cloned()
        .collect();

    let foreign = inputs.activity.len() - activity.len() + inputs.totals.len() - totals.len();
    if foreign > 0 {
        tracing::debug!(%match_id, foreign, "ignoring records from other matches");
    }

    let method = select_method(timeline, &activity);
    tracing::info!(
        %match_id,
        %method,
        timeline = timeline.is_some(),
        activity_records = activity.len(),
        "attribution method selected"
    );

    let mut report = match (method, timeline) {
        (Method::Precise, Some(doc)) => {
            let outcome = calculate_with_precise(doc, &activity, config);
            AttributionReport {
                match_id: match_id.clone(),
                method,
                results: outcome.results,
                skipped_actors: Vec::new(),
                diagnostics: outcome.diagnostics,
                conservation_breaches: Vec::new(),
            }
        }
        _ => {
            let outcome = calculate_with_fallback(match_id, &activity, &totals, config);
            AttributionReport {
                match_id: match_id.clone(),
                method: Method::Fallback,
                results: outcome.results,
                skipped_actors: outcome.skipped,
                diagnostics: Vec::new(),
                conservation_breaches: Vec::new(),
            }
        }
    };

    for actor in &report.skipped_actors {
        tracing::warn!(%match_id, %actor, "actor skipped: missing corroborating record");
    }

    if let Some(doc) = timeline {
        report.conservation_breaches =
            audit_results(&report.results, &activity, doc, config);
    }

    report
}
