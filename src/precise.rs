// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Precise Method
//
// Video-corroborated attribution. Both groups run through the same
// pipeline, parameterised only by which group's stream and hub windows
// are in play: merge → exclusivity → delay-compensated aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregator::{aggregate_actor, AllianceContext};
use crate::config::EngineConfig;
use crate::exclusivity::resolve_exclusivity;
use crate::periods::{determine_active_periods, ActivePeriods};
use crate::types::{
    total_duration, ActivityRecord, ActorId, AttributionResult, Group, Method,
    ScoreTimelineDocument, Window,
};
use crate::windows::{normalize_activity, sanitize_intervals};

/// Intermediate figures behind one actor's precise result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorDiagnostics {
    pub actor_id: ActorId,
    pub group: Group,
    pub merged_windows: usize,
    pub exclusive_windows: usize,
    pub exclusive_seconds: f64,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub points_per_second: Option<Decimal>,
    pub used_alliance_average: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreciseOutcome {
    pub periods: ActivePeriods,
    pub results: Vec<AttributionResult>,
    pub diagnostics: Vec<ActorDiagnostics>,
}

pub fn calculate_with_precise(
    doc: &ScoreTimelineDocument,
    activity: &[ActivityRecord],
    config: &EngineConfig,
) -> PreciseOutcome {
    let periods = determine_active_periods(doc, config);
    let mut outcome = PreciseOutcome {
        periods,
        results: Vec::with_capacity(activity.len()),
        diagnostics: Vec::with_capacity(activity.len()),
    };

    for group in Group::BOTH {
        let members: Vec<&ActivityRecord> =
            activity.iter().filter(|r| r.group_id == group).collect();
        let active = outcome.periods.for_group(group).to_vec();
        attribute_group(group, doc, &members, &active, config, &mut outcome);
    }

    outcome
}

fn attribute_group(
    group: Group,
    doc: &ScoreTimelineDocument,
    members: &[&ActivityRecord],
    active: &[Window],
    config: &EngineConfig,
    outcome: &mut PreciseOutcome,
) {
    let timeline = doc.timeline(group);

    let raw: Vec<Vec<Window>> = members
        .iter()
        .map(|r| sanitize_intervals(&r.intervals, &config.clock))
        .collect();

    let alliance = AllianceContext {
        total: doc.total(group),
        raw_seconds: raw.iter().map(|w| total_duration(w)).sum(),
    };

    for (record, own_raw) in members.iter().zip(&raw) {
        let merged = normalize_activity(own_raw, active, config.merge_gap);

        let peers: Vec<Window> = members
            .iter()
            .zip(&raw)
            .filter(|(peer, _)| peer.actor_id != record.actor_id)
            .flat_map(|(_, windows)| windows.iter().copied())
            .collect();

        let exclusivity = resolve_exclusivity(&merged, &peers);
        let agg = aggregate_actor(timeline, &merged, &exclusivity, &alliance, config);

        if agg.used_alliance_average {
            tracing::debug!(
                actor = %record.actor_id,
                %group,
                "no exclusive windows, using alliance average rate"
            );
        }

        outcome.diagnostics.push(ActorDiagnostics {
            actor_id: record.actor_id.clone(),
            group,
            merged_windows: merged.len(),
            exclusive_windows: exclusivity.exclusive.len(),
            exclusive_seconds: exclusivity.exclusive_seconds(),
            points_per_second: agg.points_per_second,
            used_alliance_average: agg.used_alliance_average,
        });

        outcome.results.push(AttributionResult {
            actor_id: record.actor_id.clone(),
            match_id: doc.match_id.clone(),
            early_phase_score: agg.split.early,
            late_phase_score: agg.split.late,
            method: Method::Precise,
        });
    }
}
