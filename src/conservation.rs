// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Conservation Check
//
// Attributed points for a group should never exceed what the group's
// scoreboard recorded, both over the whole match and within Auto:
//
//     Σ actor (early + late)  <=  group total + tolerance
//     Σ actor early           <=  group Auto stream points + tolerance
//
// Overlapping delay windows can double count a shared increment, so a
// breach is possible. Breaches are reported, never corrected.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::config::EngineConfig;
use crate::periods::opening_phase_points;
use crate::types::{ActivityRecord, ActorId, AttributionResult, Group, Points, ScoreTimelineDocument};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Which slice of the match a group total covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditScope {
    Match,
    Opening,
}

impl fmt::Display for AuditScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditScope::Match => write!(f, "match"),
            AuditScope::Opening => write!(f, "opening"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConservationError {
    #[error("group {group} over-attributed ({scope}): {attributed} assigned against a recorded {recorded}")]
    GroupTotalExceeded {
        group: Group,
        scope: AuditScope,
        attributed: Points,
        recorded: Points,
    },
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConservationBreach {
    pub group: Group,
    pub scope: AuditScope,
    pub attributed: Points,
    pub recorded: Points,
}

impl From<ConservationError> for ConservationBreach {
    fn from(err: ConservationError) -> Self {
        match err {
            ConservationError::GroupTotalExceeded { group, scope, attributed, recorded } => {
                ConservationBreach { group, scope, attributed, recorded }
            }
        }
    }
}

pub fn verify_group_total(
    group: Group,
    scope: AuditScope,
    attributed: Points,
    recorded: Points,
    tolerance: Points,
) -> Result<(), ConservationError> {
    if attributed > recorded + tolerance {
        return Err(ConservationError::GroupTotalExceeded { group, scope, attributed, recorded });
    }
    Ok(())
}

/// Sum results per group (membership taken from the activity records) and
/// compare the match and Auto sums against the scoreboard.
pub fn audit_results(
    results: &[AttributionResult],
    activity: &[ActivityRecord],
    doc: &ScoreTimelineDocument,
    config: &EngineConfig,
) -> Vec<ConservationBreach> {
    let membership: HashMap<&ActorId, Group> =
        activity.iter().map(|r| (&r.actor_id, r.group_id)).collect();
    let tolerance = config.conservation_tolerance;

    Group::BOTH
        .into_iter()
        .flat_map(|group| {
            let members: Vec<&AttributionResult> = results
                .iter()
                .filter(|r| membership.get(&r.actor_id) == Some(&group))
                .collect();
            let match_sum: Points = members.iter().map(|r| r.total()).sum();
            let opening_sum: Points = members.iter().map(|r| r.early_phase_score).sum();
            let opening_recorded = opening_phase_points(doc.timeline(group), config);

            [
                verify_group_total(group, AuditScope::Match, match_sum, doc.total(group), tolerance),
                verify_group_total(group, AuditScope::Opening, opening_sum, opening_recorded, tolerance),
            ]
        })
        .filter_map(|check| {
            check
                .map_err(|err| {
                    tracing::warn!(error = %err, match_id = %doc.match_id, "conservation breach");
                    ConservationBreach::from(err)
                })
                .err()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
