// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Fallback Proportional Split
//
// Used when video corroboration is incomplete. Each actor's hand-counted
// total is split between Auto and the rest of the match in proportion to
// the time the actor spent shooting on either side of the Auto boundary.
// No cropping to hub periods and no delay compensation apply here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::adapter::{round_whole, to_decimal};
use crate::aggregator::PhaseSplit;
use crate::config::EngineConfig;
use crate::types::{
    ActivityRecord, ActorId, ActorTotalRecord, AttributionResult, MatchId, Method, Points, Window,
};
use crate::windows::sanitize_intervals;

// ---------------------------------------------------------------------------
// Time split
// ---------------------------------------------------------------------------

/// Shooting seconds either side of the Auto boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSplit {
    pub early_seconds: f64,
    pub late_seconds: f64,
}

impl TimeSplit {
    pub fn total(&self) -> f64 {
        self.early_seconds + self.late_seconds
    }
}

/// Clip every interval at `boundary`; spanning intervals contribute to both sides.
pub fn split_time_at(windows: &[Window], boundary: f64) -> TimeSplit {
    windows.iter().fold(TimeSplit::default(), |mut split, w| {
        if w.end <= boundary {
            split.early_seconds += w.duration();
        } else if w.start >= boundary {
            split.late_seconds += w.duration();
        } else {
            split.early_seconds += boundary - w.start;
            split.late_seconds += w.end - boundary;
        }
        split
    })
}

/// Early share rounded to a whole point; late takes the remainder so the
/// two always sum to `total` exactly.
pub fn distribute_total(total: Points, time: TimeSplit) -> PhaseSplit {
    let total_seconds = to_decimal(time.total());
    let early = if total_seconds > rust_decimal::Decimal::ZERO {
        let share = to_decimal(time.early_seconds) / total_seconds;
        round_whole(total * share)
    } else {
        Points::zero()
    };
    PhaseSplit { early, late: total - early }
}

// ---------------------------------------------------------------------------
// Match-level fallback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackOutcome {
    pub results: Vec<AttributionResult>,
    /// Actors missing either their activity record or their total record.
    pub skipped: Vec<ActorId>,
}

pub fn calculate_with_fallback(
    match_id: &MatchId,
    activity: &[ActivityRecord],
    totals: &[ActorTotalRecord],
    config: &EngineConfig,
) -> FallbackOutcome {
    let by_actor: HashMap<&ActorId, &ActivityRecord> =
        activity.iter().map(|r| (&r.actor_id, r)).collect();

    let mut outcome = FallbackOutcome::default();
    let mut seen: BTreeSet<&ActorId> = BTreeSet::new();

    for total in totals {
        if !seen.insert(&total.actor_id) {
            tracing::warn!(actor = %total.actor_id, "duplicate total record ignored");
            continue;
        }
        let Some(record) = by_actor.get(&total.actor_id) else {
            outcome.skipped.push(total.actor_id.clone());
            continue;
        };

        let windows = sanitize_intervals(&record.intervals, &config.clock);
        let time = split_time_at(&windows, config.clock.auto_end);
        let split = distribute_total(total.total_score, time);

        tracing::debug!(
            actor = %total.actor_id,
            early_seconds = time.early_seconds,
            late_seconds = time.late_seconds,
            early = %split.early,
            late = %split.late,
            "fallback split"
        );

        outcome.results.push(AttributionResult {
            actor_id: total.actor_id.clone(),
            match_id: match_id.clone(),
            early_phase_score: split.early,
            late_phase_score: split.late,
            method: Method::Fallback,
        });
    }

    let untotalled = activity
        .iter()
        .map(|r| &r.actor_id)
        .filter(|id| !seen.contains(id))
        .collect::<BTreeSet<_>>();
    outcome.skipped.extend(untotalled.into_iter().cloned());

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityInterval, Group};
    use rust_decimal_macros::dec;

    fn w(start: f64, end: f64) -> Window {
        Window::new(start, end)
    }

    fn activity(actor: &str, intervals: &[(f64, f64)]) -> ActivityRecord {
        ActivityRecord {
            match_id: MatchId::from(9),
            actor_id: ActorId::from(actor),
            group_id: Group::A,
            intervals: intervals.iter().map(|&(s, e)| ActivityInterval::new(s, e)).collect(),
        }
    }

    fn total(actor: &str, pts: i64) -> ActorTotalRecord {
        ActorTotalRecord {
            match_id: MatchId::from(9),
            actor_id: ActorId::from(actor),
            total_score: Points::from(pts),
        }
    }

    #[test]
    fn spanning_interval_splits_at_boundary() {
        let t = split_time_at(&[w(5.0, 10.0), w(15.0, 25.0), w(40.0, 45.0)], 20.0);
        assert_eq!(t.early_seconds, 10.0);
        assert_eq!(t.late_seconds, 10.0);
    }

    #[test]
    fn distribution_reconciles_exactly() {
        let split = distribute_total(
            Points::from(7),
            TimeSplit { early_seconds: 1.0, late_seconds: 2.0 },
        );
        // 7 × 1/3 = 2.33 → 2
        assert_eq!(split.early, Points::from(2));
        assert_eq!(split.late, Points::from(5));
        assert_eq!(split.total(), Points::from(7));
    }

    #[test]
    fn half_share_rounds_up() {
        let split = distribute_total(
            Points::from(5),
            TimeSplit { early_seconds: 3.0, late_seconds: 3.0 },
        );
        assert_eq!(split.early, Points(dec!(3)));
        assert_eq!(split.late, Points(dec!(2)));
    }

    #[test]
    fn no_shooting_time_puts_everything_late() {
        let split = distribute_total(Points::from(12), TimeSplit::default());
        assert_eq!(split.early, Points::zero());
        assert_eq!(split.late, Points::from(12));
    }

    #[test]
    fn actors_without_both_records_are_skipped() {
        let acts = [activity("1", &[(2.0, 6.0)]), activity("2", &[(40.0, 50.0)])];
        let tots = [total("1", 8), total("3", 4)];
        let out = calculate_with_fallback(&MatchId::from(9), &acts, &tots, &EngineConfig::default());

        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].actor_id, ActorId::from("1"));
        assert_eq!(out.results[0].early_phase_score, Points::from(8));
        assert_eq!(out.results[0].method, Method::Fallback);
        assert_eq!(out.skipped, vec![ActorId::from("3"), ActorId::from("2")]);
    }
}
