// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Period Model
//
// Derives when each group's scoring hub is usable. Auto, Transition and
// End Game are open to both groups. The four alliance shifts alternate,
// starting with the group that lost Auto; a tied Auto starts with group A.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::{EngineConfig, MatchClock};
use crate::types::{Group, Points, ScoreIncrement, ScoreTimelineDocument, Window};

// ─── Phase ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Auto,
    Transition,
    Shift1,
    Shift2,
    Shift3,
    Shift4,
    EndGame,
}

impl Phase {
    /// Match order.
    pub const ALL: [Phase; 7] = [
        Phase::Auto,
        Phase::Transition,
        Phase::Shift1,
        Phase::Shift2,
        Phase::Shift3,
        Phase::Shift4,
        Phase::EndGame,
    ];

    pub const MEDIAL: [Phase; 4] = [Phase::Shift1, Phase::Shift2, Phase::Shift3, Phase::Shift4];

    pub fn window(self, clock: &MatchClock) -> Window {
        let [s1, s2, s3, s4] = clock.shift_ends;
        match self {
            Phase::Auto => Window::new(0.0, clock.auto_end),
            Phase::Transition => Window::new(clock.auto_end, clock.transition_end),
            Phase::Shift1 => Window::new(clock.transition_end, s1),
            Phase::Shift2 => Window::new(s1, s2),
            Phase::Shift3 => Window::new(s2, s3),
            Phase::Shift4 => Window::new(s3, s4),
            Phase::EndGame => Window::new(s4, clock.total_duration),
        }
    }

    /// Zero-based position among the alternating shifts.
    pub fn medial_index(self) -> Option<usize> {
        match self {
            Phase::Shift1 => Some(0),
            Phase::Shift2 => Some(1),
            Phase::Shift3 => Some(2),
            Phase::Shift4 => Some(3),
            _ => None,
        }
    }

    /// Both groups may score during this phase.
    pub fn is_shared(self) -> bool {
        self.medial_index().is_none()
    }
}

// ─── Active Periods ─────────────────────────────────────────────────────────

/// Per-group hub windows for one match, each list ordered by start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePeriods {
    pub group_a: Vec<Window>,
    pub group_b: Vec<Window>,
    /// `None` on a tied Auto.
    pub opening_winner: Option<Group>,
}

impl ActivePeriods {
    pub fn for_group(&self, group: Group) -> &[Window] {
        match group {
            Group::A => &self.group_a,
            Group::B => &self.group_b,
        }
    }

    fn push(&mut self, group: Group, window: Window) {
        match group {
            Group::A => self.group_a.push(window),
            Group::B => self.group_b.push(window),
        }
    }

    /// Which group holds the hub for a given shift.
    pub fn medial_holder(&self, phase: Phase, clock: &MatchClock) -> Option<Group> {
        phase.medial_index()?;
        let w = phase.window(clock);
        Group::BOTH
            .into_iter()
            .find(|g| self.for_group(*g).contains(&w))
    }
}

/// Non-ignorable points a group scored during Auto. The countdown boundary
/// is inclusive: an increment shown exactly as Auto ends still counts.
pub fn opening_phase_points(timeline: &[ScoreIncrement], config: &EngineConfig) -> Points {
    let clock = &config.clock;
    timeline
        .iter()
        .filter(|inc| !config.is_ignored(inc.delta))
        .filter(|inc| {
            let elapsed = clock.to_elapsed(inc.observed_time);
            elapsed >= 0.0 && elapsed <= clock.auto_end
        })
        .map(|inc| inc.delta)
        .sum()
}

pub fn determine_active_periods(doc: &ScoreTimelineDocument, config: &EngineConfig) -> ActivePeriods {
    let a = opening_phase_points(doc.timeline(Group::A), config);
    let b = opening_phase_points(doc.timeline(Group::B), config);

    let winner = match a.cmp(&b) {
        Ordering::Greater => Some(Group::A),
        Ordering::Less => Some(Group::B),
        Ordering::Equal => None,
    };

    tracing::debug!(
        match_id = %doc.match_id,
        group_a = %a,
        group_b = %b,
        winner = ?winner,
        "opening phase compared"
    );

    active_periods_for(winner, &config.clock)
}

/// Lay out hub windows given the Auto winner (`None` = tie).
pub fn active_periods_for(winner: Option<Group>, clock: &MatchClock) -> ActivePeriods {
    // The Auto loser opens the shifts; on a tie group A does.
    let first_holder = winner.map_or(Group::A, Group::other);

    let mut periods = ActivePeriods {
        group_a: Vec::with_capacity(5),
        group_b: Vec::with_capacity(5),
        opening_winner: winner,
    };

    for phase in Phase::ALL {
        let window = phase.window(clock);
        match phase.medial_index() {
            None => {
                periods.push(Group::A, window);
                periods.push(Group::B, window);
            }
            Some(i) => {
                let holder = if i % 2 == 0 { first_holder } else { first_holder.other() };
                periods.push(holder, window);
            }
        }
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchId;

    fn doc(a_auto: i64, b_auto: i64) -> ScoreTimelineDocument {
        ScoreTimelineDocument {
            match_id: MatchId::from(1),
            group_a_score_timeline: vec![ScoreIncrement::new(140.0, a_auto)],
            group_b_score_timeline: vec![ScoreIncrement::new(135.0, b_auto)],
            group_a_total: Points::from(a_auto),
            group_b_total: Points::from(b_auto),
        }
    }

    fn holders(p: &ActivePeriods) -> Vec<Option<Group>> {
        let clock = MatchClock::default();
        Phase::MEDIAL.iter().map(|ph| p.medial_holder(*ph, &clock)).collect()
    }

    #[test]
    fn winner_sits_out_first_shift() {
        let p = determine_active_periods(&doc(10, 4), &EngineConfig::default());
        assert_eq!(p.opening_winner, Some(Group::A));
        assert_eq!(
            holders(&p),
            vec![Some(Group::B), Some(Group::A), Some(Group::B), Some(Group::A)]
        );
    }

    #[test]
    fn tie_starts_with_group_a() {
        let p = determine_active_periods(&doc(6, 6), &EngineConfig::default());
        assert_eq!(p.opening_winner, None);
        assert_eq!(
            holders(&p),
            vec![Some(Group::A), Some(Group::B), Some(Group::A), Some(Group::B)]
        );
    }

    #[test]
    fn shared_phases_listed_for_both() {
        let clock = MatchClock::default();
        let p = active_periods_for(Some(Group::B), &clock);
        for phase in [Phase::Auto, Phase::Transition, Phase::EndGame] {
            let w = phase.window(&clock);
            assert!(p.group_a.contains(&w), "{phase:?} missing for A");
            assert!(p.group_b.contains(&w), "{phase:?} missing for B");
        }
        assert_eq!(p.group_a.len() + p.group_b.len(), 6 + 4);
    }

    #[test]
    fn ignored_increments_do_not_decide_auto() {
        let mut d = doc(4, 4);
        d.group_b_score_timeline.push(ScoreIncrement::new(132.0, 5));
        let p = determine_active_periods(&d, &EngineConfig::default());
        assert_eq!(p.opening_winner, None);
    }

    #[test]
    fn auto_boundary_is_inclusive() {
        let config = EngineConfig::default();
        let on_edge = [ScoreIncrement::new(130.0, 2), ScoreIncrement::new(129.9, 7)];
        assert_eq!(opening_phase_points(&on_edge, &config), Points::from(2));
    }

    #[test]
    fn windows_are_ordered() {
        let p = active_periods_for(None, &MatchClock::default());
        for list in [&p.group_a, &p.group_b] {
            assert!(list.windows(2).all(|w| w[0].end <= w[1].start));
        }
    }
}
