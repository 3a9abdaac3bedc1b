// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Delay-Compensated Aggregator
//
// Reads a group's shared score stream into per-window point sums. The
// scoreboard lags the physical action, so each window's end is pushed out
// by `base + rate × duration` before counting; the start never moves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapter::{per_second, points_over};
use crate::config::{DelayModel, EngineConfig};
use crate::exclusivity::Exclusivity;
use crate::types::{total_duration, Points, ScoreIncrement, Window};

// ---------------------------------------------------------------------------
// Window sums
// ---------------------------------------------------------------------------

/// Non-ignorable points whose elapsed time falls in `[start, end)`.
pub fn points_in_window(timeline: &[ScoreIncrement], window: Window, config: &EngineConfig) -> Points {
    let clock = &config.clock;
    timeline
        .iter()
        .filter(|inc| !config.is_ignored(inc.delta))
        .filter(|inc| window.contains(clock.to_elapsed(inc.observed_time)))
        .map(|inc| inc.delta)
        .sum()
}

/// `window` widened by the scoreboard delay for its own duration.
pub fn compensated(window: Window, delay: &DelayModel) -> Window {
    Window::new(window.start, window.end + delay.delay_for(window.duration()))
}

pub fn delayed_points(timeline: &[ScoreIncrement], window: Window, config: &EngineConfig) -> Points {
    points_in_window(timeline, compensated(window, &config.delay), config)
}

// ---------------------------------------------------------------------------
// Per-actor aggregation
// ---------------------------------------------------------------------------

/// Points split at the end of Auto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSplit {
    pub early: Points,
    pub late: Points,
}

impl PhaseSplit {
    pub fn total(&self) -> Points {
        self.early + self.late
    }
}

/// Group-wide figures for the shared-rate fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllianceContext {
    /// The group's recorded final score.
    pub total: Points,
    /// Summed raw (uncropped) interval seconds of every group member.
    pub raw_seconds: f64,
}

impl AllianceContext {
    pub fn average_rate(&self) -> Decimal {
        per_second(self.total, self.raw_seconds).unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorAggregate {
    pub split: PhaseSplit,
    /// Exclusive-window scoring rate; `None` without exclusive time.
    pub points_per_second: Option<Decimal>,
    pub used_alliance_average: bool,
}

/// Scoring rate observed while the actor shot alone.
pub fn exclusive_rate(
    timeline: &[ScoreIncrement],
    exclusive: &[Window],
    config: &EngineConfig,
) -> Option<Decimal> {
    if exclusive.is_empty() {
        return None;
    }
    let scored: Points = exclusive
        .iter()
        .map(|w| delayed_points(timeline, *w, config))
        .sum();
    per_second(scored, total_duration(exclusive))
}

/// Delay-compensated points for every merged window, bucketed by whether
/// the window starts inside Auto.
pub fn phase_totals(timeline: &[ScoreIncrement], merged: &[Window], config: &EngineConfig) -> PhaseSplit {
    merged.iter().fold(PhaseSplit::default(), |mut split, w| {
        let pts = delayed_points(timeline, *w, config);
        if config.clock.is_opening(w.start) {
            split.early = split.early + pts;
        } else {
            split.late = split.late + pts;
        }
        split
    })
}

/// Whole-alliance rate applied to the actor's merged seconds. Auto share
/// cannot be separated without exclusive time and is reported as zero.
pub fn alliance_average_split(merged: &[Window], alliance: &AllianceContext) -> PhaseSplit {
    PhaseSplit {
        early: Points::zero(),
        late: points_over(alliance.average_rate(), total_duration(merged)),
    }
}

pub fn aggregate_actor(
    timeline: &[ScoreIncrement],
    merged: &[Window],
    exclusivity: &Exclusivity,
    alliance: &AllianceContext,
    config: &EngineConfig,
) -> ActorAggregate {
    let points_per_second = exclusive_rate(timeline, &exclusivity.exclusive, config);

    if exclusivity.exclusive.is_empty() && !merged.is_empty() {
        return ActorAggregate {
            split: alliance_average_split(merged, alliance),
            points_per_second,
            used_alliance_average: true,
        };
    }

    ActorAggregate {
        split: phase_totals(timeline, merged, config),
        points_per_second,
        used_alliance_average: false,
    }
}
