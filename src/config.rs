// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Configuration
//
// Canonical match timing and attribution constants. Every field has a
// default, so a partial JSON object only overrides what it names.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Points;

// ─── Constants ──────────────────────────────────────────────────────────────

/// Seconds from match start at which each phase ends.
pub const AUTO_END: f64 = 20.0;
pub const TRANSITION_END: f64 = 30.0;
pub const SHIFT_ENDS: [f64; 4] = [55.0, 80.0, 105.0, 130.0];
pub const MATCH_DURATION: f64 = 150.0;

pub const DELAY_BASE: f64 = 3.0;
pub const DELAY_RATE: f64 = 0.2;

/// Intervals closer than this (seconds) are treated as one scoring action.
pub const MERGE_GAP: f64 = 1.0;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("phase boundaries must strictly increase within (0, {total}]: {boundaries:?}")]
    ClockOrder { boundaries: Vec<f64>, total: f64 },

    #[error("delay constants must be non-negative (base {base}, rate {rate})")]
    NegativeDelay { base: f64, rate: f64 },

    #[error("merge gap must be non-negative, got {0}")]
    NegativeMergeGap(f64),

    #[error("conservation tolerance must be non-negative, got {0}")]
    NegativeTolerance(Points),
}

// ─── Match Clock ────────────────────────────────────────────────────────────

/// Fixed phase boundaries of a match, elapsed seconds from start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchClock {
    pub auto_end: f64,
    pub transition_end: f64,
    pub shift_ends: [f64; 4],
    pub total_duration: f64,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self {
            auto_end: AUTO_END,
            transition_end: TRANSITION_END,
            shift_ends: SHIFT_ENDS,
            total_duration: MATCH_DURATION,
        }
    }
}

impl MatchClock {
    /// Countdown display value → elapsed seconds from match start.
    pub fn to_elapsed(&self, countdown: f64) -> f64 {
        self.total_duration - countdown
    }

    /// Elapsed seconds → countdown display value.
    pub fn to_countdown(&self, elapsed: f64) -> f64 {
        self.total_duration - elapsed
    }

    pub fn is_opening(&self, elapsed: f64) -> bool {
        elapsed >= 0.0 && elapsed < self.auto_end
    }

    fn boundaries(&self) -> Vec<f64> {
        let mut b = vec![0.0, self.auto_end, self.transition_end];
        b.extend_from_slice(&self.shift_ends);
        b.push(self.total_duration);
        b
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let boundaries = self.boundaries();
        let ordered = boundaries.iter().all(|b| b.is_finite())
            && boundaries.windows(2).all(|w| w[0] < w[1]);
        if !ordered {
            return Err(ConfigError::ClockOrder {
                boundaries,
                total: self.total_duration,
            });
        }
        Ok(())
    }
}

// ─── Delay Model ────────────────────────────────────────────────────────────

/// Scoreboard latency: `delay = base + rate × duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayModel {
    pub base: f64,
    pub rate: f64,
}

impl Default for DelayModel {
    fn default() -> Self {
        Self { base: DELAY_BASE, rate: DELAY_RATE }
    }
}

impl DelayModel {
    /// A model that adds no latency; used to compare raw and widened sums.
    pub fn none() -> Self {
        Self { base: 0.0, rate: 0.0 }
    }

    pub fn delay_for(&self, duration: f64) -> f64 {
        self.base + self.rate * duration
    }
}

// ─── Engine Config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub clock: MatchClock,
    pub delay: DelayModel,
    pub merge_gap: f64,
    /// Increment values that are never scoring actions (fouls and the like).
    pub ignored_increments: Vec<Points>,
    /// Slack allowed before an over-attributed group is reported.
    pub conservation_tolerance: Points,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clock: MatchClock::default(),
            delay: DelayModel::default(),
            merge_gap: MERGE_GAP,
            ignored_increments: vec![Points(dec!(5))],
            conservation_tolerance: Points(dec!(0.5)),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock.validate()?;
        if !(self.delay.base >= 0.0 && self.delay.rate >= 0.0) {
            return Err(ConfigError::NegativeDelay {
                base: self.delay.base,
                rate: self.delay.rate,
            });
        }
        if !(self.merge_gap >= 0.0) {
            return Err(ConfigError::NegativeMergeGap(self.merge_gap));
        }
        if self.conservation_tolerance.0.is_sign_negative() {
            return Err(ConfigError::NegativeTolerance(self.conservation_tolerance));
        }
        Ok(())
    }

    pub fn is_ignored(&self, delta: Points) -> bool {
        self.ignored_increments.contains(&delta)
    }
}
