// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Type Definitions
//
// Input records arrive from the scouting store in JSON form. Field names
// are camelCase; the legacy scouting-app names are accepted as aliases.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Ids are stored as strings; the scouting app writes team and match
/// numbers as bare JSON numbers, so both forms are accepted.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

/// Match identifier (the store document key).
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self { MatchId(s.to_string()) }
}

impl From<u32> for MatchId {
    fn from(n: u32) -> Self { MatchId(n.to_string()) }
}

/// Actor (team) identifier.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(#[serde(deserialize_with = "string_or_number")] pub String);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActorId {
    fn from(s: &str) -> Self { ActorId(s.to_string()) }
}

impl From<u32> for ActorId {
    fn from(n: u32) -> Self { ActorId(n.to_string()) }
}

// ─── Group ───────────────────────────────────────────────────────────────────

/// One of the two competing three-actor collectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    #[serde(rename = "a", alias = "A", alias = "red")]
    A,
    #[serde(rename = "b", alias = "B", alias = "blue")]
    B,
}

impl Group {
    pub const BOTH: [Group; 2] = [Group::A, Group::B];

    pub fn other(self) -> Group {
        match self {
            Group::A => Group::B,
            Group::B => Group::A,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::A => write!(f, "A"),
            Group::B => write!(f, "B"),
        }
    }
}

// ─── Points ──────────────────────────────────────────────────────────────────

/// Score quantity backed by `rust_decimal::Decimal`, serialised as a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Points(#[serde(with = "rust_decimal::serde::float")] pub Decimal);

impl Points {
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn from_decimal(d: Decimal) -> Self {
        Self(d)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<i64> for Points {
    fn from(n: i64) -> Self { Points(Decimal::from(n)) }
}

impl Add for Points {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Points {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Points {
    type Output = Self;
    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Points::zero(), |acc, p| acc + p)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pts", self.0.normalize())
    }
}

// ─── Window ──────────────────────────────────────────────────────────────────

/// Half-open `[start, end)` span in elapsed seconds from match start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn intersect(&self, other: &Window) -> Option<Window> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then(|| Window::new(start, end))
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

pub fn total_duration(windows: &[Window]) -> f64 {
    windows.iter().map(Window::duration).sum()
}

// ─── Raw Input Records ───────────────────────────────────────────────────────

/// One timed scoring action, elapsed seconds from match start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityInterval {
    #[serde(alias = "startShootTime")]
    pub start: f64,
    #[serde(alias = "endShootTime")]
    pub end: f64,
}

impl ActivityInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn window(&self) -> Window {
        Window::new(self.start, self.end)
    }
}

/// A single entry of a group's shared score stream. `observed_time` is the
/// match countdown clock (time remaining) at which the display changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreIncrement {
    #[serde(alias = "time")]
    pub observed_time: f64,
    #[serde(alias = "score")]
    pub delta: Points,
}

impl ScoreIncrement {
    pub fn new(observed_time: f64, delta: i64) -> Self {
        Self { observed_time, delta: Points::from(delta) }
    }
}

/// Video-derived score timelines for both groups of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTimelineDocument {
    #[serde(alias = "match", alias = "matchNumber")]
    pub match_id: MatchId,
    #[serde(default, alias = "redScoreTimeline")]
    pub group_a_score_timeline: Vec<ScoreIncrement>,
    #[serde(default, alias = "blueScoreTimeline")]
    pub group_b_score_timeline: Vec<ScoreIncrement>,
    #[serde(default, alias = "redTotalScore")]
    pub group_a_total: Points,
    #[serde(default, alias = "blueTotalScore")]
    pub group_b_total: Points,
}

impl ScoreTimelineDocument {
    pub fn timeline(&self, group: Group) -> &[ScoreIncrement] {
        match group {
            Group::A => &self.group_a_score_timeline,
            Group::B => &self.group_b_score_timeline,
        }
    }

    pub fn total(&self, group: Group) -> Points {
        match group {
            Group::A => self.group_a_total,
            Group::B => self.group_b_total,
        }
    }
}

/// Timer-scout record: one actor's shooting intervals for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(alias = "match")]
    pub match_id: MatchId,
    #[serde(alias = "team")]
    pub actor_id: ActorId,
    #[serde(alias = "alliance")]
    pub group_id: Group,
    #[serde(default, alias = "shootingTimes")]
    pub intervals: Vec<ActivityInterval>,
}

/// Fuel-scout record: a hand-counted score total for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorTotalRecord {
    #[serde(alias = "match")]
    pub match_id: MatchId,
    #[serde(alias = "team")]
    pub actor_id: ActorId,
    #[serde(alias = "totalFuel")]
    pub total_score: Points,
}

/// Everything the engine needs for one match, fully materialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInputs {
    pub match_id: MatchId,
    #[serde(default)]
    pub timeline: Option<ScoreTimelineDocument>,
    #[serde(default)]
    pub activity: Vec<ActivityRecord>,
    #[serde(default)]
    pub totals: Vec<ActorTotalRecord>,
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Precise,
    Fallback,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Precise => write!(f, "precise"),
            Method::Fallback => write!(f, "fallback"),
        }
    }
}

/// Per-actor phase-split score, the engine's externally visible result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResult {
    pub actor_id: ActorId,
    pub match_id: MatchId,
    pub early_phase_score: Points,
    pub late_phase_score: Points,
    pub method: Method,
}

impl AttributionResult {
    pub fn total(&self) -> Points {
        self.early_phase_score + self.late_phase_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn window_overlap_is_half_open() {
        let a = Window::new(10.0, 20.0);
        assert!(a.overlaps(&Window::new(15.0, 25.0)));
        assert!(!a.overlaps(&Window::new(20.0, 30.0)));
        assert!(!a.overlaps(&Window::new(0.0, 10.0)));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn window_intersect_drops_empty() {
        let a = Window::new(10.0, 20.0);
        assert_eq!(a.intersect(&Window::new(15.0, 40.0)), Some(Window::new(15.0, 20.0)));
        assert_eq!(a.intersect(&Window::new(20.0, 40.0)), None);
    }

    #[test]
    fn legacy_timeline_fields_deserialize() {
        let doc: ScoreTimelineDocument = serde_json::from_str(
            r#"{
                "match": 12,
                "redScoreTimeline": [{"time": 140.5, "score": 3}],
                "blueScoreTimeline": [],
                "redTotalScore": 40,
                "blueTotalScore": 22.5
            }"#,
        )
        .expect("test: legacy document");

        assert_eq!(doc.match_id, MatchId::from("12"));
        assert_eq!(doc.timeline(Group::A)[0].delta, Points(dec!(3)));
        assert_eq!(doc.total(Group::B), Points(dec!(22.5)));
    }

    #[test]
    fn legacy_activity_record_deserializes() {
        let rec: ActivityRecord = serde_json::from_str(
            r#"{
                "match": "7",
                "team": 1768,
                "alliance": "blue",
                "shootingTimes": [{"startShootTime": 31.0, "endShootTime": 36.5, "duration": 5.5}]
            }"#,
        )
        .expect("test: legacy activity record");

        assert_eq!(rec.actor_id, ActorId::from("1768"));
        assert_eq!(rec.group_id, Group::B);
        assert_eq!(rec.intervals, vec![ActivityInterval::new(31.0, 36.5)]);
    }

    #[test]
    fn result_serializes_points_as_numbers() {
        let r = AttributionResult {
            actor_id: ActorId::from("254"),
            match_id: MatchId::from(3),
            early_phase_score: Points(dec!(4)),
            late_phase_score: Points(dec!(12.5)),
            method: Method::Precise,
        };
        let json = serde_json::to_value(&r).expect("test: serialize");
        assert_eq!(json["latePhaseScore"], serde_json::json!(12.5));
        assert_eq!(json["method"], "precise");
    }
}
