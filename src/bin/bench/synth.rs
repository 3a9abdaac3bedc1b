// Synthetic Match Generator: seeded shooters with known ground truth
// Shots land on the group stream a short, random scoreboard lag after release

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

use attribution_engine::periods::{determine_active_periods, Phase};
use attribution_engine::*;

use crate::scenarios::Scenario;

const MAX_LAG: f64 = 2.5;
const FOUL_POINTS: i64 = 5;

/// True points per actor, split at the end of Auto.
#[derive(Debug, Clone, Copy, Default)]
pub struct Truth {
    pub early: f64,
    pub late: f64,
}

impl Truth {
    pub fn total(&self) -> f64 {
        self.early + self.late
    }
}

pub struct SyntheticMatch {
    pub inputs: MatchInputs,
    pub truth: HashMap<ActorId, Truth>,
}

struct Shooter {
    id: ActorId,
    group: Group,
    rate: f64,
    intervals: Vec<Window>,
}

pub struct MatchGenerator {
    rng: ChaCha8Rng,
    config: EngineConfig,
}

impl MatchGenerator {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self { rng, config: EngineConfig::default() }
    }

    pub fn generate(&mut self, scenario: &Scenario, match_no: u32) -> SyntheticMatch {
        let match_id = MatchId::from(match_no);
        let clock = self.config.clock.clone();

        let mut shooters: Vec<Shooter> = Group::BOTH
            .into_iter()
            .flat_map(|g| {
                let base: u32 = if g == Group::A { 100 } else { 200 };
                (1..=3).map(move |k| (g, base + k))
            })
            .map(|(group, n)| Shooter {
                id: ActorId::from(n),
                group,
                rate: self.rng.gen_range(0.4..1.6),
                intervals: Vec::new(),
            })
            .collect();

        // Auto: one burst each, both hubs live
        for s in &mut shooters {
            let start = self.rng.gen_range(0.0..12.0);
            let len = self.rng.gen_range(2.0..6.0);
            s.intervals.push(Window::new(start, (start + len).min(clock.auto_end)));
        }

        let mut doc = ScoreTimelineDocument {
            match_id: match_id.clone(),
            group_a_score_timeline: Vec::new(),
            group_b_score_timeline: Vec::new(),
            group_a_total: Points::zero(),
            group_b_total: Points::zero(),
        };
        let mut truth: HashMap<ActorId, Truth> = HashMap::new();
        for s in &shooters {
            let w = s.intervals[0];
            self.emit(&mut doc, &mut truth, s, w);
        }

        // Teleop bursts inside the group's live windows
        let periods = determine_active_periods(&doc, &self.config);
        for i in 0..shooters.len() {
            let group = shooters[i].group;
            let live: Vec<Window> = periods
                .for_group(group)
                .iter()
                .copied()
                .filter(|w| *w != Phase::Auto.window(&clock))
                .collect();
            let bursts = self.rng.gen_range(2..=4);
            for _ in 0..bursts {
                let allow_overlap = self.rng.gen_bool(scenario.contention);
                if let Some(w) = self.place_burst(&live, &shooters, i, allow_overlap) {
                    shooters[i].intervals.push(w);
                    let s = &shooters[i];
                    self.emit(&mut doc, &mut truth, s, w);
                }
            }
        }

        for group in Group::BOTH {
            for _ in 0..scenario.fouls_per_group {
                let elapsed = self.rng.gen_range(0.0..clock.total_duration);
                push_increment(&mut doc, group, clock.to_countdown(elapsed), FOUL_POINTS);
            }
        }

        let mut activity: Vec<ActivityRecord> = shooters
            .iter()
            .map(|s| ActivityRecord {
                match_id: match_id.clone(),
                actor_id: s.id.clone(),
                group_id: s.group,
                intervals: s.intervals.iter().map(|w| ActivityInterval::new(w.start, w.end)).collect(),
            })
            .collect();

        let totals = shooters
            .iter()
            .map(|s| {
                let t = truth.get(&s.id).map(Truth::total).unwrap_or(0.0) as i64;
                let noise = if scenario.counting_noise > 0 {
                    self.rng.gen_range(-scenario.counting_noise..=scenario.counting_noise)
                } else {
                    0
                };
                ActorTotalRecord {
                    match_id: match_id.clone(),
                    actor_id: s.id.clone(),
                    total_score: Points::from((t + noise).max(0)),
                }
            })
            .collect();

        if scenario.drop_activity_record {
            let idx = self.rng.gen_range(0..activity.len());
            activity.remove(idx);
        }

        SyntheticMatch {
            inputs: MatchInputs {
                match_id,
                timeline: (!scenario.drop_timeline).then_some(doc),
                activity,
                totals,
            },
            truth,
        }
    }

    /// Pick a burst inside one live window, avoiding teammates unless
    /// overlap is allowed. Gives up after a few tries.
    fn place_burst(&mut self, live: &[Window], shooters: &[Shooter], me: usize, allow_overlap: bool) -> Option<Window> {
        for _ in 0..10 {
            let host = live[self.rng.gen_range(0..live.len())];
            let len = self.rng.gen_range(2.0..8.0_f64).min(host.duration());
            let start = self.rng.gen_range(host.start..=(host.end - len));
            let w = Window::new(start, start + len);

            let own_clash = shooters[me].intervals.iter().any(|o| o.overlaps(&w));
            let mate_clash = shooters
                .iter()
                .enumerate()
                .filter(|(j, s)| *j != me && s.group == shooters[me].group)
                .any(|(_, s)| s.intervals.iter().any(|o| o.overlaps(&w)));

            if !own_clash && (allow_overlap || !mate_clash) {
                return Some(w);
            }
        }
        None
    }

    /// Release whole-point shots across `w` at the shooter's rate.
    fn emit(&mut self, doc: &mut ScoreTimelineDocument, truth: &mut HashMap<ActorId, Truth>, s: &Shooter, w: Window) {
        let clock = &self.config.clock;
        let shots = (s.rate * w.duration()).round() as i64;
        let entry = truth.entry(s.id.clone()).or_default();
        for _ in 0..shots {
            let release = self.rng.gen_range(w.start..w.end);
            let shown = (release + self.rng.gen_range(0.2..MAX_LAG)).min(clock.total_duration);
            push_increment(doc, s.group, clock.to_countdown(shown), 1);
            if clock.is_opening(w.start) {
                entry.early += 1.0;
            } else {
                entry.late += 1.0;
            }
        }
    }
}

fn push_increment(doc: &mut ScoreTimelineDocument, group: Group, countdown: f64, delta: i64) {
    let inc = ScoreIncrement::new(countdown, delta);
    match group {
        Group::A => {
            doc.group_a_score_timeline.push(inc);
            doc.group_a_total = doc.group_a_total + Points::from(delta);
        }
        Group::B => {
            doc.group_b_score_timeline.push(inc);
            doc.group_b_total = doc.group_b_total + Points::from(delta);
        }
    }
}
