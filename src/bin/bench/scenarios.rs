// Scenario Definitions: synthetic match conditions for the accuracy bench
// Each scenario varies contention, foul noise and record completeness

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    /// Probability that a shooting interval may overlap a teammate's.
    pub contention: f64,
    /// Expected foul (ignorable) increments per group per match.
    pub fouls_per_group: u32,
    /// Max absolute miscount (points) in hand-counted totals.
    pub counting_noise: i64,
    /// Remove one timer record so the precise method is unavailable.
    pub drop_activity_record: bool,
    /// Remove the video timeline entirely.
    pub drop_timeline: bool,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Upper bound on mean absolute per-actor total error (points).
    pub max_mean_abs_error: f64,
    pub require_reconciled_fallback: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            max_mean_abs_error: 6.0,
            require_reconciled_fallback: false,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "",
            label: "",
            category: "",
            contention: 0.0,
            fouls_per_group: 0,
            counting_noise: 0,
            drop_activity_record: false,
            drop_timeline: false,
            criteria: PassCriteria::default(),
        }
    }
}

// ─── Scenario Catalogue ─────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "PRECISE_CLEAN",
            label: "Precise: sequential shooters",
            category: "precise",
            ..Scenario::default()
        },
        Scenario {
            name: "PRECISE_CONTENDED",
            label: "Precise: heavy teammate overlap",
            category: "precise",
            contention: 0.6,
            criteria: PassCriteria { max_mean_abs_error: 12.0, ..PassCriteria::default() },
            ..Scenario::default()
        },
        Scenario {
            name: "PRECISE_FOULS",
            label: "Precise: foul increments on stream",
            category: "precise",
            contention: 0.2,
            fouls_per_group: 3,
            ..Scenario::default()
        },
        Scenario {
            name: "FALLBACK_MISSING_TIMER",
            label: "Fallback: one timer record missing",
            category: "fallback",
            counting_noise: 2,
            drop_activity_record: true,
            criteria: PassCriteria {
                max_mean_abs_error: 3.0,
                require_reconciled_fallback: true,
            },
            ..Scenario::default()
        },
        Scenario {
            name: "FALLBACK_NO_VIDEO",
            label: "Fallback: no video timeline",
            category: "fallback",
            contention: 0.3,
            counting_noise: 1,
            drop_timeline: true,
            criteria: PassCriteria {
                max_mean_abs_error: 2.0,
                require_reconciled_fallback: true,
            },
            ..Scenario::default()
        },
    ]
}
