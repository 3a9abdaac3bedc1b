//! Property-based tests for the attribution pipeline.
//!
//! Covers the structural guarantees of each stage: hub windows never
//! double-assign a shift, merging is stable, exclusivity respects peers,
//! delay widening only adds points, and the fallback split conserves the
//! counted total.

#![cfg(not(target_arch = "wasm32"))]

use attribution_engine::aggregator::{delayed_points, points_in_window};
use attribution_engine::exclusivity::resolve_exclusivity;
use attribution_engine::fallback::{distribute_total, split_time_at, TimeSplit};
use attribution_engine::periods::{determine_active_periods, Phase};
use attribution_engine::windows::merge_close_windows;
use attribution_engine::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn increment_strategy() -> impl Strategy<Value = ScoreIncrement> {
    (0.0..150.0f64, 1i64..10).prop_map(|(observed, delta)| ScoreIncrement::new(observed, delta))
}

fn timeline_strategy() -> impl Strategy<Value = ScoreTimelineDocument> {
    (
        prop::collection::vec(increment_strategy(), 0..20),
        prop::collection::vec(increment_strategy(), 0..20),
    )
        .prop_map(|(a, b)| {
            let a_total = a.iter().map(|i| i.delta).sum();
            let b_total = b.iter().map(|i| i.delta).sum();
            ScoreTimelineDocument {
                match_id: MatchId::from(1),
                group_a_score_timeline: a,
                group_b_score_timeline: b,
                group_a_total: a_total,
                group_b_total: b_total,
            }
        })
}

/// Strictly increasing phase boundaries built from seven positive phase lengths.
fn clock_strategy() -> impl Strategy<Value = MatchClock> {
    prop::array::uniform7(1.0..40.0f64).prop_map(|lengths| {
        let mut ends = [0.0f64; 7];
        let mut cursor = 0.0;
        for (end, len) in ends.iter_mut().zip(lengths) {
            cursor += len;
            *end = cursor;
        }
        MatchClock {
            auto_end: ends[0],
            transition_end: ends[1],
            shift_ends: [ends[2], ends[3], ends[4], ends[5]],
            total_duration: ends[6],
        }
    })
}

fn window_strategy() -> impl Strategy<Value = Window> {
    (0.0..140.0f64, 0.1..10.0f64).prop_map(|(start, len)| Window::new(start, start + len))
}

/// Windows laid left to right with every gap strictly wider than `min_gap`.
fn spaced_windows(min_gap: f64) -> impl Strategy<Value = Vec<Window>> {
    prop::collection::vec((0.01..5.0f64, 0.1..8.0f64), 1..12).prop_map(move |parts| {
        let mut cursor = 0.0;
        parts
            .into_iter()
            .map(|(extra_gap, len)| {
                let start = cursor + min_gap + extra_gap;
                cursor = start + len;
                Window::new(start, cursor)
            })
            .collect()
    })
}

// ============================================================================
// Active periods
// ============================================================================

proptest! {
    #[test]
    fn prop_generated_clocks_validate(clock in clock_strategy()) {
        prop_assert!(clock.validate().is_ok(), "{:?}", clock);
    }

    #[test]
    fn prop_each_shift_has_exactly_one_holder(clock in clock_strategy(), doc in timeline_strategy()) {
        let config = EngineConfig { clock, ..EngineConfig::default() };
        let periods = determine_active_periods(&doc, &config);

        for phase in Phase::ALL {
            let w = phase.window(&config.clock);
            let holders = Group::BOTH
                .into_iter()
                .filter(|g| periods.for_group(*g).contains(&w))
                .count();
            let expected = if phase.is_shared() { 2 } else { 1 };
            prop_assert_eq!(holders, expected, "{:?}", phase);
        }
    }

    #[test]
    fn prop_group_windows_are_disjoint(clock in clock_strategy(), doc in timeline_strategy()) {
        let config = EngineConfig { clock, ..EngineConfig::default() };
        let periods = determine_active_periods(&doc, &config);

        for g in Group::BOTH {
            let windows = periods.for_group(g);
            for pair in windows.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start, "{} windows overlap: {:?}", g, pair);
            }
        }
    }

    #[test]
    fn prop_tie_alternation_is_fixed_and_repeatable(
        clock in clock_strategy(),
        delta in 1i64..5,
        fraction in 0.0..1.0f64,
    ) {
        let config = EngineConfig { clock, ..EngineConfig::default() };
        let clock = &config.clock;
        let inc = ScoreIncrement::new(clock.to_countdown(fraction * clock.auto_end), delta);
        let doc = ScoreTimelineDocument {
            match_id: MatchId::from(1),
            group_a_score_timeline: vec![inc],
            group_b_score_timeline: vec![inc],
            group_a_total: inc.delta,
            group_b_total: inc.delta,
        };

        let first = determine_active_periods(&doc, &config);
        let second = determine_active_periods(&doc, &config);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.opening_winner, None);
        let holders: Vec<Option<Group>> = Phase::MEDIAL
            .iter()
            .map(|phase| first.medial_holder(*phase, clock))
            .collect();
        prop_assert_eq!(
            holders,
            vec![Some(Group::A), Some(Group::B), Some(Group::A), Some(Group::B)]
        );
    }
}

// ============================================================================
// Merging
// ============================================================================

proptest! {
    #[test]
    fn prop_merge_is_idempotent(windows in prop::collection::vec(window_strategy(), 0..15)) {
        let once = merge_close_windows(windows, 1.0);
        let twice = merge_close_windows(once.clone(), 1.0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_merge_keeps_far_apart_windows(windows in spaced_windows(1.0)) {
        let merged = merge_close_windows(windows.clone(), 1.0);
        prop_assert_eq!(merged, windows);
    }

    #[test]
    fn prop_merged_windows_respect_gap(windows in prop::collection::vec(window_strategy(), 1..15)) {
        let merged = merge_close_windows(windows, 1.0);
        for pair in merged.windows(2) {
            prop_assert!(pair[1].start - pair[0].end > 1.0);
        }
    }
}

// ============================================================================
// Exclusivity
// ============================================================================

proptest! {
    #[test]
    fn prop_no_peers_means_all_exclusive(windows in prop::collection::vec(window_strategy(), 0..10)) {
        let ex = resolve_exclusivity(&windows, &[]);
        prop_assert_eq!(ex.exclusive, windows);
        prop_assert!(ex.contended.is_empty());
    }

    #[test]
    fn prop_identical_peer_is_never_exclusive(windows in prop::collection::vec(window_strategy(), 1..10)) {
        let ex = resolve_exclusivity(&windows, &windows);
        prop_assert!(ex.exclusive.is_empty());
        prop_assert_eq!(ex.contended.len(), windows.len());
    }
}

// ============================================================================
// Delay compensation
// ============================================================================

proptest! {
    #[test]
    fn prop_delay_never_loses_points(
        timeline in prop::collection::vec(increment_strategy(), 0..30),
        window in window_strategy(),
    ) {
        let widened = EngineConfig::default();
        let raw = EngineConfig { delay: DelayModel::none(), ..EngineConfig::default() };

        let with_delay = delayed_points(&timeline, window, &widened);
        let without = delayed_points(&timeline, window, &raw);

        prop_assert!(with_delay >= without);
        prop_assert_eq!(without, points_in_window(&timeline, window, &raw));
    }
}

// ============================================================================
// Fallback split
// ============================================================================

proptest! {
    #[test]
    fn prop_fallback_conserves_total(
        total in 0i64..200,
        windows in prop::collection::vec(window_strategy(), 0..8),
    ) {
        let time = split_time_at(&windows, 20.0);
        let split = distribute_total(Points::from(total), time);

        prop_assert_eq!(split.total(), Points::from(total));
        prop_assert!(split.early >= Points::zero());
        prop_assert!(split.early <= Points::from(total));
    }

    #[test]
    fn prop_no_time_means_all_late(total in 0i64..200) {
        let split = distribute_total(Points::from(total), TimeSplit::default());
        prop_assert_eq!(split.early, Points::zero());
        prop_assert_eq!(split.late, Points::from(total));
    }
}
