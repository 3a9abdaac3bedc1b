// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Window Merger
//
// Normalises one actor's raw shooting intervals: crop to the windows in
// which the actor's hub was live, then join intervals separated by no
// more than the merge gap.

use crate::config::MatchClock;
use crate::types::{ActivityInterval, Window};

/// Clamp raw intervals to the match clock, dropping reversed, empty and
/// non-finite entries. Output is sorted by start.
pub fn sanitize_intervals(intervals: &[ActivityInterval], clock: &MatchClock) -> Vec<Window> {
    let bounds = Window::new(0.0, clock.total_duration);
    let mut out: Vec<Window> = intervals
        .iter()
        .filter(|i| i.start.is_finite() && i.end.is_finite())
        .filter_map(|i| i.window().intersect(&bounds))
        .collect();

    if out.len() < intervals.len() {
        tracing::debug!(
            dropped = intervals.len() - out.len(),
            "discarded degenerate activity intervals"
        );
    }

    out.sort_by(|a, b| a.start.total_cmp(&b.start));
    out
}

/// Intersect one interval with every active period. A span crossing an
/// inactive stretch is truncated; one lying wholly inside it vanishes.
pub fn crop_to_active_periods(window: Window, active: &[Window]) -> Vec<Window> {
    active.iter().filter_map(|period| window.intersect(period)).collect()
}

/// Single left-to-right pass; chains of close windows collapse into one.
pub fn merge_close_windows(mut windows: Vec<Window>, max_gap: f64) -> Vec<Window> {
    if windows.is_empty() {
        return windows;
    }

    windows.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged = Vec::with_capacity(windows.len());
    let mut current = windows[0];

    for next in windows.into_iter().skip(1) {
        if next.start - current.end <= max_gap {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    merged
}

/// Crop then merge: the per-actor windows the aggregator works from.
pub fn normalize_activity(raw: &[Window], active: &[Window], max_gap: f64) -> Vec<Window> {
    let cropped: Vec<Window> = raw
        .iter()
        .flat_map(|w| crop_to_active_periods(*w, active))
        .collect();
    merge_close_windows(cropped, max_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::total_duration;

    fn w(start: f64, end: f64) -> Window {
        Window::new(start, end)
    }

    #[test]
    fn crop_truncates_across_inactive_gap() {
        let active = [w(0.0, 30.0), w(55.0, 80.0)];
        let cropped = crop_to_active_periods(w(25.0, 60.0), &active);
        assert_eq!(cropped, vec![w(25.0, 30.0), w(55.0, 60.0)]);
    }

    #[test]
    fn crop_drops_fully_inactive_interval() {
        let active = [w(0.0, 30.0), w(55.0, 80.0)];
        assert!(crop_to_active_periods(w(35.0, 50.0), &active).is_empty());
    }

    #[test]
    fn merge_joins_within_gap_transitively() {
        let merged = merge_close_windows(
            vec![w(12.0, 14.0), w(0.0, 2.0), w(3.0, 5.0), w(5.5, 8.0)],
            1.0,
        );
        assert_eq!(merged, vec![w(0.0, 8.0), w(12.0, 14.0)]);
    }

    #[test]
    fn merge_keeps_contained_window_end() {
        let merged = merge_close_windows(vec![w(0.0, 10.0), w(2.0, 4.0)], 1.0);
        assert_eq!(merged, vec![w(0.0, 10.0)]);
    }

    #[test]
    fn merge_gap_boundary_is_inclusive() {
        assert_eq!(merge_close_windows(vec![w(0.0, 2.0), w(3.0, 4.0)], 1.0).len(), 1);
        assert_eq!(merge_close_windows(vec![w(0.0, 2.0), w(3.01, 4.0)], 1.0).len(), 2);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(merge_close_windows(Vec::new(), 1.0).is_empty());
        assert!(normalize_activity(&[], &[w(0.0, 150.0)], 1.0).is_empty());
    }

    #[test]
    fn sanitize_clamps_and_drops() {
        let clock = MatchClock::default();
        let raw = [
            ActivityInterval::new(140.0, 160.0),
            ActivityInterval::new(40.0, 30.0),
            ActivityInterval::new(10.0, 10.0),
            ActivityInterval::new(-5.0, 3.0),
            ActivityInterval::new(f64::NAN, 3.0),
        ];
        let clean = sanitize_intervals(&raw, &clock);
        assert_eq!(clean, vec![w(0.0, 3.0), w(140.0, 150.0)]);
        assert!((total_duration(&clean) - 13.0).abs() < 1e-9);
    }
}
