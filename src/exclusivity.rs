// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Score Attribution Engine - Exclusivity Resolver
//
// A merged window is exclusive when no teammate's raw interval overlaps
// it at all. Windows with any contention are dropped whole, never split.

use serde::{Deserialize, Serialize};

use crate::types::{total_duration, Window};

/// Exclusive windows for one actor plus the contended remainder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exclusivity {
    pub exclusive: Vec<Window>,
    pub contended: Vec<Window>,
}

impl Exclusivity {
    pub fn exclusive_seconds(&self) -> f64 {
        total_duration(&self.exclusive)
    }

    /// Activity exists but every window was shared with a teammate.
    pub fn is_degenerate(&self) -> bool {
        self.exclusive.is_empty() && !self.contended.is_empty()
    }
}

pub fn is_exclusive(candidate: &Window, peers: &[Window]) -> bool {
    !peers.iter().any(|p| candidate.overlaps(p))
}

pub fn resolve_exclusivity(candidates: &[Window], peers: &[Window]) -> Exclusivity {
    let (exclusive, contended): (Vec<Window>, Vec<Window>) = candidates
        .iter()
        .copied()
        .partition(|c| is_exclusive(c, peers));
    Exclusivity { exclusive, contended }
}

pub fn find_exclusive_windows(candidates: &[Window], peers: &[Window]) -> Vec<Window> {
    resolve_exclusivity(candidates, peers).exclusive
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(start: f64, end: f64) -> Window {
        Window::new(start, end)
    }

    #[test]
    fn no_peers_means_all_exclusive() {
        let mine = [w(0.0, 5.0), w(40.0, 50.0)];
        assert_eq!(find_exclusive_windows(&mine, &[]), mine.to_vec());
    }

    #[test]
    fn identical_peer_is_never_exclusive() {
        let mine = [w(10.0, 20.0)];
        let res = resolve_exclusivity(&mine, &[w(10.0, 20.0)]);
        assert!(res.exclusive.is_empty());
        assert!(res.is_degenerate());
    }

    #[test]
    fn partial_overlap_drops_whole_window() {
        let mine = [w(10.0, 20.0), w(30.0, 35.0)];
        let res = resolve_exclusivity(&mine, &[w(19.0, 25.0)]);
        assert_eq!(res.exclusive, vec![w(30.0, 35.0)]);
        assert_eq!(res.contended, vec![w(10.0, 20.0)]);
        assert_eq!(res.exclusive_seconds(), 5.0);
    }

    #[test]
    fn touching_endpoints_stay_exclusive() {
        let mine = [w(10.0, 20.0)];
        assert_eq!(find_exclusive_windows(&mine, &[w(20.0, 30.0), w(0.0, 10.0)]).len(), 1);
    }

    #[test]
    fn no_activity_is_not_degenerate() {
        assert!(!resolve_exclusivity(&[], &[w(0.0, 1.0)]).is_degenerate());
    }
}
