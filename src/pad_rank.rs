//! Ranking of landing and launch pads for link endpoints.
//!
//! A pad is an attachment point on a node's outline with an outward normal.
//! When a link arrives from (or leaves towards) a point, the best pad is the
//! one whose normal points most directly at that point; closer pads win ties.
//!
//! Ordering, best first:
//! 1. higher dot product between the pad normal and the unit direction from
//!    the pad to the target (dots within `dot_tolerance` of the best dot of
//!    their run are grouped together)
//! 2. shorter distance from pad to target
//! 3. lower pad index
//!
//! The ranking is deterministic and never panics on NaN input; NaN dots and
//! distances sort last.

use crate::config::PadRankConfig;
use crate::model::Point;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pad {
    pub index: i32,
    pub position: Point,
    /// Outward direction; need not be normalized.
    pub normal: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PadRank {
    pub pad: i32,
    pub dot: f64,
    pub distance: f64,
}

impl PadRank {
    /// Score `pad` against a link coming from `target`.
    pub fn score(pad: &Pad, target: Point) -> Self {
        let dx = target.x - pad.position.x;
        let dy = target.y - pad.position.y;
        let distance = dx.hypot(dy);
        let norm = pad.normal.length();
        let dot = if distance == 0.0 || norm == 0.0 {
            0.0
        } else {
            (dx * pad.normal.x + dy * pad.normal.y) / (distance * norm)
        };
        Self {
            pad: pad.index,
            dot,
            distance,
        }
    }

    fn cmp_by_dot(&self, other: &Self) -> Ordering {
        desc_nan_last(self.dot, other.dot).then_with(|| self.cmp_by_distance(other))
    }

    fn cmp_by_distance(&self, other: &Self) -> Ordering {
        asc_nan_last(self.distance, other.distance).then_with(|| self.pad.cmp(&other.pad))
    }
}

fn desc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn asc_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Rank all `pads` for a link coming from `target`, best first.
///
/// Pads are sorted by alignment, then every run of dots within
/// `cfg.dot_tolerance` of the run's best dot is re-sorted by distance.
pub fn rank_pads(pads: &[Pad], target: Point, cfg: &PadRankConfig) -> Vec<PadRank> {
    let mut ranks: Vec<PadRank> = pads.iter().map(|p| PadRank::score(p, target)).collect();
    ranks.sort_by(PadRank::cmp_by_dot);

    let mut start = 0;
    while start < ranks.len() {
        let lead = ranks[start].dot;
        let run = ranks[start..]
            .iter()
            .take_while(|r| (lead - r.dot).abs() <= cfg.dot_tolerance)
            .count()
            .max(1);
        ranks[start..start + run].sort_by(PadRank::cmp_by_distance);
        start += run;
    }
    ranks
}

/// The best pad for `target`, or `None` when there are no pads.
pub fn best_pad(pads: &[Pad], target: Point, cfg: &PadRankConfig) -> Option<PadRank> {
    rank_pads(pads, target, cfg).into_iter().next()
}
