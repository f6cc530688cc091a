//! Radial placement of ranked items around an anchor.
//!
//! Both variants follow the same pipeline: rank by similarity, assign a band radius per rank,
//! hand out shuffled angular slots, then walk the items in rank order nudging each one's angle
//! until it clears every node placed before it.

pub mod center;
pub mod corner;

use crate::config::LayoutConfig;
use crate::geom::Point;
use crate::model::{FloatSeed, Item};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rustc_hash::FxHashSet;
use std::f64::consts::TAU;

/// Stable sort by similarity, most similar first. Unscored items rank as 50.
///
/// A repeated id keeps only its last-ranked occurrence, so ranks stay contiguous.
pub fn rank_items(items: &[Item]) -> Vec<Item> {
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| b.similarity_or_default().total_cmp(&a.similarity_or_default()));
    let mut seen = FxHashSet::default();
    let mut unique: Vec<Item> = ranked
        .into_iter()
        .rev()
        .filter(|item| seen.insert(item.id))
        .collect();
    unique.reverse();
    unique
}

/// Target radius for `rank` of `count`, strictly increasing with rank across `[inner, outer]`.
pub fn band_radius(rank: usize, count: usize, inner: f64, outer: f64) -> f64 {
    if count <= 1 {
        return inner;
    }
    let t = rank as f64 / (count - 1) as f64;
    (inner + t * (outer - inner)).min(outer).max(inner)
}

/// `slots[rank]` is the angular slot handed to that rank.
pub(crate) fn shuffled_slots<R: RngCore + ?Sized>(count: usize, rng: &mut R) -> Vec<usize> {
    let mut slots: Vec<usize> = (0..count).collect();
    slots.shuffle(rng);
    slots
}

pub(crate) fn float_seed<R: RngCore + ?Sized>(config: &LayoutConfig, rng: &mut R) -> FloatSeed {
    let lo = config.float_speed_min.min(config.float_speed_max);
    let hi = config.float_speed_min.max(config.float_speed_max);
    FloatSeed {
        speed: if lo < hi { rng.gen_range(lo..=hi) } else { lo },
        offset: rng.gen_range(0.0..1000.0),
        phase: rng.gen_range(0.0..TAU),
    }
}

/// Absolute points of every node placed so far in this solve.
#[derive(Debug, Default)]
pub(crate) struct Placed {
    points: Vec<Point>,
}

impl Placed {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Distance to the nearest placed node (`INFINITY` when nothing is placed yet).
    pub(crate) fn clearance(&self, p: Point) -> f64 {
        self.points
            .iter()
            .map(|q| (*q - p).length())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Best candidate seen during an angular search, by clearance.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) point: Point,
    pub(crate) angle: f64,
    pub(crate) clearance: f64,
}

impl Candidate {
    pub(crate) fn keep_better(&mut self, other: Candidate) {
        if other.clearance > self.clearance {
            *self = other;
        }
    }
}
