//! Center-anchored variant: full-circle placement around the canvas midpoint, stretched into an
//! ellipse to suit wide viewports.

use super::{Candidate, Placed, band_radius, float_seed, shuffled_slots};
use crate::config::LayoutConfig;
use crate::geom::{Point, Rect, clamp_point, half_diagonal, normalize_angle, polar};
use crate::model::{Adjustment, BasePosition, CanvasSpec, Item, LayoutResult};
use rand::RngCore;
use std::f64::consts::TAU;

/// `π(3 - √5)`: successive steps never line up with an earlier attempt.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Radius band `(inner, outer)` for a canvas.
///
/// The inner edge clears the anchor footprint plus a node's half-diagonal. The outer edge is the
/// largest radius whose stretched ellipse still keeps a floating node on canvas; it never drops
/// below the inner edge.
pub fn radius_band(canvas: CanvasSpec, config: &LayoutConfig) -> (f64, f64) {
    let inner = half_diagonal(config.anchor_size())
        + config.exclusion_margin
        + half_diagonal(config.node_size());
    let clearance = config.edge_clearance();
    let outer_x = (canvas.width / 2.0 - clearance.x) / config.stretch_x;
    let outer_y = (canvas.height / 2.0 - clearance.y) / config.stretch_y;
    (inner, outer_x.min(outer_y).max(inner))
}

pub(crate) fn solve<R: RngCore + ?Sized>(
    ranked: &[Item],
    canvas: CanvasSpec,
    config: &LayoutConfig,
    rng: &mut R,
) -> LayoutResult {
    let anchor = canvas.center();
    let min_dist = config.min_node_distance();
    let mut out = LayoutResult::empty(anchor, config.node_size(), min_dist);
    let n = ranked.len();
    if n == 0 {
        return out;
    }

    let (inner, outer) = radius_band(canvas, config);
    let bounds = canvas.inset(config.edge_clearance());
    tracing::debug!(items = n, inner, outer, min_dist, "center-anchored solve");

    let slots = shuffled_slots(n, rng);
    let mut placed = Placed::with_capacity(n);

    for (rank, item) in ranked.iter().enumerate() {
        let radius = band_radius(rank, n, inner, outer);
        let start = TAU * slots[rank] as f64 / n as f64;
        let mut cur = candidate_at(anchor, start, radius, config, &bounds, &placed);
        let mut best = cur;
        let mut attempts = 0;
        while cur.clearance < min_dist && attempts < config.center_max_attempts {
            attempts += 1;
            let angle = normalize_angle(cur.angle + GOLDEN_ANGLE);
            cur = candidate_at(anchor, angle, radius, config, &bounds, &placed);
            best.keep_better(cur);
        }
        if cur.clearance < min_dist {
            cur = best;
            tracing::debug!(
                item_id = item.id,
                attempts,
                clearance = cur.clearance,
                "anti-collision budget exhausted; keeping best candidate"
            );
            out.adjustments.push(Adjustment::CollisionBudgetExhausted {
                item_id: item.id,
                attempts,
                clearance: cur.clearance,
                radius_grown: false,
            });
        }

        placed.push(cur.point);
        let offset = cur.point - anchor;
        out.positions.insert(
            item.id,
            BasePosition {
                item_id: item.id,
                rank,
                x: offset.x,
                y: offset.y,
                angle: cur.angle,
                radius,
                float_seed: float_seed(config, rng),
            },
        );
    }

    out
}

fn candidate_at(
    anchor: Point,
    angle: f64,
    radius: f64,
    config: &LayoutConfig,
    bounds: &Rect,
    placed: &Placed,
) -> Candidate {
    let raw = anchor + polar(angle, radius, config.stretch_x, config.stretch_y);
    let point = clamp_point(raw, bounds);
    Candidate {
        point,
        angle,
        clearance: placed.clearance(point),
    }
}
