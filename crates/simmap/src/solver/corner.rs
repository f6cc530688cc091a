//! Corner-anchored variant: the anchor is a poster dock near the bottom-left corner and items
//! fan out over a quarter plane toward the top-right.
//!
//! Angles use screen coordinates (y grows downward): `-π/2` points straight up, `0` points right.

use super::{Candidate, Placed, band_radius, float_seed, shuffled_slots};
use crate::config::{LayoutConfig, MAX_FLOAT_AMPLITUDE};
use crate::geom::{Point, Rect, clamp_f64, clamp_point, point, polar, strictly_inside};
use crate::model::{Adjustment, Axis, BasePosition, CanvasSpec, Item, LayoutResult};
use rand::{Rng, RngCore};
use std::f64::consts::FRAC_PI_2;

pub const FAN_START: f64 = -FRAC_PI_2;
pub const FAN_END: f64 = 0.0;

/// Radius band `(inner, outer)`: a fixed inner radius and an outer bound reaching toward the
/// far (top-right) corner, capped.
pub fn radius_band(anchor: Point, canvas: CanvasSpec, config: &LayoutConfig) -> (f64, f64) {
    let inner = config.corner_inner_radius;
    let far = (point(canvas.width, 0.0) - anchor).length();
    (inner, far.min(config.corner_outer_radius_cap).max(inner))
}

/// Rectangle a node center must stay out of so its floating footprint clears the dock by
/// `safety_margin`.
pub fn keep_out_rect(dock: &Rect, config: &LayoutConfig) -> Rect {
    dock.inflate(
        config.safety_margin + config.node_width / 2.0 + MAX_FLOAT_AMPLITUDE,
        config.safety_margin + config.node_height / 2.0 + MAX_FLOAT_AMPLITUDE,
    )
}

/// Moves `p` out of `keep_out` along whichever of "right" or "up" is the shorter move.
///
/// Returns `None` when `p` is already clear. Only one axis is touched.
pub fn push_clear_of_dock(p: Point, keep_out: &Rect) -> Option<(Point, Axis, f64)> {
    if !strictly_inside(p, keep_out) {
        return None;
    }
    let right = keep_out.max_x() - p.x;
    let up = p.y - keep_out.min_y();
    if right <= up {
        Some((point(keep_out.max_x(), p.y), Axis::X, right))
    } else {
        Some((point(p.x, keep_out.min_y()), Axis::Y, up))
    }
}

fn clamp_to_fan(angle: f64) -> f64 {
    clamp_f64(angle, FAN_START, FAN_END)
}

/// Advances by `step`, wrapping from the right edge of the fan back to "up".
fn step_angle(angle: f64, step: f64) -> f64 {
    let next = angle + step;
    if next > FAN_END {
        clamp_to_fan(next - (FAN_END - FAN_START))
    } else {
        clamp_to_fan(next)
    }
}

pub(crate) fn solve<R: RngCore + ?Sized>(
    ranked: &[Item],
    canvas: CanvasSpec,
    dock: Rect,
    config: &LayoutConfig,
    rng: &mut R,
) -> LayoutResult {
    let anchor = dock.center();
    let min_dist = config.min_node_distance();
    let mut out = LayoutResult::empty(anchor, config.node_size(), min_dist);
    let n = ranked.len();
    if n == 0 {
        return out;
    }

    let (inner, outer) = radius_band(anchor, canvas, config);
    let bounds = canvas.inset(config.edge_clearance());
    let keep_out = keep_out_rect(&dock, config);
    let step = config.corner_angle_step_deg.to_radians();
    let jitter = config.corner_jitter_deg.abs().to_radians();
    tracing::debug!(items = n, inner, outer, min_dist, "corner-anchored solve");

    let slots = shuffled_slots(n, rng);
    let mut placed = Placed::with_capacity(n);

    for (rank, item) in ranked.iter().enumerate() {
        let mut radius = band_radius(rank, n, inner, outer);
        let base = FAN_START + (FAN_END - FAN_START) * (slots[rank] as f64 + 0.5) / n as f64;
        let start = if jitter > 0.0 {
            clamp_to_fan(base + rng.gen_range(-jitter..=jitter))
        } else {
            clamp_to_fan(base)
        };

        let mut cur = candidate_at(anchor, start, radius, &bounds, &placed);
        let mut best = cur;
        let mut attempts = 0;
        while cur.clearance < min_dist && attempts < config.corner_max_attempts {
            attempts += 1;
            cur = candidate_at(anchor, step_angle(cur.angle, step), radius, &bounds, &placed);
            best.keep_better(cur);
        }
        if cur.clearance < min_dist {
            tracing::debug!(
                item_id = item.id,
                attempts,
                clearance = best.clearance,
                "anti-collision budget exhausted; growing radius once"
            );
            out.adjustments.push(Adjustment::CollisionBudgetExhausted {
                item_id: item.id,
                attempts,
                clearance: best.clearance,
                radius_grown: true,
            });
            radius = grown_radius(rank, n, inner, outer, config.corner_radius_fallback);
            cur = candidate_at(anchor, best.angle, radius, &bounds, &placed);
        }

        let mut final_point = cur.point;
        if let Some((pushed, axis, distance)) = push_clear_of_dock(final_point, &keep_out) {
            tracing::debug!(item_id = item.id, ?axis, distance, "pushed out of dock keep-out");
            out.adjustments.push(Adjustment::ExclusionPush {
                item_id: item.id,
                axis,
                distance,
            });
            final_point = pushed;
        }

        placed.push(final_point);
        let offset = final_point - anchor;
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

/// Radius after the one-time fallback growth: `fallback` past the band, but never past the next
/// rank's band so the growth stays local to the item being placed. The last rank grows freely.
pub fn grown_radius(rank: usize, count: usize, inner: f64, outer: f64, fallback: f64) -> f64 {
    let grown = band_radius(rank, count, inner, outer) + fallback;
    if rank + 1 < count {
        grown.min(band_radius(rank + 1, count, inner, outer))
    } else {
        grown
    }
}

fn candidate_at(
    anchor: Point,
    angle: f64,
    radius: f64,
    bounds: &Rect,
    placed: &Placed,
) -> Candidate {
    let point = clamp_point(anchor + polar(angle, radius, 1.0, 1.0), bounds);
    Candidate {
        point,
        angle,
        clearance: placed.clearance(point),
    }
}
