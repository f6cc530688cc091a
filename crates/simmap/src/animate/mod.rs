//! Per-frame float animation over a solved layout.

mod driver;
mod registry;

pub use driver::{AnimatorState, FloatAnimator, FrameHost, FrameRequest, NodeSurface};
pub use registry::HandleRegistry;

use crate::geom::{Point, Vector, vector};
use crate::model::{BasePosition, FloatSeed, PositionMap, RenderPoint};
use std::time::Duration;

pub const PRIMARY_AMPLITUDE: f64 = 6.0;
pub const SECONDARY_AMPLITUDE: f64 = 3.0;

fn elapsed_ms(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0
}

/// Float offset of one item after `elapsed` time; its length never exceeds
/// [`crate::MAX_FLOAT_AMPLITUDE`].
pub fn float_offset(seed: &FloatSeed, elapsed: Duration) -> Vector {
    let t = elapsed_ms(elapsed) * seed.speed;
    let fast = t + seed.offset;
    let slow = t * 0.5 + seed.phase;
    vector(
        fast.sin() * PRIMARY_AMPLITUDE + slow.cos() * SECONDARY_AMPLITUDE,
        fast.cos() * PRIMARY_AMPLITUDE + slow.sin() * SECONDARY_AMPLITUDE,
    )
}

pub fn render_point(base: &BasePosition, anchor: Point, elapsed: Duration) -> RenderPoint {
    let p = base.absolute(anchor) + float_offset(&base.float_seed, elapsed);
    RenderPoint {
        item_id: base.item_id,
        x: p.x,
        y: p.y,
    }
}

/// Render points for every item, in rank order.
pub fn render_points(positions: &PositionMap, anchor: Point, elapsed: Duration) -> Vec<RenderPoint> {
    positions
        .values()
        .map(|base| render_point(base, anchor, elapsed))
        .collect()
}
