#![forbid(unsafe_code)]

//! Headless radial layout for similarity maps.
//!
//! Given a source item and a ranked list of similar items, [`solve`] places every item around
//! an anchor so that distance encodes similarity rank, nodes do not overlap, and a gently
//! floating node never leaves the canvas. [`animate::FloatAnimator`] then turns the solved
//! positions into per-frame [`RenderPoint`]s for the rendering layer.

pub mod animate;
pub mod config;
pub mod error;
pub mod geom;
pub mod model;
pub mod rng;
pub mod session;
pub mod solver;

pub use animate::{FloatAnimator, FrameHost, FrameRequest, HandleRegistry, NodeSurface};
pub use config::{LayoutConfig, MAX_FLOAT_AMPLITUDE};
pub use error::{Error, Result};
pub use model::{
    Adjustment, AnchorSpec, Axis, BasePosition, CanvasSpec, DEFAULT_SIMILARITY, FloatSeed, Item,
    ItemId, LayoutRequest, LayoutResult, PositionMap, RenderPoint,
};
pub use rng::LayoutRng;
pub use session::{Interaction, SimilarityMap};

use rand::RngCore;

/// Item count callers are expected to truncate to before solving; the solver does not enforce it.
pub const MAX_ITEMS: usize = 40;

/// Keeps the `MAX_ITEMS` most similar items, in input order.
pub fn truncate_items(items: &[Item]) -> Vec<Item> {
    if items.len() <= MAX_ITEMS {
        return items.to_vec();
    }
    let keep: rustc_hash::FxHashSet<usize> = {
        let mut idx: Vec<usize> = (0..items.len()).collect();
        idx.sort_by(|&a, &b| {
            items[b]
                .similarity_or_default()
                .total_cmp(&items[a].similarity_or_default())
        });
        idx.into_iter().take(MAX_ITEMS).collect()
    };
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, item)| *item)
        .collect()
}

/// Places `items` around the anchor described by `anchor`, drawing randomness from `rng`.
///
/// `source` only identifies the anchor; it is never placed. Duplicate ids collapse onto the
/// last-ranked occurrence.
///
/// Never panics on a config that fails [`LayoutConfig::validate`]: a negative jitter is read as
/// its magnitude and inverted float-speed bounds are swapped. The layout itself is only
/// meaningful for a valid config.
pub fn solve<R: RngCore + ?Sized>(
    source: &Item,
    items: &[Item],
    canvas: CanvasSpec,
    anchor: &AnchorSpec,
    config: &LayoutConfig,
    rng: &mut R,
) -> LayoutResult {
    let ranked = solver::rank_items(items);
    tracing::trace!(source_id = source.id, items = ranked.len(), ?anchor, "solve");
    let result = match anchor.dock_rect(canvas) {
        None => solver::center::solve(&ranked, canvas, config, rng),
        Some(dock) => solver::corner::solve(&ranked, canvas, dock, config, rng),
    };
    if !result.adjustments.is_empty() {
        tracing::debug!(
            source_id = source.id,
            adjustments = result.adjustments.len(),
            "layout finished with adjustments"
        );
    }
    result
}

/// [`solve`] with the generator implied by `config.random_seed`.
pub fn layout(
    source: &Item,
    items: &[Item],
    canvas: CanvasSpec,
    anchor: &AnchorSpec,
    config: &LayoutConfig,
) -> LayoutResult {
    let mut rng = LayoutRng::from_seed_option(config.random_seed);
    solve(source, items, canvas, anchor, config, &mut rng)
}
