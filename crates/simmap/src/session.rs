use crate::animate::{FloatAnimator, FrameHost, FrameRequest, NodeSurface};
use crate::config::LayoutConfig;
use crate::geom::{Point, Rect, centered_rect};
use crate::model::{AnchorSpec, CanvasSpec, Item, ItemId, LayoutResult, RenderPoint};
use crate::rng::LayoutRng;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;

/// Pointer events the engine forwards to the caller. The engine never acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    HoverEnter(ItemId),
    HoverLeave(ItemId),
    Click(ItemId),
    AnchorClick,
}

#[derive(Debug, Clone, PartialEq)]
struct LayoutKey {
    source_id: ItemId,
    items: Vec<Item>,
    canvas: CanvasSpec,
}

/// One mounted similarity map: re-solves when its inputs change and owns the float animator.
pub struct SimilarityMap<S: NodeSurface, R: RngCore = LayoutRng> {
    config: LayoutConfig,
    anchor_spec: AnchorSpec,
    rng: R,
    key: Option<LayoutKey>,
    canvas: Option<CanvasSpec>,
    animator: Option<FloatAnimator<S>>,
    hovered: Option<ItemId>,
}

impl<S: NodeSurface> SimilarityMap<S, LayoutRng> {
    /// Uses `config.random_seed` when set, fresh entropy otherwise.
    pub fn new(config: LayoutConfig, anchor_spec: AnchorSpec) -> Self {
        let rng = LayoutRng::from_seed_option(config.random_seed);
        Self::with_rng(config, anchor_spec, rng)
    }
}

impl<S: NodeSurface, R: RngCore> SimilarityMap<S, R> {
    pub fn with_rng(config: LayoutConfig, anchor_spec: AnchorSpec, rng: R) -> Self {
        Self {
            config,
            anchor_spec,
            rng,
            key: None,
            canvas: None,
            animator: None,
            hovered: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn anchor_spec(&self) -> &AnchorSpec {
        &self.anchor_spec
    }

    pub fn layout(&self) -> Option<&Arc<LayoutResult>> {
        self.animator.as_ref().map(|a| a.layout())
    }

    pub fn animator(&self) -> Option<&FloatAnimator<S>> {
        self.animator.as_ref()
    }

    /// Handle registration goes through here (`animator_mut()?.registry_mut()`).
    pub fn animator_mut(&mut self) -> Option<&mut FloatAnimator<S>> {
        self.animator.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.animator.as_ref().is_some_and(|a| a.is_running())
    }

    /// Feeds the current inputs. Solves (and starts or swaps the animation) only when
    /// `(source.id, items, canvas)` differs from the last call; returns whether it did.
    pub fn update(
        &mut self,
        source: &Item,
        items: &[Item],
        canvas: CanvasSpec,
        now: Duration,
        host: &mut impl FrameHost,
    ) -> bool {
        let key = LayoutKey {
            source_id: source.id,
            items: items.to_vec(),
            canvas,
        };
        if self.key.as_ref() == Some(&key) && self.is_running() {
            return false;
        }

        let result = Arc::new(crate::solve(
            source,
            items,
            canvas,
            &self.anchor_spec,
            &self.config,
            &mut self.rng,
        ));
        tracing::debug!(
            source_id = source.id,
            items = result.len(),
            width = canvas.width,
            height = canvas.height,
            "similarity map re-solved"
        );
        if let Some(animator) = self.animator.as_mut().filter(|a| a.is_running()) {
            animator.replace_layout(result, host);
        } else {
            let mut animator = FloatAnimator::new(result);
            animator.start(now, host);
            self.animator = Some(animator);
        }
        self.key = Some(key);
        self.canvas = Some(canvas);
        self.hovered = None;
        true
    }

    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        now: Duration,
        host: &mut impl FrameHost,
        surface: &mut S,
    ) -> Option<&[RenderPoint]> {
        self.animator.as_mut()?.on_frame(request, now, host, surface)
    }

    /// Moves the anchor without re-solving (e.g. the dock element scrolled).
    pub fn move_anchor(&mut self, anchor: Point) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_anchor(anchor);
        }
    }

    /// Stops the animation and forgets the current inputs; the next `update` solves again.
    pub fn teardown(&mut self, host: &mut impl FrameHost) {
        if let Some(animator) = self.animator.as_mut() {
            animator.teardown(host);
        }
        self.animator = None;
        self.key = None;
        self.canvas = None;
        self.hovered = None;
    }

    /// Topmost item whose marker (at its last rendered point) contains `p`.
    pub fn hit_test(&self, p: Point) -> Option<ItemId> {
        let animator = self.animator.as_ref()?;
        let node_size = animator.layout().node_size;
        animator
            .last_frame()
            .iter()
            .rev()
            .find(|rp| contains(&centered_rect(rp.point(), node_size), p))
            .map(|rp| rp.item_id)
    }

    fn anchor_rect(&self) -> Option<Rect> {
        let animator = self.animator.as_ref()?;
        let canvas = self.canvas?;
        Some(match self.anchor_spec.dock_rect(canvas) {
            Some(dock) => dock.translate(animator.anchor() - dock.center()),
            None => centered_rect(animator.anchor(), self.config.anchor_size()),
        })
    }

    /// Tracks hover state and reports enter/leave transitions.
    pub fn pointer_moved(&mut self, p: Point, mut handler: impl FnMut(Interaction)) {
        let hit = self.hit_test(p);
        if hit == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered {
            handler(Interaction::HoverLeave(prev));
        }
        if let Some(next) = hit {
            handler(Interaction::HoverEnter(next));
        }
        self.hovered = hit;
    }

    pub fn pointer_clicked(&mut self, p: Point, mut handler: impl FnMut(Interaction)) {
        if let Some(id) = self.hit_test(p) {
            handler(Interaction::Click(id));
        } else if self.anchor_rect().is_some_and(|r| contains(&r, p)) {
            handler(Interaction::AnchorClick);
        }
    }
}

fn contains(r: &Rect, p: Point) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}
