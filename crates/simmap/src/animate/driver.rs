use super::{HandleRegistry, render_points};
use crate::geom::Point;
use crate::model::{LayoutResult, RenderPoint};
use std::sync::Arc;
use std::time::Duration;

/// Identifies one outstanding display-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The host's display-frame scheduler (a repaint signal, typically 60Hz).
pub trait FrameHost {
    /// Schedules one callback for the next frame.
    fn request_frame(&mut self) -> FrameRequest;
    /// Cancels a callback that has not fired yet. Unknown or already-fired requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Imperative position sink for mounted markers and connector lines.
///
/// Updates go straight to the handles instead of through the declarative render tree.
pub trait NodeSurface {
    type Node;
    type Line;

    fn move_node(&mut self, node: &Self::Node, at: Point);
    /// `from` is the anchor end (fixed), `to` follows the node.
    fn move_line(&mut self, line: &Self::Line, from: Point, to: Point);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running {
        pending: FrameRequest,
        started_at: Duration,
    },
}

/// Drives the float animation for one visualization instance.
///
/// `Idle → Running` on [`start`](Self::start), `Running → Running` on every frame (which
/// re-requests the next one), `Running → Idle` on [`teardown`](Self::teardown).
pub struct FloatAnimator<S: NodeSurface> {
    state: AnimatorState,
    layout: Arc<LayoutResult>,
    anchor: Point,
    registry: HandleRegistry<S::Node, S::Line>,
    last_frame: Vec<RenderPoint>,
    frames: u64,
}

impl<S: NodeSurface> FloatAnimator<S> {
    pub fn new(layout: Arc<LayoutResult>) -> Self {
        let anchor = layout.anchor;
        Self {
            state: AnimatorState::Idle,
            layout,
            anchor,
            registry: HandleRegistry::new(),
            last_frame: Vec::new(),
            frames: 0,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimatorState::Running { .. })
    }

    pub fn layout(&self) -> &Arc<LayoutResult> {
        &self.layout
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Moves the whole map with its anchor; offsets are reused as-is.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
    }

    pub fn registry(&self) -> &HandleRegistry<S::Node, S::Line> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandleRegistry<S::Node, S::Line> {
        &mut self.registry
    }

    /// Points emitted by the most recent frame (empty before the first frame and after teardown).
    pub fn last_frame(&self) -> &[RenderPoint] {
        &self.last_frame
    }

    /// Number of frames rendered since construction.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn start(&mut self, now: Duration, host: &mut impl FrameHost) {
        if self.is_running() {
            return;
        }
        let pending = host.request_frame();
        tracing::trace!(?pending, "float animator started");
        self.state = AnimatorState::Running {
            pending,
            started_at: now,
        };
    }

    /// Frame callback. Returns `None` (and does nothing) unless `request` is the frame this
    /// animator is currently waiting for.
    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        now: Duration,
        host: &mut impl FrameHost,
        surface: &mut S,
    ) -> Option<&[RenderPoint]> {
        let AnimatorState::Running {
            pending,
            started_at,
        } = self.state
        else {
            return None;
        };
        if pending != request {
            tracing::trace!(?request, ?pending, "ignoring stale frame");
            return None;
        }

        let elapsed = now.saturating_sub(started_at);
        self.last_frame = render_points(&self.layout.positions, self.anchor, elapsed);
        for p in &self.last_frame {
            let at = p.point();
            if let Some(node) = self.registry.node(p.item_id) {
                surface.move_node(node, at);
            }
            if let Some(line) = self.registry.line(p.item_id) {
                surface.move_line(line, self.anchor, at);
            }
        }
        self.frames += 1;

        self.state = AnimatorState::Running {
            pending: host.request_frame(),
            started_at,
        };
        Some(&self.last_frame)
    }

    /// Swaps in a freshly solved layout in one step.
    ///
    /// The pending frame is cancelled before the swap so no callback can render the old map;
    /// a running animator immediately requests a new frame and keeps its clock.
    pub fn replace_layout(&mut self, layout: Arc<LayoutResult>, host: &mut impl FrameHost) {
        if let AnimatorState::Running {
            pending,
            started_at,
        } = self.state
        {
            host.cancel_frame(pending);
            self.layout = layout;
            self.anchor = self.layout.anchor;
            self.last_frame.clear();
            self.state = AnimatorState::Running {
                pending: host.request_frame(),
                started_at,
            };
        } else {
            self.layout = layout;
            self.anchor = self.layout.anchor;
            self.last_frame.clear();
        }
        tracing::trace!(items = self.layout.len(), "float animator layout replaced");
    }

    /// Cancels the pending frame, forgets every handle and returns to `Idle`.
    pub fn teardown(&mut self, host: &mut impl FrameHost) {
        if let AnimatorState::Running { pending, .. } = self.state {
            host.cancel_frame(pending);
            tracing::trace!(?pending, "float animator torn down");
        }
        self.state = AnimatorState::Idle;
        self.registry.clear();
        self.last_frame.clear();
    }
}
