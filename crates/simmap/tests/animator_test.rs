use simmap::animate::{AnimatorState, float_offset, render_points};
use simmap::geom::{Point, point};
use simmap::{
    AnchorSpec, CanvasSpec, FloatAnimator, FloatSeed, FrameHost, FrameRequest, Item, LayoutConfig,
    LayoutResult, LayoutRng, MAX_FLOAT_AMPLITUDE, NodeSurface, solve,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct FakeHost {
    next: u64,
    outstanding: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
}

impl FrameHost for FakeHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let req = FrameRequest(self.next);
        self.outstanding.push(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.outstanding.retain(|r| *r != request);
        self.cancelled.push(request);
    }
}

impl FakeHost {
    /// Fires the oldest outstanding request, like the display signal would.
    fn fire(&mut self) -> Option<FrameRequest> {
        if self.outstanding.is_empty() {
            None
        } else {
            Some(self.outstanding.remove(0))
        }
    }
}

#[derive(Debug, Default)]
struct RecordingSurface {
    nodes: Vec<(&'static str, Point)>,
    lines: Vec<(&'static str, Point, Point)>,
}

impl NodeSurface for RecordingSurface {
    type Node = &'static str;
    type Line = &'static str;

    fn move_node(&mut self, node: &Self::Node, at: Point) {
        self.nodes.push((*node, at));
    }

    fn move_line(&mut self, line: &Self::Line, from: Point, to: Point) {
        self.lines.push((*line, from, to));
    }
}

fn layout(items: &[Item]) -> Arc<LayoutResult> {
    let mut rng = LayoutRng::new(5);
    Arc::new(solve(
        &Item::new(1000, 100.0),
        items,
        CanvasSpec::new(1400.0, 700.0),
        &AnchorSpec::Center,
        &LayoutConfig::default(),
        &mut rng,
    ))
}

fn three() -> Vec<Item> {
    vec![Item::new(1, 95.0), Item::new(2, 80.0), Item::new(3, 50.0)]
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn float_offset_is_bounded() {
    let seed = FloatSeed {
        speed: 0.0025,
        offset: 123.0,
        phase: 2.0,
    };
    for t in (0..20_000).step_by(7) {
        let v = float_offset(&seed, ms(t));
        assert!(v.length() <= MAX_FLOAT_AMPLITUDE + 1e-9, "t={t}: {v:?}");
    }
}

#[test]
fn float_offset_matches_the_oscillator_formula() {
    let seed = FloatSeed {
        speed: 0.002,
        offset: 10.0,
        phase: 0.5,
    };
    let t = 1500.0;
    let v = float_offset(&seed, ms(1500));
    let fx = (t * 0.002 + 10.0_f64).sin() * 6.0 + (t * 0.002 * 0.5 + 0.5_f64).cos() * 3.0;
    let fy = (t * 0.002 + 10.0_f64).cos() * 6.0 + (t * 0.002 * 0.5 + 0.5_f64).sin() * 3.0;
    assert!((v.x - fx).abs() < 1e-12);
    assert!((v.y - fy).abs() < 1e-12);
}

#[test]
fn nearby_frames_move_only_slightly() {
    let l = layout(&three());
    for t in [0u64, 16, 1_000, 60_000] {
        let a = render_points(&l.positions, l.anchor, ms(t));
        let b = render_points(&l.positions, l.anchor, ms(t + 16));
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.item_id, pb.item_id);
            assert!((pa.point() - pb.point()).length() < 1.0);
            let base = l.absolute(pa.item_id).unwrap();
            assert!((pa.point() - base).length() <= MAX_FLOAT_AMPLITUDE + 1e-9);
        }
    }
}

#[test]
fn frames_drive_registered_handles() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let l = layout(&three());
    let anchor = l.anchor;
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(l.clone());
    anim.registry_mut().register_node(1, "node-1");
    anim.registry_mut().register_line(1, "line-1");
    anim.registry_mut().register_node(3, "node-3");

    assert_eq!(anim.state(), AnimatorState::Idle);
    anim.start(ms(100), &mut host);
    assert!(anim.is_running());

    let req = host.fire().unwrap();
    let points = anim.on_frame(req, ms(116), &mut host, &mut surface).unwrap().to_vec();
    assert_eq!(points.len(), 3);
    assert_eq!(surface.nodes.len(), 2);
    assert_eq!(surface.lines.len(), 1);

    let (line, from, to) = surface.lines[0];
    assert_eq!(line, "line-1");
    assert_eq!(from, anchor);
    let p1 = points.iter().find(|p| p.item_id == 1).unwrap();
    assert_eq!(to, p1.point());
    assert!(surface.nodes.contains(&("node-1", p1.point())));

    // The frame re-requested its successor.
    assert_eq!(host.outstanding.len(), 1);
    assert_eq!(anim.frames_rendered(), 1);
}

#[test]
fn elapsed_time_is_measured_from_start() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let l = layout(&three());
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(l.clone());
    anim.start(ms(5_000), &mut host);
    let req = host.fire().unwrap();
    let got = anim.on_frame(req, ms(5_250), &mut host, &mut surface).unwrap().to_vec();
    assert_eq!(got, render_points(&l.positions, l.anchor, ms(250)));
}

#[test]
fn stale_requests_are_ignored() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(layout(&three()));
    anim.start(Duration::ZERO, &mut host);
    let first = host.fire().unwrap();
    anim.on_frame(first, ms(16), &mut host, &mut surface).unwrap();
    assert!(anim.on_frame(first, ms(32), &mut host, &mut surface).is_none());
    assert_eq!(anim.frames_rendered(), 1);
}

#[test]
fn teardown_cancels_and_silences_the_loop() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(layout(&three()));
    anim.registry_mut().register_node(2, "node-2");
    anim.start(Duration::ZERO, &mut host);
    let first = host.fire().unwrap();
    anim.on_frame(first, ms(16), &mut host, &mut surface).unwrap();
    let pending = host.outstanding[0];

    anim.teardown(&mut host);
    assert_eq!(anim.state(), AnimatorState::Idle);
    assert!(host.outstanding.is_empty());
    assert_eq!(host.cancelled, vec![pending]);
    assert!(anim.registry().is_empty());
    assert!(anim.last_frame().is_empty());

    let moves = surface.nodes.len();
    for t in 2..10 {
        assert!(anim.on_frame(pending, ms(16 * t), &mut host, &mut surface).is_none());
    }
    assert_eq!(surface.nodes.len(), moves);
    assert!(host.outstanding.is_empty());
}

#[test]
fn replacing_the_layout_cancels_the_old_frame() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(layout(&three()));
    anim.start(Duration::ZERO, &mut host);
    let old = host.outstanding[0];

    let next = layout(&[Item::new(7, 60.0)]);
    anim.replace_layout(next.clone(), &mut host);
    assert_eq!(host.cancelled, vec![old]);
    assert_eq!(host.outstanding.len(), 1);
    assert!(anim.on_frame(old, ms(16), &mut host, &mut surface).is_none());

    let fresh = host.fire().unwrap();
    let points = anim.on_frame(fresh, ms(16), &mut host, &mut surface).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].item_id, 7);
    assert!(Arc::ptr_eq(anim.layout(), &next));
}

#[test]
fn empty_layout_ticks_without_work() {
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(layout(&[]));
    anim.start(Duration::ZERO, &mut host);
    let req = host.fire().unwrap();
    let points = anim.on_frame(req, ms(16), &mut host, &mut surface).unwrap();
    assert!(points.is_empty());
    assert!(surface.nodes.is_empty() && surface.lines.is_empty());
}

#[test]
fn moving_the_anchor_translates_every_point() {
    let l = layout(&three());
    let mut host = FakeHost::default();
    let mut surface = RecordingSurface::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(l.clone());
    anim.set_anchor(point(l.anchor.x + 100.0, l.anchor.y - 50.0));
    anim.start(Duration::ZERO, &mut host);
    let req = host.fire().unwrap();
    let moved = anim.on_frame(req, ms(40), &mut host, &mut surface).unwrap().to_vec();
    let original = render_points(&l.positions, l.anchor, ms(40));
    for (m, o) in moved.iter().zip(&original) {
        assert!((m.x - o.x - 100.0).abs() < 1e-9);
        assert!((m.y - o.y + 50.0).abs() < 1e-9);
    }
}

#[test]
fn starting_twice_keeps_one_pending_frame() {
    let mut host = FakeHost::default();
    let mut anim: FloatAnimator<RecordingSurface> = FloatAnimator::new(layout(&three()));
    anim.start(Duration::ZERO, &mut host);
    anim.start(ms(10), &mut host);
    assert_eq!(host.outstanding.len(), 1);
}
