use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use simmap::animate::render_points;
use simmap::{AnchorSpec, CanvasSpec, Item, LayoutConfig, LayoutRng, solve};
use std::hint::black_box;
use std::time::Duration;

fn items(n: u64) -> Vec<Item> {
    (0..n)
        .map(|i| Item::new(i + 1, 100.0 - (i as f64) * 97.0 / n as f64))
        .collect()
}

fn bench_solve(c: &mut Criterion) {
    let cfg = LayoutConfig::default();
    let source = Item::new(0, 100.0);
    let canvas = CanvasSpec::new(1400.0, 800.0);

    let mut group = c.benchmark_group("solve");
    for (name, anchor) in [
        ("center", AnchorSpec::Center),
        ("corner", AnchorSpec::corner_default()),
    ] {
        for n in [10u64, 40] {
            let input = items(n);
            group.bench_with_input(BenchmarkId::new(name, n), &input, |b, input| {
                b.iter(|| {
                    let mut rng = LayoutRng::new(7);
                    let result = solve(
                        black_box(&source),
                        black_box(input),
                        canvas,
                        &anchor,
                        &cfg,
                        &mut rng,
                    );
                    black_box(result.len())
                });
            });
        }
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut rng = LayoutRng::new(7);
    let layout = solve(
        &Item::new(0, 100.0),
        &items(40),
        CanvasSpec::new(1400.0, 800.0),
        &AnchorSpec::Center,
        &LayoutConfig::default(),
        &mut rng,
    );

    // One display frame for the largest supported map.
    c.bench_function("render_points_40", |b| {
        let mut t = 0u64;
        b.iter(|| {
            t += 16;
            let points = render_points(&layout.positions, layout.anchor, Duration::from_millis(t));
            black_box(points.len())
        });
    });
}

criterion_group!(benches, bench_solve, bench_frame);
criterion_main!(benches);
