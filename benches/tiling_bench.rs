use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_layer_tiling::{process_stack, tile, FlatLayout, FusionConfig, LayerLevel, LayerSelector, LayerStack};
use geo_types::LineString;

fn square(x0: f64, y0: f64, size: f64) -> LineString<f64> {
    LineString::from(vec![
        (x0, y0),
        (x0 + size, y0),
        (x0 + size, y0 + size),
        (x0, y0 + size),
        (x0, y0),
    ])
}

// n x n overlapping cells per layer, each layer offset from the one below
fn generate_layout(n: usize, layers: u16) -> (FlatLayout, LayerStack) {
    let mut layout = FlatLayout::new();
    let mut stack = LayerStack::new();

    for l in 0..layers {
        let sel = LayerSelector::new(l + 1, 0);
        let offset = l as f64 * 0.3;
        for i in 0..n {
            for j in 0..n {
                layout.add_polygon(sel, square(i as f64 + offset, j as f64 + offset, 1.5));
            }
        }
        stack = stack.with_level(LayerLevel::new(&format!("layer{}", l), Some(sel)));
    }

    (layout, stack)
}

fn bench_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack");
    group.sample_size(10); // Reduce sample size for speed

    for size in [5, 10, 20].iter() {
        let (layout, stack) = generate_layout(*size, 3);
        group.bench_with_input(BenchmarkId::new("fuse_and_tile", size), size, |b, _| {
            b.iter(|| {
                let fused = process_stack(&layout, &stack, &FusionConfig::meshing()).unwrap();
                tile(&fused).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stack);
criterion_main!(benches);
