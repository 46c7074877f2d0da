use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sirenia::geom::{Size, size};
use sirenia::{Force, Node, RectCollide};
use std::hint::black_box;
use std::time::Duration;

/// Deterministic scatter of `count` rectangles with a spread chosen so that roughly
/// `density` of the canvas is covered.
fn scatter(count: usize, density: f64) -> Vec<Node<Size>> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mean_area = 30.0 * 20.0;
    let side = (count as f64 * mean_area / density).sqrt();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(10.0..50.0_f64);
            let h = rng.gen_range(10.0..30.0_f64);
            let x = rng.gen_range(0.0..side);
            let y = rng.gen_range(0.0..side);
            Node::with_data(i, x, y, size(w, h))
        })
        .collect()
}

fn bench_rect_collide(c: &mut Criterion) {
    let mut group = c.benchmark_group("rect_collide");
    group.measurement_time(Duration::from_secs(5));

    for &(count, density) in &[(100, 0.3), (1_000, 0.3), (1_000, 1.5), (5_000, 0.3)] {
        let nodes = scatter(count, density);
        let id = BenchmarkId::new(format!("density_{density}"), count);
        group.bench_with_input(id, &nodes, |b, nodes| {
            b.iter_batched(
                || {
                    let mut force = RectCollide::new()
                        .with_size(|n: &Node<Size>| n.data)
                        .with_iterations(2);
                    force.initialize(nodes).expect("initialize");
                    (force, nodes.clone())
                },
                |(mut force, mut nodes)| {
                    force.force(&mut nodes).expect("force");
                    black_box(nodes)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rect_collide);
criterion_main!(benches);
