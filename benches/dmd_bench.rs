use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vortex_dmd::{run, DmdConfig};

fn make_field(n_points: usize, n_time: usize) -> faer::Mat<f64> {
    let dt = 0.05;
    let mut data = faer::Mat::<f64>::zeros(n_points, n_time);
    for k in 0..n_time {
        let t = k as f64 * dt;
        for i in 0..n_points {
            let x = i as f64 / n_points as f64;
            data[(i, k)] = (2.0 * (x - 0.9 * t)).sin() + 0.2 * (5.0 * (x - 0.4 * t)).cos();
        }
    }
    data
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("dmd_run");

    for &(n_points, n_time) in &[(50, 100), (200, 200), (500, 400)] {
        let data = make_field(n_points, n_time);
        let config = DmdConfig {
            dt: 0.05,
            ..Default::default()
        };

        group.bench_function(format!("{n_points}x{n_time}"), |b| {
            b.iter(|| run(black_box(&data), black_box(&config)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
