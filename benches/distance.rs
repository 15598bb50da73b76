use criterion::*;
use geo::{Geometry, LineString, MultiLineString, Rect};

#[path = "utils/random.rs"]
#[allow(dead_code)]
mod random;
use geo_planar::{distance, is_within_distance};
use rand::thread_rng;
use random::*;

const BBOX: [f64; 2] = [1024., 1024.];

fn random_lines(bbox: Rect<f64>, num_lines: usize, length: f64) -> Geometry<f64> {
    let lines = (0..num_lines)
        .map(|_| {
            let line = uniform_line_with_length(&mut thread_rng(), bbox, length);
            LineString(vec![line.start, line.end])
        })
        .collect();
    MultiLineString(lines).into()
}

fn short_lines(c: &mut Criterion) {
    const NUM_LINES: usize = 256;
    let left: Rect<f64> = Rect::new([0., 0.], BBOX);
    let right: Rect<f64> = Rect::new([2048., 0.], [2048. + BBOX[0], BBOX[1]]);
    let a = random_lines(left, NUM_LINES, BBOX[0] / 16.);
    let b = random_lines(right, NUM_LINES, BBOX[0] / 16.);

    c.bench_function("Distance - short random lines", |bench| {
        bench.iter(|| {
            black_box(distance(&a, &b));
        })
    });
    c.bench_function("Within distance - short random lines", |bench| {
        bench.iter(|| {
            black_box(is_within_distance(&a, &b, 512.));
        })
    });
}

fn uniform_lines(c: &mut Criterion) {
    const NUM_LINES: usize = 256;
    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);
    let lines = |n| -> Geometry<f64> {
        MultiLineString(
            (0..n)
                .map(|_| {
                    let line = uniform_line(&mut thread_rng(), bbox);
                    LineString(vec![line.start, line.end])
                })
                .collect(),
        )
        .into()
    };
    let a = lines(NUM_LINES);
    let b = lines(NUM_LINES);
    c.bench_function("Distance - overlapping uniform random lines", |bench| {
        bench.iter(|| {
            black_box(distance(&a, &b));
        })
    });
}

criterion_group!(benches, short_lines, uniform_lines);
criterion_main!(benches);
