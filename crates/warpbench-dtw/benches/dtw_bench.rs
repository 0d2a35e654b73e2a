//! Criterion benchmarks for warpbench-dtw: bounded vs. unbounded accumulation,
//! rolling distance and path extraction.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use warpbench_dtw::{
    Accumulator, BandConstraint, CostMatrix, CostMetric, DEFAULT_BAND_FRACTION, Dtw, PathExtractor,
    Sequence,
};

fn make_random_sequence(n: usize, seed: u64) -> Sequence {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let values: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Sequence::new(values).unwrap()
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");

    for len in [256usize, 1024, 1701] {
        let a = make_random_sequence(len, 7);
        let cost = CostMatrix::build(a.as_view(), a.as_view(), &CostMetric::Absolute);
        let banded = BandConstraint::from_fraction(len, DEFAULT_BAND_FRACTION).unwrap();

        for (label, constraint) in [("unbounded", BandConstraint::Unconstrained), ("bounded", banded)] {
            let acc = Accumulator::new(constraint);
            group.bench_with_input(BenchmarkId::new(label, len), &cost, |bencher, cost| {
                bencher.iter(|| acc.accumulate(cost));
            });
        }
    }

    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_distance");

    for len in [256usize, 1024] {
        let a = make_random_sequence(len, 11);
        let b = make_random_sequence(len, 12);
        for (label, dtw) in [
            ("unbounded", Dtw::unconstrained()),
            ("bounded", Dtw::with_band_fraction(len, DEFAULT_BAND_FRACTION).unwrap()),
        ] {
            group.bench_with_input(BenchmarkId::new(label, len), &(&a, &b), |bencher, (a, b)| {
                bencher.iter(|| dtw.distance(a.as_view(), b.as_view()));
            });
        }
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let a = make_random_sequence(1024, 21);
    let b = make_random_sequence(1024, 22);
    let cost = CostMatrix::build(a.as_view(), b.as_view(), &CostMetric::Absolute);
    let accum = Accumulator::unbounded().accumulate(&cost);
    let extractor = PathExtractor::new(&cost, &accum).unwrap();

    c.bench_function("extract_path_1024", |bencher| {
        bencher.iter(|| extractor.extract().unwrap());
    });
}

criterion_group!(benches, bench_accumulate, bench_distance, bench_extract);
criterion_main!(benches);
