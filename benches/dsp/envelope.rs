//! Benchmarks for envelope program evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::dsp::EnvelopeProgram;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let Ok(pluck) = EnvelopeProgram::pluck(0.49, 0.01, 1.0, 0.001) else {
        return;
    };

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Linear attack ramp
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                pluck.render(black_box(&mut buffer), black_box(0.0), 48_000.0);
            })
        });

        // Exponential decay, powf per sample
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                pluck.render(black_box(&mut buffer), black_box(0.5), 48_000.0);
            })
        });
    }

    group.finish();
}
