//! Criterion benchmarks for the reverberator's per-frame cost
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use resona_reverb::FdnReverb;

const SAMPLE_RATE: f32 = 48000.0;

fn generate_test_signal(size: usize) -> Vec<(f32, f32)> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            let tone = (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5;
            (tone, -tone)
        })
        .collect()
}

fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("FdnReverb");

    for &block_size in &[64usize, 256, 1024] {
        let input = generate_test_signal(block_size);
        let mut reverb = FdnReverb::new().expect("default tuning");

        group.bench_function(format!("process_stereo/{block_size}"), |b| {
            b.iter(|| {
                let mut acc = 0.0f32;
                for &(l, r) in &input {
                    let (ol, or) = reverb.process_stereo(black_box(l), black_box(r));
                    acc += ol + or;
                }
                black_box(acc)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reverb);
criterion_main!(benches);
