use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use graymill::engine::{EngineConfig, GrayscaleEngine};
use graymill::pixmap::PixelBuffer;

const IMAGE_PIXELS: usize = 512 * 512;

fn test_pixels() -> PixelBuffer {
    let samples = (0..IMAGE_PIXELS * 3).map(|i| (i % 251) as u8).collect();
    PixelBuffer::from_vec(samples).unwrap()
}

fn bench_worker_counts(c: &mut Criterion) {
    let source = test_pixels();

    for workers in [1, 2, 4, 8] {
        let engine = GrayscaleEngine::new(EngineConfig::with_workers(workers)).unwrap();
        c.bench_function(&format!("grayscale_512x512_{workers}_workers"), |b| {
            b.iter_batched(
                || source.clone(),
                |mut pixels| {
                    engine.process(black_box(&mut pixels)).unwrap();
                    pixels
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_gate_widths(c: &mut Criterion) {
    let source = test_pixels();

    // 8 segments pushed through progressively narrower admission
    for max_active in [1, 2, 4, 8] {
        let engine = GrayscaleEngine::new(EngineConfig {
            max_active,
            ..EngineConfig::with_workers(8)
        })
        .unwrap();
        c.bench_function(
            &format!("grayscale_512x512_8_workers_{max_active}_active"),
            |b| {
                b.iter_batched(
                    || source.clone(),
                    |mut pixels| {
                        engine.process(black_box(&mut pixels)).unwrap();
                        pixels
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }
}

criterion_group!(benches, bench_worker_counts, bench_gate_widths);
criterion_main!(benches);
