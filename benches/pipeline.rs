//! Benchmarks for the enhancement pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use underwater_enhancer::filters::Stage;
use underwater_enhancer::{EnhanceParams, EnhancePipeline, Frame};

/// Blue-green gradient resembling an underwater scene
fn generate_test_frame(width: u32, height: u32) -> Frame {
    let mut frame = Frame::new_filled(width, height, [0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / width as f32;
            let fy = y as f32 / height as f32;
            frame.set_pixel(
                x,
                y,
                [
                    (20.0 + 60.0 * fx) as u8,
                    (80.0 + 100.0 * fy) as u8,
                    (120.0 + 80.0 * (fx + fy) / 2.0) as u8,
                ],
            );
        }
    }
    frame
}

/// Full pipeline at preview and HD sizes
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    let pipeline = EnhancePipeline::new();
    let params = EnhanceParams::default();

    for (width, height) in [(900, 900), (1920, 1080)] {
        group.throughput(Throughput::Elements((width * height) as u64));
        group.bench_with_input(
            BenchmarkId::new("process", format!("{}x{}", width, height)),
            &generate_test_frame(width, height),
            |b, frame| {
                b.iter(|| pipeline.process(black_box(frame), black_box(&params)));
            },
        );
    }

    group.finish();
}

/// Each stage on its own at display size
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let params = EnhanceParams::default();
    let frame = generate_test_frame(900, 900);

    for stage in Stage::ORDER {
        group.bench_function(stage.name(), |b| {
            b.iter(|| {
                let mut work = frame.clone();
                stage.apply(black_box(&mut work), black_box(&params));
                work
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_stages);
criterion_main!(benches);
