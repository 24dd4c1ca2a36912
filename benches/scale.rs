use collager::{scale, Collage, CollageConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use std::hint::black_box;

// Helper function to create source images of different patterns
fn create_source_image(width: u32, height: u32, pattern: &str) -> RgbImage {
    match pattern {
        "gradient" => RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }),
        "checkerboard" => RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }),
        _ => RgbImage::from_pixel(width, height, Rgb([127, 127, 127])),
    }
}

// Benchmark the scaling kernel over source sizes, into a fixed 600x600 target
fn bench_scale_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale_sizes");
    let sizes = [(100, 100), (500, 500), (1000, 1000), (2000, 2000)];

    for size in sizes.iter() {
        let (width, height) = *size;
        let source = create_source_image(width, height, "gradient");

        group.bench_with_input(
            BenchmarkId::new("size", format!("{}x{}", width, height)),
            &source,
            |b, source| {
                b.iter(|| {
                    let mut target = RgbImage::new(600, 600);
                    scale(source, &mut target);
                    black_box(target);
                });
            },
        );
    }
    group.finish();
}

// Benchmark collage construction and tiling for different tilings
fn bench_make_collage(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_collage");
    let source = create_source_image(800, 600, "checkerboard");

    let configs = vec![
        ("default", CollageConfig::default()),
        ("small_tiles", CollageConfig::new(50, 12)),
        ("large_tiles", CollageConfig::new(300, 2)),
    ];

    for (name, config) in configs {
        group.bench_with_input(BenchmarkId::new("config", name), &source, |b, source| {
            b.iter(|| {
                let mut collage = Collage::from_image(source.clone(), config).unwrap();
                collage.make_collage();
                black_box(collage);
            });
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20); // Reduced sample size for faster runs
    targets = bench_scale_sizes, bench_make_collage
}
criterion_main!(benches);
