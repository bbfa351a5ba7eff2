use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gaussblur_filter::{BlurConfig, BlurPipeline, ExecutionStrategy};
use gaussblur_image::{Image, ImageSize};

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur Strict");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [2, 5, 10, 20].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * (2 * *radius + 1)) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, radius);

            let image_size = ImageSize {
                width: *width,
                height: *height,
            };
            let image_data = (0..width * height * 4).map(|x| (x % 256) as u8).collect();
            let image = Image::<u8, 4>::new(image_size, image_data).unwrap();

            for (name, strategy) in [
                ("serial", ExecutionStrategy::Serial),
                ("parallel_rows", ExecutionStrategy::ParallelRows),
            ] {
                let config = BlurConfig::new(*radius, *width, *height).with_strategy(strategy);
                let mut pipeline = BlurPipeline::new(config).unwrap();
                let mut output = Image::from_size_val(pipeline.output_size(), 0u8).unwrap();

                group.bench_with_input(
                    BenchmarkId::new(name, &parameter_string),
                    &image,
                    |b, i| b.iter(|| black_box(pipeline.blur_into(i, &mut output))),
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_blur);
criterion_main!(benches);
