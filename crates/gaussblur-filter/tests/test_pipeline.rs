use std::sync::Mutex;

use approx::assert_abs_diff_eq;
use gaussblur_filter::{BlurConfig, BlurError, BlurPipeline, CropMode, ExecutionStrategy};
use gaussblur_image::{rgba::solid_rgba, Image, ImageSize, Rgba8Image};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_image(size: ImageSize, seed: u64) -> Rgba8Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size.num_pixels() * 4).map(|_| rng.random()).collect();
    Image::new(size, data).unwrap()
}

/// Direct 2-D convolution with the outer product of the kernel, no intermediate rounding.
fn reference_blur(src: &Rgba8Image, kernel: &[f32], out_size: ImageSize) -> Vec<f32> {
    let mut out = vec![0.0f32; out_size.num_pixels() * 4];
    for y in 0..out_size.height {
        for x in 0..out_size.width {
            for (ky, &wy) in kernel.iter().enumerate() {
                for (kx, &wx) in kernel.iter().enumerate() {
                    for ch in 0..4 {
                        let v = *src.get([y + ky, x + kx, ch]).unwrap() as f32;
                        out[(y * out_size.width + x) * 4 + ch] += v * wx * wy;
                    }
                }
            }
        }
    }
    out
}

#[test]
fn test_output_size_follows_radius() -> Result<(), BlurError> {
    for radius in 0..5 {
        let size = ImageSize {
            width: 13,
            height: 11,
        };
        let mut pipeline = BlurPipeline::from_size(radius, size.width, size.height)?;
        let output = pipeline.blur(&random_image(size, radius as u64))?;
        assert_eq!(
            output.size(),
            ImageSize {
                width: 13 - 2 * radius,
                height: 11 - 2 * radius,
            }
        );
    }
    Ok(())
}

#[test]
fn test_radius_zero_is_identity() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 17,
        height: 9,
    };
    let input = random_image(size, 7);
    let mut pipeline = BlurPipeline::from_size(0, size.width, size.height)?;
    assert_eq!(pipeline.kernel()?.weights(), &[1.0]);

    let output = pipeline.blur(&input)?;
    assert_eq!(output, input);
    Ok(())
}

#[test]
fn test_uniform_image_keeps_color() -> Result<(), BlurError> {
    init_logger();
    for (radius, width, height) in [(1, 3, 3), (3, 20, 9), (10, 64, 48), (20, 100, 41)] {
        let input = solid_rgba(ImageSize { width, height }, [12, 200, 77])?;
        let mut pipeline = BlurPipeline::from_size(radius, width, height)?;
        let output = pipeline.blur(&input)?;

        assert_eq!(output.width(), width - 2 * radius);
        assert_eq!(output.height(), height - 2 * radius);
        for pixel in output.as_slice().chunks_exact(4) {
            assert_eq!(pixel, &[12, 200, 77, 255]);
        }
    }
    Ok(())
}

#[test]
fn test_impulse_response() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 10,
        height: 10,
    };
    let mut input = Image::from_size_val(size, 0u8)?;
    input.set_pixel(5, 5, 0, 255)?;

    let mut pipeline = BlurPipeline::from_size(2, 10, 10)?;
    let center_weight = pipeline.kernel()?.center();
    let kernel = pipeline.kernel()?.weights().to_vec();
    let output = pipeline.blur(&input)?;

    // input (5, 5) maps to output (3, 3)
    let center = *output.get_pixel(3, 3, 0)? as f32;
    assert_abs_diff_eq!(center, 255.0 * center_weight * center_weight, epsilon = 1.0);

    for dy in -2isize..=2 {
        for dx in -2isize..=2 {
            let x = (3 + dx) as usize;
            let y = (3 + dy) as usize;
            let expected = 255.0 * kernel[(2 + dx) as usize] * kernel[(2 + dy) as usize];
            let actual = *output.get_pixel(x, y, 0)? as f32;
            assert_abs_diff_eq!(actual, expected, epsilon = 1.0);

            // other channels stay dark
            for ch in 1..4 {
                assert_eq!(*output.get_pixel(x, y, ch)?, 0);
            }
        }
    }

    // the corners of the output are out of reach of the impulse
    assert_eq!(*output.get_pixel(0, 0, 0)?, 0);
    assert_eq!(*output.get_pixel(5, 5, 0)?, 0);
    Ok(())
}

#[test]
fn test_matches_direct_convolution() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 37,
        height: 29,
    };
    let input = random_image(size, 1234);
    let mut pipeline = BlurPipeline::from_size(4, size.width, size.height)?;
    let kernel = pipeline.kernel()?.weights().to_vec();

    let output = pipeline.blur(&input)?;
    let expected = reference_blur(&input, &kernel, pipeline.output_size());

    // one rounding after each pass
    for (&actual, &expected) in output.as_slice().iter().zip(expected.iter()) {
        assert_abs_diff_eq!(actual as f32, expected, epsilon = 1.01);
    }
    Ok(())
}

#[test]
fn test_strategies_agree() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 120,
        height: 90,
    };
    let input = random_image(size, 99);

    let mut outputs = Vec::new();
    for strategy in [
        ExecutionStrategy::Serial,
        ExecutionStrategy::ParallelRows,
        ExecutionStrategy::Fixed(3),
        ExecutionStrategy::Auto,
    ] {
        let config = BlurConfig::new(6, size.width, size.height).with_strategy(strategy);
        let mut pipeline = BlurPipeline::new(config)?;
        outputs.push(pipeline.blur(&input)?);
    }

    for output in &outputs[1..] {
        assert_eq!(output, &outputs[0]);
    }
    Ok(())
}

#[test]
fn test_sequential_calls_are_independent() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 24,
        height: 18,
    };
    let first = random_image(size, 1);
    let second = random_image(size, 2);

    let mut reused = BlurPipeline::from_size(3, size.width, size.height)?;
    let first_out = reused.blur(&first)?;
    let second_out = reused.blur(&second)?;

    let mut fresh = BlurPipeline::from_size(3, size.width, size.height)?;
    assert_eq!(second_out, fresh.blur(&second)?);
    assert_eq!(first_out, fresh.blur(&first)?);
    assert_ne!(first_out, second_out);
    Ok(())
}

#[test]
fn test_width_only_crop() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 12,
        height: 9,
    };
    let input = random_image(size, 5);

    let mut strict = BlurPipeline::from_size(2, size.width, size.height)?;
    let mut width_only = BlurPipeline::new(
        BlurConfig::new(2, size.width, size.height).with_crop_mode(CropMode::WidthOnly),
    )?;

    let strict_out = strict.blur(&input)?;
    let wide_out = width_only.blur(&input)?;
    assert_eq!(strict_out.size(), ImageSize { width: 8, height: 5 });
    assert_eq!(wide_out.size(), ImageSize { width: 10, height: 5 });

    // the first columns are the strict result
    for y in 0..5 {
        assert_eq!(
            &wide_out.row(y).unwrap()[..8 * 4],
            strict_out.row(y).unwrap()
        );
    }
    Ok(())
}

#[test]
fn test_distinct_pipelines_in_threads() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 50,
        height: 40,
    };
    let inputs: Vec<_> = (0..4).map(|seed| random_image(size, seed)).collect();

    let expected = inputs
        .iter()
        .map(|input| -> Result<Rgba8Image, BlurError> {
            BlurPipeline::from_size(5, size.width, size.height)?.blur(input)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let results = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                s.spawn(move || -> Result<Rgba8Image, BlurError> {
                    let mut pipeline = BlurPipeline::from_size(5, size.width, size.height)?;
                    pipeline.blur(input)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("blur thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    assert_eq!(results, expected);
    Ok(())
}

#[test]
fn test_shared_pipeline_behind_mutex() -> Result<(), BlurError> {
    let size = ImageSize {
        width: 30,
        height: 30,
    };
    let pipeline = Mutex::new(BlurPipeline::from_size(2, size.width, size.height)?);
    let input = random_image(size, 3);
    let expected = BlurPipeline::from_size(2, size.width, size.height)?.blur(&input)?;

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let output = pipeline.lock().unwrap().blur(&input).unwrap();
                assert_eq!(output, expected);
            });
        }
    });
    Ok(())
}
