use crate::buffer::{store_pixel, BlurBuffer};
use crate::error::BlurError;
use crate::parallel::Executor;

/// Convolve every column of `src` with `kernel`, cropping `radius` rows top and bottom.
///
/// Output pixel `(x, y)` is `sum_k src[x, y + k] * kernel[k]`. The destination must be
/// exactly `2 * radius` rows shorter than the source and as wide.
///
/// Each output row is independent. Every pixel accumulates its `2 * radius + 1` taps in
/// `f32` and is rounded to 8 bits on store.
///
/// # Arguments
///
/// * `src` - The source buffer with shape (H, W, C), usually the output of
///   [`row_blur`](crate::row_blur::row_blur).
/// * `dst` - The destination buffer with shape (H - 2 * radius, W, C).
/// * `kernel` - The 1-D kernel, `2 * radius + 1` taps.
/// * `executor` - The execution context.
pub fn column_blur<const C: usize>(
    src: &BlurBuffer<C>,
    dst: &mut BlurBuffer<C>,
    kernel: &[f32],
    executor: &Executor,
) -> Result<(), BlurError> {
    if kernel.len() % 2 == 0 {
        return Err(BlurError::InvalidKernelLength(kernel.len()));
    }

    if src.width() != dst.width() || dst.height() + kernel.len() - 1 != src.height() {
        return Err(BlurError::InvalidPassSize {
            src: src.size(),
            dst: dst.size(),
            taps: kernel.len(),
        });
    }

    let cols = dst.width();
    if cols == 0 {
        return Ok(());
    }

    let row_len = dst.row_len();
    let src_row_len = src.row_len();
    let src_data = src.as_slice();
    let num_pixels = dst.size().num_pixels();

    log::trace!("column blur {} -> {}", src.size(), dst.size());

    executor.for_each_row(dst.as_slice_mut(), row_len, num_pixels, |r, dst_row| {
        for (x, dst_pixel) in dst_row[..cols * C].chunks_exact_mut(C).enumerate() {
            let mut acc = [0.0f32; C];
            for (k, &w) in kernel.iter().enumerate() {
                let offset = (r + k) * src_row_len + x * C;
                for (a, &v) in acc.iter_mut().zip(&src_data[offset..offset + C]) {
                    *a += v as f32 * w;
                }
            }
            store_pixel(&acc, dst_pixel);
        }
    });

    Ok(())
}
