use crate::buffer::{store_pixel, BlurBuffer};
use crate::error::BlurError;
use crate::parallel::Executor;

/// Convolve every row of `src` with `kernel`, writing `dst.width()` pixels per row.
///
/// Output pixel `(x, y)` is `sum_k src[x + k, y] * kernel[k]`, computed per channel in
/// `f32` and rounded to 8 bits on store. With `dst.width() == src.width() - 2 * radius`
/// every tap reads inside the row and the left and right `radius` columns are cropped.
/// Wider destinations read past the right edge, where the last source column is repeated.
///
/// Rows are independent and are dispatched on `executor`.
///
/// # Arguments
///
/// * `src` - The source buffer with shape (H, W, C).
/// * `dst` - The destination buffer with shape (H, W', C) where `W' <= W`.
/// * `kernel` - The 1-D kernel, `2 * radius + 1` taps.
/// * `executor` - The execution context.
pub fn row_blur<const C: usize>(
    src: &BlurBuffer<C>,
    dst: &mut BlurBuffer<C>,
    kernel: &[f32],
    executor: &Executor,
) -> Result<(), BlurError> {
    if kernel.len() % 2 == 0 {
        return Err(BlurError::InvalidKernelLength(kernel.len()));
    }

    if src.height() != dst.height() || dst.width() > src.width() {
        return Err(BlurError::InvalidPassSize {
            src: src.size(),
            dst: dst.size(),
            taps: kernel.len(),
        });
    }

    let dst_cols = dst.width();
    if dst_cols == 0 {
        return Ok(());
    }

    let last_col = src.width() - 1;
    let row_len = dst.row_len();
    let num_pixels = dst.size().num_pixels();

    log::trace!("row blur {} -> {}", src.size(), dst.size());

    executor.for_each_row(dst.as_slice_mut(), row_len, num_pixels, |r, dst_row| {
        let src_row = src.row(r);

        for c in 0..dst_cols {
            let mut acc = [0.0f32; C];
            for (k, &w) in kernel.iter().enumerate() {
                let x = (c + k).min(last_col) * C;
                for (acc_val, &v) in acc.iter_mut().zip(&src_row[x..x + C]) {
                    *acc_val += v as f32 * w;
                }
            }
            store_pixel(&acc, &mut dst_row[c * C..(c + 1) * C]);
        }
    });

    Ok(())
}
