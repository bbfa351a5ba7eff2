use gaussblur_image::{Image, ImageError, ImageSize};

/// Row alignment of the pipeline buffers, in pixels.
///
/// Every row starts on a multiple of 16 pixels, one 64 byte cache line for RGBA8.
pub const ROW_ALIGNMENT: usize = 16;

/// Row length in pixels after padding `width` up to [`ROW_ALIGNMENT`].
pub fn aligned_row_len(width: usize) -> usize {
    width.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
}

/// Number of values in a padded buffer of `size` with `channels` values per pixel.
///
/// Returns `None` if the length overflows or exceeds what a `Vec` can hold.
pub fn padded_len(size: ImageSize, channels: usize) -> Option<usize> {
    size.width
        .checked_next_multiple_of(ROW_ALIGNMENT)?
        .checked_mul(size.height)?
        .checked_mul(channels)
        .filter(|&len| len <= isize::MAX as usize)
}

/// A row-major 8-bit pixel buffer with padded rows.
///
/// Each row holds `stride() * C` values of which only the first `width() * C` are pixel
/// data. The padding is zero-initialized and never read back as pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurBuffer<const C: usize> {
    size: ImageSize,
    stride: usize,
    data: Vec<u8>,
}

impl<const C: usize> BlurBuffer<C> {
    /// Allocate a zeroed buffer for an image of the given size.
    ///
    /// # Panics
    ///
    /// Panics if [`padded_len`] overflows for `size`. [`BlurConfig::validate`] rejects
    /// such sizes before a pipeline allocates.
    ///
    /// [`BlurConfig::validate`]: crate::config::BlurConfig::validate
    pub fn new(size: ImageSize) -> Self {
        let stride = aligned_row_len(size.width);
        Self {
            size,
            stride,
            data: vec![0u8; stride * size.height * C],
        }
    }

    /// Size of the pixel area.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Width of the pixel area.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Height of the pixel area.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Padded row length in pixels.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Padded row length in values (`stride * C`).
    pub fn row_len(&self) -> usize {
        self.stride * C
    }

    /// The raw storage, padding included.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The raw mutable storage, padding included.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The pixel data of row `y`, `width * C` values long.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.row_len();
        &self.data[start..start + self.size.width * C]
    }

    /// Copy a tightly packed image into the buffer.
    ///
    /// # Errors
    ///
    /// The image must have exactly the size of the buffer.
    pub fn copy_from_image(&mut self, src: &Image<u8, C>) -> Result<(), ImageError> {
        self.check_image_size(src.size())?;
        let width = self.size.width * C;
        if width == 0 {
            return Ok(());
        }

        let row_len = self.row_len();
        self.data
            .chunks_exact_mut(row_len)
            .zip(src.as_slice().chunks_exact(width))
            .for_each(|(dst_row, src_row)| dst_row[..width].copy_from_slice(src_row));

        Ok(())
    }

    /// Copy the buffer into a tightly packed image of the same size.
    pub fn copy_to_image(&self, dst: &mut Image<u8, C>) -> Result<(), ImageError> {
        self.check_image_size(dst.size())?;
        let width = self.size.width * C;
        if width == 0 {
            return Ok(());
        }

        dst.as_slice_mut()
            .chunks_exact_mut(width)
            .zip(self.data.chunks_exact(self.row_len()))
            .for_each(|(dst_row, src_row)| dst_row.copy_from_slice(&src_row[..width]));

        Ok(())
    }

    /// Copy the buffer into a new tightly packed image.
    pub fn to_image(&self) -> Result<Image<u8, C>, ImageError> {
        let mut dst = Image::from_size_val(self.size, 0u8)?;
        self.copy_to_image(&mut dst)?;
        Ok(dst)
    }

    fn check_image_size(&self, size: ImageSize) -> Result<(), ImageError> {
        if size != self.size {
            return Err(ImageError::InvalidChannelShape(
                size.num_pixels() * C,
                self.size.num_pixels() * C,
            ));
        }
        Ok(())
    }
}

/// Round an accumulated pixel to 8 bits and store it.
#[inline(always)]
pub(crate) fn store_pixel<const C: usize>(acc: &[f32; C], dst: &mut [u8]) {
    for (d, &a) in dst.iter_mut().zip(acc.iter()) {
        *d = a.round().clamp(0.0, 255.0) as u8;
    }
}
