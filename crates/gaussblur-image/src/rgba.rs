use crate::{Image, ImageError, ImageSize};

/// An 8-bit RGBA image, the pixel format consumed and produced by the blur pipeline.
pub type Rgba8Image = Image<u8, 4>;

#[cfg(feature = "image")]
impl From<::image::RgbaImage> for Rgba8Image {
    fn from(img: ::image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let size = ImageSize {
            width: width as usize,
            height: height as usize,
        };
        // an `RgbaImage` always holds `width * height * 4` bytes
        Image {
            size,
            data: img.into_raw(),
        }
    }
}

#[cfg(feature = "image")]
impl TryFrom<Rgba8Image> for ::image::RgbaImage {
    type Error = ImageError;

    fn try_from(img: Rgba8Image) -> Result<Self, Self::Error> {
        let size = img.size();
        let (width, height) = match (u32::try_from(size.width), u32::try_from(size.height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(ImageError::UnsupportedSize(size.width, size.height)),
        };
        ::image::RgbaImage::from_raw(width, height, img.into_vec())
            .ok_or(ImageError::UnsupportedSize(size.width, size.height))
    }
}

/// Create an opaque RGBA image filled with a single color.
pub fn solid_rgba(size: ImageSize, rgb: [u8; 3]) -> Result<Rgba8Image, ImageError> {
    Image::from_size_pixel(size, [rgb[0], rgb[1], rgb[2], u8::MAX])
}
