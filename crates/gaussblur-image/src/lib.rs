#![deny(missing_docs)]
//! Image types for the gaussblur filters

/// image representation for the blur filters.
pub mod image;

/// Error types for the image module.
pub mod error;

/// RGBA8888 helpers and conversions.
pub mod rgba;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::rgba::Rgba8Image;
