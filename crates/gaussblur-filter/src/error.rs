use gaussblur_image::{ImageError, ImageSize};
use thiserror::Error;

use crate::kernels::KernelError;
use crate::parallel::ParallelError;

/// An invalid pipeline configuration. Construction fails and nothing is allocated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The blur radius crops away the whole image.
    #[error("radius {radius} leaves no output pixels for a {width}x{height} image")]
    OutputTooSmall {
        /// The requested blur radius.
        radius: usize,
        /// The configured input width.
        width: usize,
        /// The configured input height.
        height: usize,
    },

    /// The pipeline buffers for this image size cannot be addressed.
    #[error("a {width}x{height} image is too large to allocate the blur buffers")]
    BufferTooLarge {
        /// The configured input width.
        width: usize,
        /// The configured input height.
        height: usize,
    },

    /// The gaussian kernel could not be built.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The execution context could not be created.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// Errors returned by the blur passes and the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlurError {
    /// The pipeline configuration is invalid.
    #[error("invalid blur configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The image does not have the size the pipeline was configured for.
    #[error("image size mismatch, expected {expected} got {actual}")]
    DimensionMismatch {
        /// The size the pipeline was configured with.
        expected: ImageSize,
        /// The size of the offending image.
        actual: ImageSize,
    },

    /// The pipeline was used after being disposed.
    #[error("blur pipeline used after dispose")]
    UseAfterDispose,

    /// A convolution kernel must have an odd, non-zero length.
    #[error("invalid kernel length {0}, expected an odd non-zero length")]
    InvalidKernelLength(usize),

    /// The source and destination buffers of a pass do not fit together.
    #[error("cannot convolve a {src} buffer into a {dst} buffer with a {taps} tap kernel")]
    InvalidPassSize {
        /// The source buffer size.
        src: ImageSize,
        /// The destination buffer size.
        dst: ImageSize,
        /// Length of the kernel.
        taps: usize,
    },

    /// An image error.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl BlurError {
    /// Whether the error is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, BlurError::Configuration(_))
    }

    /// Whether the error is a dimension mismatch.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, BlurError::DimensionMismatch { .. })
    }

    /// Whether the error signals a use after dispose.
    pub fn is_use_after_dispose(&self) -> bool {
        matches!(self, BlurError::UseAfterDispose)
    }
}

impl From<KernelError> for BlurError {
    fn from(e: KernelError) -> Self {
        BlurError::Configuration(e.into())
    }
}

impl From<ParallelError> for BlurError {
    fn from(e: ParallelError) -> Self {
        BlurError::Configuration(e.into())
    }
}
