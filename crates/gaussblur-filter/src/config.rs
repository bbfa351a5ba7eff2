use gaussblur_image::ImageSize;

use crate::buffer::padded_len;
use crate::error::ConfigError;
use crate::kernels::{default_sigma, KernelError};
use crate::parallel::ExecutionStrategy;

/// Values per pixel of the images a pipeline processes (RGBA8888).
pub(crate) const CHANNELS: usize = 4;

/// How the blurred image is cropped at the borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CropMode {
    /// Drop `radius` pixels on every edge, output `(W - 2r) x (H - 2r)`.
    #[default]
    Symmetric,

    /// Drop `radius` columns on the left only and `radius` rows top and bottom,
    /// output `(W - r) x (H - 2r)`.
    ///
    /// The trailing `radius` columns of the horizontal pass read past the right edge,
    /// where the last source column is repeated.
    WidthOnly,
}

/// Configuration of a [`BlurPipeline`](crate::pipeline::BlurPipeline).
///
/// # Examples
///
/// ```
/// use gaussblur_filter::{BlurConfig, CropMode, ExecutionStrategy};
///
/// let config = BlurConfig::new(20, 640, 480)
///     .with_crop_mode(CropMode::Symmetric)
///     .with_strategy(ExecutionStrategy::Serial);
///
/// assert_eq!(config.output_size().width, 600);
/// assert_eq!(config.output_size().height, 440);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlurConfig {
    /// Blur radius, also the per-edge crop.
    pub radius: usize,
    /// Width every input image must have.
    pub width: usize,
    /// Height every input image must have.
    pub height: usize,
    /// Gaussian sigma, `radius / 3` when unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sigma: Option<f32>,
    /// Border cropping.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop_mode: CropMode,
    /// How the passes are dispatched.
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: ExecutionStrategy,
}

impl BlurConfig {
    /// A symmetric-crop configuration with the default sigma and strategy.
    pub fn new(radius: usize, width: usize, height: usize) -> Self {
        Self {
            radius,
            width,
            height,
            sigma: None,
            crop_mode: CropMode::default(),
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Override the gaussian sigma.
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = Some(sigma);
        self
    }

    /// Set the crop mode.
    pub fn with_crop_mode(mut self, crop_mode: CropMode) -> Self {
        self.crop_mode = crop_mode;
        self
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The sigma used to build the kernel.
    pub fn sigma(&self) -> f32 {
        self.sigma.unwrap_or_else(|| default_sigma(self.radius))
    }

    /// The size every input image must have.
    pub fn input_size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// The size of the horizontal pass output.
    pub fn intermediate_size(&self) -> ImageSize {
        let crop = match self.crop_mode {
            CropMode::Symmetric => 2 * self.radius,
            CropMode::WidthOnly => self.radius,
        };
        ImageSize {
            width: self.width.saturating_sub(crop),
            height: self.height,
        }
    }

    /// The size of the blurred image.
    pub fn output_size(&self) -> ImageSize {
        ImageSize {
            width: self.intermediate_size().width,
            height: self.height.saturating_sub(2 * self.radius),
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::OutputTooSmall`] if `2 * radius >= width` or `2 * radius >= height`.
    /// * [`ConfigError::BufferTooLarge`] if a padded pipeline buffer would not fit in memory.
    /// * [`ConfigError::Kernel`] if `radius > 0` and the sigma is not a finite positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let crop = self.radius.checked_mul(2);
        match crop {
            Some(crop) if crop < self.width && crop < self.height => {}
            _ => {
                return Err(ConfigError::OutputTooSmall {
                    radius: self.radius,
                    width: self.width,
                    height: self.height,
                })
            }
        }

        let sizes = [
            self.input_size(),
            self.intermediate_size(),
            self.output_size(),
        ];
        if sizes.iter().any(|&size| padded_len(size, CHANNELS).is_none()) {
            return Err(ConfigError::BufferTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        let sigma = self.sigma();
        if self.radius > 0 && (!sigma.is_finite() || sigma <= 0.0) {
            return Err(KernelError::InvalidSigma(sigma).into());
        }

        Ok(())
    }
}
