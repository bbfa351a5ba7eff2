use std::sync::Arc;

use gaussblur_image::{Image, ImageSize, Rgba8Image};

use crate::buffer::BlurBuffer;
use crate::column_blur::column_blur;
use crate::config::{BlurConfig, CHANNELS};
use crate::error::BlurError;
use crate::kernels::GaussianKernel;
use crate::parallel::Executor;
use crate::row_blur::row_blur;

/// Buffers reused by every call to [`BlurPipeline::blur`].
#[derive(Debug)]
struct PipelineBuffers {
    input: BlurBuffer<CHANNELS>,
    intermediate: BlurBuffer<CHANNELS>,
    output: BlurBuffer<CHANNELS>,
}

#[derive(Debug)]
enum PipelineState {
    Ready {
        kernel: GaussianKernel,
        buffers: PipelineBuffers,
        executor: Executor,
    },
    Disposed,
}

/// A separable gaussian blur over RGBA8888 images of a fixed size.
///
/// The pipeline builds its kernel and allocates its input, intermediate and output
/// buffers once, at construction. Every [`blur`](Self::blur) runs the horizontal pass
/// into the intermediate buffer, waits for it to complete, then runs the vertical pass
/// into the output buffer. The result is cropped by the blur radius as described by
/// [`CropMode`](crate::config::CropMode).
///
/// The buffers are released when the pipeline is dropped or [`dispose`](Self::dispose)d.
///
/// # Examples
///
/// ```
/// use gaussblur_filter::BlurPipeline;
/// use gaussblur_image::{Image, ImageSize};
///
/// let mut pipeline = BlurPipeline::from_size(2, 10, 10).unwrap();
///
/// let input = Image::<u8, 4>::from_size_pixel(
///     ImageSize { width: 10, height: 10 },
///     [10, 20, 30, 255],
/// ).unwrap();
///
/// let output = pipeline.blur(&input).unwrap();
/// assert_eq!(output.size(), ImageSize { width: 6, height: 6 });
/// assert_eq!(output.as_slice()[..4], [10, 20, 30, 255]);
///
/// pipeline.dispose().unwrap();
/// assert!(pipeline.blur(&input).is_err());
/// ```
#[derive(Debug)]
pub struct BlurPipeline {
    config: BlurConfig,
    state: PipelineState,
}

impl BlurPipeline {
    /// Create a pipeline for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::Configuration`] if the configuration is invalid or the
    /// execution context cannot be created.
    pub fn new(config: BlurConfig) -> Result<Self, BlurError> {
        config.validate()?;
        let executor = Executor::new(config.strategy)?;
        Self::with_executor(config, executor)
    }

    /// Create a pipeline with the default sigma and execution strategy.
    ///
    /// # Arguments
    ///
    /// * `radius` - Blur radius, also the number of pixels cropped on each edge.
    /// * `width` - Width of the input images.
    /// * `height` - Height of the input images.
    pub fn from_size(radius: usize, width: usize, height: usize) -> Result<Self, BlurError> {
        Self::new(BlurConfig::new(radius, width, height))
    }

    /// Create a pipeline that runs its passes on a shared thread pool.
    ///
    /// The strategy of `config` is replaced by the pool.
    pub fn with_thread_pool(
        mut config: BlurConfig,
        pool: Arc<rayon::ThreadPool>,
    ) -> Result<Self, BlurError> {
        let executor = Executor::from_pool(pool);
        config.strategy = executor.strategy();
        Self::with_executor(config, executor)
    }

    fn with_executor(config: BlurConfig, executor: Executor) -> Result<Self, BlurError> {
        config.validate()?;

        let kernel = GaussianKernel::new(config.radius, config.sigma())?;
        let buffers = PipelineBuffers {
            input: BlurBuffer::new(config.input_size()),
            intermediate: BlurBuffer::new(config.intermediate_size()),
            output: BlurBuffer::new(config.output_size()),
        };

        log::debug!(
            "blur pipeline ready: radius {} sigma {} {:?} {} -> {} on {} thread(s)",
            config.radius,
            kernel.sigma(),
            config.crop_mode,
            config.input_size(),
            config.output_size(),
            executor.num_threads(),
        );

        Ok(Self {
            config,
            state: PipelineState::Ready {
                kernel,
                buffers,
                executor,
            },
        })
    }

    /// Blur an image.
    ///
    /// # Arguments
    ///
    /// * `input` - An image of exactly the configured size.
    ///
    /// # Returns
    ///
    /// A new image of size [`output_size`](Self::output_size).
    ///
    /// # Errors
    ///
    /// * [`BlurError::UseAfterDispose`] if the pipeline was disposed.
    /// * [`BlurError::DimensionMismatch`] if the input size differs from the configured one.
    pub fn blur(&mut self, input: &Rgba8Image) -> Result<Rgba8Image, BlurError> {
        self.check_ready()?;
        self.check_size(self.config.input_size(), input.size())?;

        let mut output = Image::from_size_val(self.config.output_size(), 0u8)?;
        self.blur_into(input, &mut output)?;
        Ok(output)
    }

    /// Blur an image into a caller-provided output image.
    ///
    /// Both sizes are checked before anything is written; on error `output` is untouched.
    pub fn blur_into(
        &mut self,
        input: &Rgba8Image,
        output: &mut Rgba8Image,
    ) -> Result<(), BlurError> {
        self.check_ready()?;
        self.check_size(self.config.input_size(), input.size())?;
        self.check_size(self.config.output_size(), output.size())?;

        let PipelineState::Ready {
            kernel,
            buffers,
            executor,
        } = &mut self.state
        else {
            return Err(BlurError::UseAfterDispose);
        };

        buffers.input.copy_from_image(input)?;
        row_blur(
            &buffers.input,
            &mut buffers.intermediate,
            kernel.weights(),
            executor,
        )?;
        column_blur(
            &buffers.intermediate,
            &mut buffers.output,
            kernel.weights(),
            executor,
        )?;
        buffers.output.copy_to_image(output)?;

        Ok(())
    }

    /// Release the kernel and every buffer.
    ///
    /// The pipeline is unusable afterwards.
    ///
    /// # Errors
    ///
    /// [`BlurError::UseAfterDispose`] if the pipeline was already disposed.
    pub fn dispose(&mut self) -> Result<(), BlurError> {
        self.check_ready()?;
        self.state = PipelineState::Disposed;
        log::debug!("blur pipeline {} disposed", self.config.input_size());
        Ok(())
    }

    /// Whether [`dispose`](Self::dispose) was called.
    pub fn is_disposed(&self) -> bool {
        matches!(self.state, PipelineState::Disposed)
    }

    /// The gaussian kernel shared by both passes.
    pub fn kernel(&self) -> Result<&GaussianKernel, BlurError> {
        match &self.state {
            PipelineState::Ready { kernel, .. } => Ok(kernel),
            PipelineState::Disposed => Err(BlurError::UseAfterDispose),
        }
    }

    /// The configuration the pipeline was built with.
    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// The size every input image must have.
    pub fn input_size(&self) -> ImageSize {
        self.config.input_size()
    }

    /// The size of the blurred images.
    pub fn output_size(&self) -> ImageSize {
        self.config.output_size()
    }

    fn check_ready(&self) -> Result<(), BlurError> {
        if self.is_disposed() {
            log::warn!("blur pipeline {} used after dispose", self.config.input_size());
            return Err(BlurError::UseAfterDispose);
        }
        Ok(())
    }

    fn check_size(&self, expected: ImageSize, actual: ImageSize) -> Result<(), BlurError> {
        if expected != actual {
            return Err(BlurError::DimensionMismatch { expected, actual });
        }
        Ok(())
    }
}
