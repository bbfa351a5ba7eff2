#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// row-padded pixel buffers owned by the pipeline.
pub mod buffer;

/// vertical convolution pass.
pub mod column_blur;

/// pipeline configuration.
pub mod config;

/// error types for the blur filters.
pub mod error;

/// gaussian kernel generation.
pub mod kernels;

/// module containing parallelization utilities.
pub mod parallel;

/// the blur pipeline.
pub mod pipeline;

/// horizontal convolution pass.
pub mod row_blur;

pub use crate::config::{BlurConfig, CropMode};
pub use crate::error::{BlurError, ConfigError};
pub use crate::kernels::{gaussian_kernel_1d, GaussianKernel, KernelError};
pub use crate::parallel::{ExecutionStrategy, Executor, ParallelError};
pub use crate::pipeline::BlurPipeline;
