use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

/// Number of pixels from which [`ExecutionStrategy::Auto`] switches to parallel execution.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the blur passes are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Process rows in parallel on the global Rayon thread pool for images of at least
    /// [`AUTO_PARALLEL_MIN_PIXELS`] pixels, serially otherwise.
    #[default]
    Auto,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a dedicated thread pool with `n` threads.
    ///
    /// The pool is built once, when the [`Executor`] is created.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether a pass over `num_pixels` pixels runs on more than one thread.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
            ExecutionStrategy::ParallelRows | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Serial => false,
        }
    }
}

/// A parallel-map execution context for row-wise kernels.
///
/// The executor owns (or shares) the thread pool the blur passes are dispatched on.
#[derive(Debug, Clone)]
pub struct Executor {
    strategy: ExecutionStrategy,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Executor {
    /// Create an executor for the given strategy.
    ///
    /// # Errors
    ///
    /// [`ExecutionStrategy::Fixed`] with zero threads, or a pool that fails to build, is an error.
    pub fn new(strategy: ExecutionStrategy) -> Result<Self, ParallelError> {
        let pool = match strategy {
            ExecutionStrategy::Fixed(0) => return Err(ParallelError::InvalidThreadCount(0)),
            ExecutionStrategy::Fixed(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?;
                Some(Arc::new(pool))
            }
            _ => None,
        };

        Ok(Self { strategy, pool })
    }

    /// Create an executor that dispatches on a caller-provided thread pool.
    pub fn from_pool(pool: Arc<rayon::ThreadPool>) -> Self {
        let strategy = ExecutionStrategy::Fixed(pool.current_num_threads());
        Self {
            strategy,
            pool: Some(pool),
        }
    }

    /// The strategy this executor was created with.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Number of worker threads a parallel pass would use.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None if self.strategy == ExecutionStrategy::Serial => 1,
            None => rayon::current_num_threads(),
        }
    }

    /// Run `f(row_index, row)` for every `row_len`-long row of `dst`.
    ///
    /// Rows are independent and may be processed in any order and on any thread. The call
    /// returns once every row has been written, so a subsequent pass may read all of `dst`.
    ///
    /// `num_pixels` is the pixel count of the pass, used by [`ExecutionStrategy::Auto`].
    pub fn for_each_row<T, F>(&self, dst: &mut [T], row_len: usize, num_pixels: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        if row_len == 0 {
            return;
        }

        if !self.strategy.is_parallel(num_pixels) {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
            return;
        }

        match &self.pool {
            Some(pool) => pool.install(|| par_for_each_row(dst, row_len, &f)),
            None => par_for_each_row(dst, row_len, &f),
        }
    }
}

fn par_for_each_row<T, F>(dst: &mut [T], row_len: usize, f: &F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    dst.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(r, row)| f(r, row));
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Auto,
            pool: None,
        }
    }
}
