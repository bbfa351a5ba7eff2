use thiserror::Error;

/// Errors raised while building a convolution kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum KernelError {
    /// The gaussian sigma must be finite and strictly positive.
    #[error("gaussian sigma must be finite and > 0, got {0}")]
    InvalidSigma(f32),
}

/// Create a gaussian blur kernel of `2 * radius + 1` taps.
///
/// Each tap at offset `i` in `[-radius, radius]` is `exp(-0.5 * (i / sigma)^2)`, and the
/// kernel is normalized so the taps sum to one.
///
/// A radius of zero yields the identity kernel `[1.0]` for any sigma.
///
/// # Arguments
///
/// * `radius` - Half width of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Errors
///
/// Returns [`KernelError::InvalidSigma`] if `radius > 0` and `sigma` is not a finite
/// positive number.
///
/// # Examples
///
/// ```
/// use gaussblur_filter::kernels::gaussian_kernel_1d;
///
/// let kernel = gaussian_kernel_1d(3, 1.0).unwrap();
/// assert_eq!(kernel.len(), 7);
/// assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
/// ```
pub fn gaussian_kernel_1d(radius: usize, sigma: f32) -> Result<Vec<f32>, KernelError> {
    if radius == 0 {
        return Ok(vec![1.0]);
    }

    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(KernelError::InvalidSigma(sigma));
    }

    let radius = radius as isize;
    let mut kernel = Vec::with_capacity(2 * radius as usize + 1);

    // compute the kernel in f64, the taps are stored in f32
    for i in -radius..=radius {
        let x = i as f64 / sigma as f64;
        kernel.push((-0.5 * x * x).exp() as f32);
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);

    Ok(kernel)
}

/// A normalized, symmetric 1-D gaussian kernel.
///
/// The taps are immutable once built and are shared read-only by both blur passes.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    weights: Box<[f32]>,
    radius: usize,
    sigma: f32,
}

impl GaussianKernel {
    /// Build a gaussian kernel for the given radius and sigma.
    ///
    /// See [`gaussian_kernel_1d`] for the definition of the taps.
    pub fn new(radius: usize, sigma: f32) -> Result<Self, KernelError> {
        let weights = gaussian_kernel_1d(radius, sigma)?.into_boxed_slice();
        Ok(Self {
            weights,
            radius,
            sigma,
        })
    }

    /// Build a gaussian kernel using the conventional `sigma = radius / 3`.
    pub fn from_radius(radius: usize) -> Result<Self, KernelError> {
        Self::new(radius, default_sigma(radius))
    }

    /// The kernel taps, `2 * radius + 1` values long.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Half width of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// The sigma the kernel was sampled with.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false, a kernel has at least one tap.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The weight of the center tap.
    pub fn center(&self) -> f32 {
        self.weights[self.radius]
    }
}

/// The conventional sigma for a given radius, `radius / 3`.
pub fn default_sigma(radius: usize) -> f32 {
    radius as f32 / 3.0
}
