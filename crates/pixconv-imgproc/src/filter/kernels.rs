use super::FilterError;

/// Smallest kernel size accepted by the filters.
pub const MIN_KERNEL_SIZE: usize = 3;

/// Largest kernel size in the advisory range.
pub const MAX_KERNEL_SIZE: usize = 15;

/// Horizontal Sobel gradient mask.
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Vertical Sobel gradient mask.
pub const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Sharpening mask: center 5, edge-adjacent neighbors -1, corners 0.
pub const SHARPEN: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// A square 2D convolution kernel stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel2d {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel2d {
    /// Create a kernel from its row-major weights.
    ///
    /// # Errors
    ///
    /// The size must be odd and at least 3, and `weights` must hold `size * size` values.
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self, FilterError> {
        if size < MIN_KERNEL_SIZE || size % 2 == 0 || weights.len() != size * size {
            return Err(FilterError::InvalidKernelSize(size));
        }
        Ok(Self { size, weights })
    }

    /// Create a 3x3 kernel from a fixed integer mask.
    pub fn from_mask(mask: &[[i32; 3]; 3]) -> Self {
        let weights = mask.iter().flatten().map(|&w| w as f32).collect();
        Self { size: 3, weights }
    }

    /// Side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Maximum offset sampled from the center, `(size - 1) / 2`.
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    /// The row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at kernel row `ky` and column `kx`.
    pub fn get(&self, ky: usize, kx: usize) -> Option<f32> {
        if ky >= self.size || kx >= self.size {
            return None;
        }
        Some(self.weights[ky * self.size + kx])
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Round a requested kernel size to one the filters accept.
///
/// Even sizes are incremented by one and anything below [`MIN_KERNEL_SIZE`] becomes it.
///
/// # Example
///
/// ```
/// use pixconv_imgproc::filter::kernels::normalize_kernel_size;
///
/// assert_eq!(normalize_kernel_size(6), 7);
/// assert_eq!(normalize_kernel_size(5), 5);
/// assert_eq!(normalize_kernel_size(0), 3);
/// ```
pub fn normalize_kernel_size(kernel_size: usize) -> usize {
    let kernel_size = if kernel_size % 2 == 0 {
        kernel_size + 1
    } else {
        kernel_size
    };
    kernel_size.max(MIN_KERNEL_SIZE)
}

/// Create a normalized 2D gaussian kernel.
///
/// Each weight is `exp(-(x² + y²) / (2σ²))` with `σ = kernel_size / 6` and
/// `(x, y)` the offset from the center, divided by the sum of all weights.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, odd and at least 3.
///
/// # Returns
///
/// The kernel, whose weights sum to 1.
pub fn gaussian_kernel_2d(kernel_size: usize) -> Result<Kernel2d, FilterError> {
    if kernel_size < MIN_KERNEL_SIZE || kernel_size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize(kernel_size));
    }

    let radius = (kernel_size - 1) as f32 / 2.0;
    let sigma = kernel_size as f32 / 6.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    let mut weights = Vec::with_capacity(kernel_size * kernel_size);
    for i in 0..kernel_size {
        for j in 0..kernel_size {
            let x = i as f32 - radius;
            let y = j as f32 - radius;
            weights.push((-(x * x + y * y) / (2.0 * sigma_sq)).exp());
        }
    }

    // normalize the kernel
    let norm = weights.iter().sum::<f32>();
    weights.iter_mut().for_each(|w| *w /= norm);

    log::debug!("gaussian kernel: size={kernel_size} sigma={sigma}");

    Kernel2d::new(kernel_size, weights)
}
