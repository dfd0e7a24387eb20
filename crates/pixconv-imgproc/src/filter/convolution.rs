use std::ops::Range;

use pixconv_image::{ImageSize, Rgb8Image};

use super::{kernels::Kernel2d, FilterError};
use crate::parallel::{self, ExecutionStrategy};

/// How samples falling outside the image are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Clamp out of range coordinates to the nearest valid pixel.
    ///
    /// Every output pixel is computed.
    Replicate,
    /// Only compute pixels whose whole neighborhood lies inside the image.
    ///
    /// The outer ring, `radius` pixels wide, is written as zero.
    Skip,
}

impl BorderMode {
    /// Output coordinates computed under this mode, as `(columns, rows)`.
    pub fn region(&self, size: ImageSize, radius: usize) -> (Range<usize>, Range<usize>) {
        match self {
            BorderMode::Replicate => (0..size.width, 0..size.height),
            BorderMode::Skip => (
                radius..size.width.saturating_sub(radius),
                radius..size.height.saturating_sub(radius),
            ),
        }
    }

    /// Source coordinate sampled for output `pos` at kernel index `k`.
    ///
    /// Under [`BorderMode::Skip`] the caller guarantees `pos >= radius` and
    /// `pos + radius < len`, so no clamping happens.
    #[inline]
    fn sample(&self, pos: usize, k: usize, radius: usize, len: usize) -> usize {
        match self {
            BorderMode::Replicate => {
                (pos as isize + k as isize - radius as isize).clamp(0, len as isize - 1) as usize
            }
            BorderMode::Skip => pos + k - radius,
        }
    }
}

/// Compute every output pixel of a new RGB8 image with a per-pixel function.
///
/// The output rows are split across `num_threads` workers. Each call of `f`
/// only reads shared, immutable state and returns the value for `(x, y)`, so
/// the result does not depend on the thread count. Pixels outside the region
/// selected by `border` and `radius` are left at zero.
///
/// # Arguments
///
/// * `size` - The size of the output image.
/// * `border` - Selects the computed region.
/// * `radius` - The neighborhood radius `f` reads around each pixel.
/// * `num_threads` - Number of worker threads, 0 meaning 1.
/// * `f` - Returns the RGB value of the output pixel at `(x, y)`.
pub fn convolve_fn<F>(
    size: ImageSize,
    border: BorderMode,
    radius: usize,
    num_threads: usize,
    f: F,
) -> Result<Rgb8Image, FilterError>
where
    F: Fn(usize, usize) -> [u8; 3] + Send + Sync,
{
    let mut dst = Rgb8Image::from_size_val(size, 0)?;
    if dst.is_empty() {
        return Ok(dst);
    }

    let (cols, rows) = border.region(size, radius);
    let strategy = ExecutionStrategy::from_num_threads(num_threads);

    parallel::par_iter_rows_indexed(dst.as_slice_mut(), 3 * size.width, strategy, |y, row| {
        if !rows.contains(&y) {
            return;
        }
        for x in cols.clone() {
            row[3 * x..3 * x + 3].copy_from_slice(&f(x, y));
        }
    })?;

    Ok(dst)
}

/// Convolve an RGB8 image with a square kernel.
///
/// For every output pixel the three channels are accumulated independently as
/// `sum(src(x + kx - r, y + ky - r) * kernel[ky][kx])` in `f32`, then turned
/// into the output value by `post`.
///
/// # Arguments
///
/// * `src` - The source image, read only.
/// * `kernel` - The convolution weights.
/// * `border` - How to treat the image borders.
/// * `num_threads` - Number of worker threads, 0 meaning 1.
/// * `post` - Converts the channel accumulators to the output pixel.
///
/// # Returns
///
/// A new image with the same size as `src`.
///
/// # Example
///
/// ```
/// use pixconv_image::Rgb8Image;
/// use pixconv_imgproc::filter::{convolve, kernels, BorderMode};
///
/// let src = Rgb8Image::from_size_pixel([4, 4].into(), [10, 20, 30]).unwrap();
/// let kernel = kernels::Kernel2d::from_mask(&kernels::SHARPEN);
/// let dst = convolve(&src, &kernel, BorderMode::Replicate, 2, |acc| {
///     acc.map(|v| v.clamp(0.0, 255.0) as u8)
/// })
/// .unwrap();
///
/// assert_eq!(dst, src);
/// ```
pub fn convolve<P>(
    src: &Rgb8Image,
    kernel: &Kernel2d,
    border: BorderMode,
    num_threads: usize,
    post: P,
) -> Result<Rgb8Image, FilterError>
where
    P: Fn([f32; 3]) -> [u8; 3] + Send + Sync,
{
    let cols = src.cols();
    let rows = src.rows();
    let radius = kernel.radius();
    let kernel_size = kernel.size();
    let weights = kernel.weights();
    let src_data = src.as_slice();

    convolve_fn(src.size(), border, radius, num_threads, |x, y| {
        let mut acc = [0.0f32; 3];
        for ky in 0..kernel_size {
            let sy = border.sample(y, ky, radius, rows);
            let row_offset = sy * cols;
            for kx in 0..kernel_size {
                let sx = border.sample(x, kx, radius, cols);
                let weight = weights[ky * kernel_size + kx];
                let offset = (row_offset + sx) * 3;
                for (ch, acc_val) in acc.iter_mut().enumerate() {
                    *acc_val += src_data[offset + ch] as f32 * weight;
                }
            }
        }
        post(acc)
    })
}
