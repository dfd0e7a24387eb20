use std::fmt;
use std::time::{Duration, Instant};

use pixconv_image::{Image, ImageSize, Rgb8Image};

use super::{
    convolve, convolve_fn,
    kernels::{self, Kernel2d},
    BorderMode, FilterConfig, FilterError, FilterKind,
};
use crate::{color, parallel::ExecutionStrategy};

/// Accumulators this close below the next integer are rounded up before truncation.
///
/// Covers the f32 error of a normalized kernel so flat regions keep their value.
const TRUNCATION_EPSILON: f32 = 1e-2;

/// Blur an image using a gaussian blur filter
///
/// Samples outside the image replicate the nearest edge pixel, so every output
/// pixel is computed. Channel sums are truncated to integers.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `kernel_size` - The size of the kernel, odd and at least 3.
/// * `num_threads` - Number of worker threads, 0 meaning 1.
///
/// # Errors
///
/// Even or too small kernel sizes are rejected, see [`kernels::normalize_kernel_size`].
pub fn gaussian_blur(
    src: &Rgb8Image,
    kernel_size: usize,
    num_threads: usize,
) -> Result<Rgb8Image, FilterError> {
    let kernel = kernels::gaussian_kernel_2d(kernel_size)?;
    convolve(src, &kernel, BorderMode::Replicate, num_threads, |acc| {
        acc.map(|v| (v + TRUNCATION_EPSILON) as u8)
    })
}

/// Detect edges as the Sobel gradient magnitude of the image luma.
///
/// The magnitude `min(255, sqrt(gx² + gy²))` is written to the three output
/// channels. The outer 1 pixel ring is left black.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `num_threads` - Number of worker threads, 0 meaning 1.
pub fn edge_detection(src: &Rgb8Image, num_threads: usize) -> Result<Rgb8Image, FilterError> {
    if src.is_empty() {
        return Ok(Rgb8Image::from_size_val(src.size(), 0)?);
    }

    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    color::gray_from_rgb_u8(
        src,
        &mut gray,
        ExecutionStrategy::from_num_threads(num_threads),
    )?;

    let cols = src.cols();
    let gray_data = gray.as_slice();

    convolve_fn(src.size(), BorderMode::Skip, 1, num_threads, |x, y| {
        let mut sum_x = 0i32;
        let mut sum_y = 0i32;
        for ky in 0..3 {
            let row_offset = (y + ky - 1) * cols;
            for kx in 0..3 {
                let luma = gray_data[row_offset + x + kx - 1] as i32;
                sum_x += luma * kernels::SOBEL_X[ky][kx];
                sum_y += luma * kernels::SOBEL_Y[ky][kx];
            }
        }
        let magnitude = ((sum_x * sum_x + sum_y * sum_y) as f64).sqrt().min(255.0) as u8;
        [magnitude; 3]
    })
}

/// Sharpen an image with the fixed 3x3 sharpening mask.
///
/// Each channel is convolved independently and clamped to `[0, 255]`. The
/// outer 1 pixel ring is left black.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `num_threads` - Number of worker threads, 0 meaning 1.
pub fn sharpen(src: &Rgb8Image, num_threads: usize) -> Result<Rgb8Image, FilterError> {
    let kernel = Kernel2d::from_mask(&kernels::SHARPEN);
    convolve(src, &kernel, BorderMode::Skip, num_threads, |acc| {
        acc.map(|v| v.clamp(0.0, 255.0) as u8)
    })
}

/// Apply the filter selected by `config` to an image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `config` - The filter kind, kernel size and thread count.
///
/// # Returns
///
/// A new image with the same size as `src`.
///
/// # Example
///
/// ```
/// use pixconv_image::Rgb8Image;
/// use pixconv_imgproc::filter::{apply_filter, FilterConfig, FilterKind};
///
/// let src = Rgb8Image::from_size_pixel([8, 6].into(), [120, 60, 30]).unwrap();
/// let config = FilterConfig::new(FilterKind::GaussianBlur, 6, 2);
/// let dst = apply_filter(&src, &config).unwrap();
///
/// assert_eq!(dst, src);
/// ```
pub fn apply_filter(src: &Rgb8Image, config: &FilterConfig) -> Result<Rgb8Image, FilterError> {
    let config = config.normalized();
    match config.kind() {
        FilterKind::GaussianBlur => {
            gaussian_blur(src, config.kernel_size(), config.num_threads())
        }
        FilterKind::EdgeDetection => edge_detection(src, config.num_threads()),
        FilterKind::Sharpen => sharpen(src, config.num_threads()),
    }
}

/// Statistics of a single filter run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    /// The filter that ran.
    pub kind: FilterKind,
    /// The kernel size used, for filters that read it.
    pub kernel_size: Option<usize>,
    /// Number of worker threads.
    pub num_threads: usize,
    /// Size of the processed image.
    pub size: ImageSize,
    /// Wall clock time spent in the filter.
    pub elapsed: Duration,
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing Time: {} ms", self.elapsed.as_millis())?;
        writeln!(f, "Threads: {}", self.num_threads)?;
        writeln!(f, "Image Size: {}", self.size)?;
        match self.kernel_size {
            Some(kernel_size) => write!(f, "Filter: {} ({}x{})", self.kind, kernel_size, kernel_size),
            None => write!(f, "Filter: {}", self.kind),
        }
    }
}

/// Apply the filter selected by `config` and report how the run went.
///
/// Same as [`apply_filter`], additionally measuring the elapsed time.
pub fn apply_filter_with_report(
    src: &Rgb8Image,
    config: &FilterConfig,
) -> Result<(Rgb8Image, FilterReport), FilterError> {
    let config = config.normalized();

    log::debug!(
        "applying {} to {} image with {} threads",
        config.kind(),
        src.size(),
        config.num_threads()
    );

    let now = Instant::now();
    let dst = apply_filter(src, &config)?;
    let elapsed = now.elapsed();

    log::debug!("{} finished in {:?}", config.kind(), elapsed);

    let report = FilterReport {
        kind: config.kind(),
        kernel_size: config
            .kind()
            .uses_kernel_size()
            .then_some(config.kernel_size()),
        num_threads: config.num_threads(),
        size: src.size(),
        elapsed,
    };

    Ok((dst, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: usize, height: usize) -> Result<Rgb8Image, FilterError> {
        Ok(Rgb8Image::from_fn([width, height].into(), |x, y| {
            [(x * 30) as u8, (y * 30) as u8, ((x + y) * 10) as u8]
        })?)
    }

    #[test]
    fn test_gaussian_blur_uniform() -> Result<(), FilterError> {
        for value in [0u8, 1, 77, 128, 254, 255] {
            let src = Rgb8Image::from_size_pixel([9, 7].into(), [value, 255 - value, value / 2])?;
            for kernel_size in (3..=15).step_by(2) {
                let dst = gaussian_blur(&src, kernel_size, 2)?;
                assert_eq!(dst, src, "value {value} kernel {kernel_size}");
            }
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_rejects_even_size() -> Result<(), FilterError> {
        let src = gradient_image(4, 4)?;
        assert_eq!(
            gaussian_blur(&src, 6, 1),
            Err(FilterError::InvalidKernelSize(6))
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_smooths_step() -> Result<(), FilterError> {
        let src = Rgb8Image::from_fn([6, 1].into(), |x, _| {
            if x < 3 {
                [0, 0, 0]
            } else {
                [240, 240, 240]
            }
        })?;
        let dst = gaussian_blur(&src, 3, 1)?;
        let row: Vec<u8> = (0..6).map(|x| dst.pixel(x, 0).map(|p| p[0])).collect::<Result<_, _>>()?;
        assert_eq!(row[0], 0);
        assert_eq!(row[5], 240);
        assert!(row[2] > 0 && row[2] < 120);
        assert!(row[3] > 120 && row[3] < 240);
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn test_edge_detection_uniform() -> Result<(), FilterError> {
        let src = Rgb8Image::from_size_pixel([6, 5].into(), [200, 10, 90])?;
        let dst = edge_detection(&src, 3)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn test_edge_detection_vertical_edge() -> Result<(), FilterError> {
        // luma jumps from 0 to 100 between columns 1 and 2
        let src = Rgb8Image::from_fn([4, 3].into(), |x, _| {
            if x < 2 {
                [0, 0, 0]
            } else {
                [100, 100, 100]
            }
        })?;
        let dst = edge_detection(&src, 1)?;
        // sum_x = (1 + 2 + 1) * 100, sum_y = 0
        assert_eq!(dst.pixel(1, 1)?, &[255, 255, 255]);
        assert_eq!(dst.pixel(2, 1)?, &[255, 255, 255]);
        assert_eq!(dst.pixel(0, 1)?, &[0, 0, 0]);

        let src = Rgb8Image::from_fn([4, 3].into(), |x, _| {
            if x < 2 {
                [0, 0, 0]
            } else {
                [40, 40, 40]
            }
        })?;
        let dst = edge_detection(&src, 2)?;
        assert_eq!(dst.pixel(1, 1)?, &[160, 160, 160]);
        Ok(())
    }

    #[test]
    fn test_sharpen_uniform_interior() -> Result<(), FilterError> {
        let src = Rgb8Image::from_size_pixel([5, 5].into(), [33, 66, 250])?;
        let dst = sharpen(&src, 4)?;
        for y in 1..4 {
            for x in 1..4 {
                assert_eq!(dst.pixel(x, y)?, &[33, 66, 250]);
            }
        }
        assert_eq!(dst.pixel(0, 0)?, &[0, 0, 0]);
        assert_eq!(dst.pixel(4, 2)?, &[0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_sharpen_clamps() -> Result<(), FilterError> {
        // bright center on dark surround overshoots, dark center on bright surround undershoots
        let src = Rgb8Image::from_fn([3, 3].into(), |x, y| {
            if (x, y) == (1, 1) {
                [200, 0, 100]
            } else {
                [0, 200, 100]
            }
        })?;
        let dst = sharpen(&src, 1)?;
        assert_eq!(dst.pixel(1, 1)?, &[255, 0, 100]);
        Ok(())
    }

    #[test]
    fn test_apply_filter_dispatch() -> Result<(), FilterError> {
        let src = gradient_image(8, 6)?;

        let config = FilterConfig::new(FilterKind::GaussianBlur, 5, 2);
        assert_eq!(apply_filter(&src, &config)?, gaussian_blur(&src, 5, 1)?);

        let config = config.with_kind(FilterKind::EdgeDetection);
        assert_eq!(apply_filter(&src, &config)?, edge_detection(&src, 1)?);

        let config = config.with_kind(FilterKind::Sharpen);
        assert_eq!(apply_filter(&src, &config)?, sharpen(&src, 1)?);
        Ok(())
    }

    #[test]
    fn test_apply_filter_with_report() -> Result<(), FilterError> {
        let src = gradient_image(8, 6)?;

        let config = FilterConfig::new(FilterKind::GaussianBlur, 4, 2);
        let (dst, report) = apply_filter_with_report(&src, &config)?;
        assert_eq!(dst, gaussian_blur(&src, 5, 2)?);
        assert_eq!(report.kind, FilterKind::GaussianBlur);
        assert_eq!(report.kernel_size, Some(5));
        assert_eq!(report.num_threads, 2);
        assert_eq!(report.size, src.size());

        let text = report.to_string();
        assert!(text.contains("Threads: 2"));
        assert!(text.contains("Image Size: 8x6"));
        assert!(text.contains("Filter: Gaussian Blur (5x5)"));

        let (_, report) = apply_filter_with_report(&src, &config.with_kind(FilterKind::Sharpen))?;
        assert_eq!(report.kernel_size, None);
        assert!(report.to_string().ends_with("Filter: Sharpen"));
        Ok(())
    }

    #[test]
    fn test_filters_on_empty_image() -> Result<(), FilterError> {
        let src = Rgb8Image::new([0, 3].into(), vec![])?;
        for kind in FilterKind::ALL {
            let dst = apply_filter(&src, &FilterConfig::new(kind, 5, 4))?;
            assert!(dst.is_empty());
            assert_eq!(dst.size(), src.size());
        }
        Ok(())
    }
}
