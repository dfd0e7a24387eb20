use crate::parallel::{self, ExecutionStrategy, ParallelError};
use pixconv_image::Image;

/// Integer RGB weights for the luma conversion, summing to 32.
const RW: u32 = 11;
const GW: u32 = 16;
const BW: u32 = 5;

/// Luma of a single RGB8 pixel using the formula:
///
/// Y = (11 * R + 16 * G + 5 * B) / 32
///
/// # Example
///
/// ```
/// use pixconv_imgproc::color::luma_u8;
///
/// assert_eq!(luma_u8([255, 255, 255]), 255);
/// assert_eq!(luma_u8([0, 0, 0]), 0);
/// assert_eq!(luma_u8([100, 100, 100]), 100);
/// ```
#[inline]
pub fn luma_u8(pixel: [u8; 3]) -> u8 {
    let [r, g, b] = pixel;
    ((RW * r as u32 + GW * g as u32 + BW * b as u32) >> 5) as u8
}

/// Convert an RGB8 image to grayscale using [`luma_u8`], in parallel by rows.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
/// * `strategy` - The execution strategy.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use pixconv_image::Image;
/// use pixconv_imgproc::{color::gray_from_rgb_u8, parallel::ExecutionStrategy};
///
/// let image = Image::<u8, 3>::from_size_pixel([4, 5].into(), [10, 20, 30]).unwrap();
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.size().width, 4);
/// assert_eq!(gray.size().height, 5);
/// ```
pub fn gray_from_rgb_u8(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 1>,
    strategy: ExecutionStrategy,
) -> Result<(), ParallelError> {
    parallel::par_iter_rows(src, dst, strategy, |src_pixel, dst_pixel| {
        dst_pixel[0] = luma_u8([src_pixel[0], src_pixel[1], src_pixel[2]]);
    })
}
