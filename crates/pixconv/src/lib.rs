//! Parallel convolution filters over 8-bit RGB pixel buffers.
//!
//! ```
//! use pixconv::image::Rgb8Image;
//! use pixconv::imgproc::filter::{apply_filter, FilterConfig, FilterKind};
//!
//! let src = Rgb8Image::from_size_pixel([16, 16].into(), [90, 90, 90]).unwrap();
//! let config = FilterConfig::new(FilterKind::Sharpen, 3, 4);
//! let dst = apply_filter(&src, &config).unwrap();
//!
//! assert_eq!(dst.pixel(8, 8).unwrap(), &[90, 90, 90]);
//! ```

#[doc(inline)]
pub use pixconv_image as image;

#[doc(inline)]
pub use pixconv_imgproc as imgproc;
