use pixconv_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel size is even or smaller than 3.
    #[error("kernel size must be odd and >= 3, got {0}")]
    InvalidKernelSize(usize),

    /// The filter name does not match any known filter.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// Error raised by the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while scheduling the work across threads.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
