use std::fmt;
use std::str::FromStr;

use super::kernels::{normalize_kernel_size, MAX_KERNEL_SIZE};
use super::FilterError;

/// The filters available in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FilterKind {
    /// Smoothing with a normalized gaussian kernel, replicated borders.
    #[default]
    GaussianBlur,
    /// Sobel gradient magnitude of the luma, written as gray.
    EdgeDetection,
    /// Fixed 3x3 sharpening mask applied per channel.
    Sharpen,
}

impl FilterKind {
    /// Every filter in the catalog, in display order.
    pub const ALL: [FilterKind; 3] = [
        FilterKind::GaussianBlur,
        FilterKind::EdgeDetection,
        FilterKind::Sharpen,
    ];

    /// Human readable name of the filter.
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::EdgeDetection => "Edge Detection",
            FilterKind::Sharpen => "Sharpen",
        }
    }

    /// Whether the filter reads the kernel size from the configuration.
    ///
    /// Edge detection and sharpening always use their fixed 3x3 masks.
    pub fn uses_kernel_size(&self) -> bool {
        matches!(self, FilterKind::GaussianBlur)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', '_'], " ");
        match key.as_str() {
            "gaussian blur" | "gaussian" | "blur" => Ok(FilterKind::GaussianBlur),
            "edge detection" | "edge" | "edges" | "sobel" => Ok(FilterKind::EdgeDetection),
            "sharpen" => Ok(FilterKind::Sharpen),
            _ => Err(FilterError::UnknownFilter(s.to_string())),
        }
    }
}

/// Parameters of a single filter invocation.
///
/// Values are normalized on construction: even kernel sizes are incremented,
/// sizes below 3 become 3 and a thread count of 0 becomes 1.
///
/// # Example
///
/// ```
/// use pixconv_imgproc::filter::{FilterConfig, FilterKind};
///
/// let config = FilterConfig::new(FilterKind::GaussianBlur, 6, 0);
/// assert_eq!(config.kernel_size(), 7);
/// assert_eq!(config.num_threads(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FilterConfig {
    kind: FilterKind,
    kernel_size: usize,
    num_threads: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kind: FilterKind::GaussianBlur,
            kernel_size: 5,
            num_threads: 1,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration, normalizing the kernel size and thread count.
    pub fn new(kind: FilterKind, kernel_size: usize, num_threads: usize) -> Self {
        Self {
            kind,
            kernel_size,
            num_threads,
        }
        .normalized()
    }

    /// Set the filter kind.
    pub fn with_kind(mut self, kind: FilterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the kernel size, rounding even values up to the next odd one.
    pub fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self.normalized()
    }

    /// Set the number of worker threads, 0 meaning 1.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self.normalized()
    }

    /// Return a copy with the normalization rules applied.
    ///
    /// Needed for configurations built by deserialization, which bypasses [`FilterConfig::new`].
    pub fn normalized(self) -> Self {
        let kernel_size = normalize_kernel_size(self.kernel_size);
        if kernel_size != self.kernel_size {
            log::debug!(
                "kernel size {} rounded to {}",
                self.kernel_size,
                kernel_size
            );
        }
        if kernel_size > MAX_KERNEL_SIZE {
            log::warn!(
                "kernel size {} is above the advisory maximum of {}",
                kernel_size,
                MAX_KERNEL_SIZE
            );
        }

        Self {
            kind: self.kind,
            kernel_size,
            num_threads: self.num_threads.max(1),
        }
    }

    /// The selected filter.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The kernel size, always odd and at least 3.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    /// The number of worker threads, always at least 1.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}
