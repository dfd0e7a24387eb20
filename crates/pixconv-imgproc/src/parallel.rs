use rayon::prelude::*;
use thiserror::Error;

use pixconv_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// Input and output sizes do not match.
    #[error("source and destination slices must have the same length")]
    SizeMismatch,
}

/// Controls how parallel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call. The pool lives only for the
    /// duration of the operation.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Pick the strategy matching a user facing thread count.
    ///
    /// A count of 0 is treated as 1, and a single thread runs serially.
    pub fn from_num_threads(num_threads: usize) -> Self {
        match num_threads {
            0 | 1 => ExecutionStrategy::Serial,
            n => ExecutionStrategy::Fixed(n),
        }
    }

    /// Number of worker threads the strategy will use.
    pub fn num_threads(&self) -> usize {
        match self {
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::ParallelRows => rayon::current_num_threads(),
            ExecutionStrategy::Fixed(n) => *n,
        }
    }
}

/// Number of hardware threads reported by the system, at least 1.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Thread counts offered to users: powers of two from 1 up to [`available_threads`].
///
/// # Example
///
/// ```
/// use pixconv_imgproc::parallel::thread_count_options;
///
/// let options = thread_count_options();
/// assert_eq!(options[0], 1);
/// assert!(options.windows(2).all(|w| w[1] == w[0] * 2));
/// ```
pub fn thread_count_options() -> Vec<usize> {
    let max_threads = available_threads();
    std::iter::successors(Some(1usize), |n| n.checked_mul(2))
        .take_while(|&n| n <= max_threads)
        .collect()
}

/// Apply a function to every row of a flat buffer, passing the row index.
///
/// Rows are disjoint `row_stride` long chunks of `dst`, so each invocation of
/// `f` owns its row exclusively and no synchronization is needed.
///
/// # Arguments
///
/// * `dst` - The destination buffer, `rows * row_stride` long.
/// * `row_stride` - Number of elements per row (width * channels).
/// * `strategy` - The execution strategy.
/// * `f` - The operation to perform on each `(row index, row)` pair.
pub fn par_iter_rows_indexed<T, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    if dst.len() % row_stride != 0 {
        return Err(ParallelError::SizeMismatch);
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, chunk)| f(row, chunk));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, chunk)| f(row, chunk));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(row, chunk)| f(row, chunk));
            });
        }
    }

    Ok(())
}

/// Apply a function to each pixel in the image in parallel by rows.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `strategy` - The execution strategy.
/// * `f` - Maps a source pixel (C1 values) to a destination pixel (C2 values).
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    strategy: ExecutionStrategy,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) -> Result<(), ParallelError>
where
    T1: Sync,
    T2: Send,
{
    if src.size() != dst.size() {
        return Err(ParallelError::SizeMismatch);
    }

    let cols = src.cols();
    let src_data = src.as_slice();

    par_iter_rows_indexed(dst.as_slice_mut(), C2 * cols, strategy, |row, dst_row| {
        let src_row = &src_data[row * C1 * cols..(row + 1) * C1 * cols];
        src_row
            .chunks_exact(C1)
            .zip(dst_row.chunks_exact_mut(C2))
            .for_each(|(src_pixel, dst_pixel)| f(src_pixel, dst_pixel));
    })
}
