//! Filter operations
//!
//! This module provides the convolution engine and the filter catalog built on it.

/// Filter kernels
pub mod kernels;

/// Filter configuration
mod config;
pub use config::*;

/// Convolution engine
mod convolution;
pub use convolution::*;

/// Filter error types
mod error;
pub use error::*;

/// Filter operations
mod ops;
pub use ops::*;
