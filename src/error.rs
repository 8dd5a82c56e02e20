//! Error types for the convolution engine and filter bank.

/// Errors produced by [`convolve`](crate::filters::core::convolve) and the
/// filters built on it.
///
/// All failures are local and synchronous: a failing call yields no buffer.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Kernel has an even or zero dimension, so no unique center cell exists.
    #[error("invalid kernel: {height}x{width} (both dimensions must be odd and >= 1)")]
    InvalidKernel { height: usize, width: usize },

    /// Input image has zero width or height.
    #[error("empty image: {height}x{width}")]
    EmptyImage { height: usize, width: usize },

    /// Sobel magnitude is zero everywhere and cannot be normalized.
    #[error("gradient magnitude is zero everywhere, nothing to normalize")]
    DegenerateGradient,

    /// A flat buffer did not match the requested dimensions.
    #[error("buffer shape mismatch: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T, E = FilterError> = std::result::Result<T, E>;
