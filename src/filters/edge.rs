//! Sobel edge detection.
//!
//! The input is convolved with the horizontal and vertical Sobel kernels
//! through the regular engine. Each intermediate is clamped to [0, 255] like
//! any other convolution result, so negative gradients are dropped before the
//! magnitude is taken. The magnitude buffer is then normalized by its global
//! maximum to span [0, 255].

use log::warn;
use ndarray::{Array2, ArrayView2, Zip};

use super::core::{clamp_to_u8, convolve_with, Kernel};
use crate::error::{FilterError, Result};

/// Horizontal gradient kernel.
pub const SOBEL_X: [[f64; 3]; 3] = [
    [1.0, 0.0, -1.0],
    [2.0, 0.0, -2.0],
    [1.0, 0.0, -1.0],
];

/// Vertical gradient kernel.
pub const SOBEL_Y: [[f64; 3]; 3] = [
    [1.0, 2.0, 1.0],
    [0.0, 0.0, 0.0],
    [-1.0, -2.0, -1.0],
];

/// What to do when the gradient magnitude is zero everywhere (flat input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientFallback {
    /// Return an all-zero image.
    #[default]
    Zeros,
    /// Fail with [`FilterError::DegenerateGradient`].
    Error,
}

/// Sobel gradient magnitude, normalized to [0, 255].
///
/// # Arguments
/// * `input` - Grayscale image (height, width)
/// * `fallback` - Behavior for a flat image whose maximum magnitude is 0
///
/// # Returns
/// Edge image with the same dimensions
pub fn sobel_edges(input: ArrayView2<u8>, fallback: GradientFallback) -> Result<Array2<u8>> {
    let gx = Kernel::from_rows(&SOBEL_X)?;
    let gy = Kernel::from_rows(&SOBEL_Y)?;
    gradient_magnitude(input, &gx, &gy, fallback)
}

/// Combine two directional convolutions into a normalized magnitude image.
pub fn gradient_magnitude(
    input: ArrayView2<u8>,
    kernel_x: &Kernel,
    kernel_y: &Kernel,
    fallback: GradientFallback,
) -> Result<Array2<u8>> {
    let edge_x = convolve_with(input, kernel_x)?;
    let edge_y = convolve_with(input, kernel_y)?;

    let magnitude = Zip::from(&edge_x).and(&edge_y).map_collect(|&ex, &ey| {
        let ex = ex as f64;
        let ey = ey as f64;
        (ex * ex + ey * ey).sqrt()
    });

    let max = magnitude.iter().copied().fold(0.0f64, f64::max);

    if max <= 0.0 {
        return match fallback {
            GradientFallback::Zeros => {
                warn!("sobel: flat image, gradient magnitude is zero everywhere");
                Ok(Array2::zeros(input.dim()))
            }
            GradientFallback::Error => Err(FilterError::DegenerateGradient),
        };
    }

    Ok(magnitude.mapv(|m| clamp_to_u8(m / max * 255.0)))
}
