//! Smoothing filters: Box Blur and Low Pass.
//!
//! Both are single 3x3 kernels run through the convolution engine, so
//! borders are zero-padded and darken toward the edge of the image.

use ndarray::{Array2, ArrayView2};

use super::core::{convolve_with, Kernel};
use crate::error::Result;

const NINTH: f64 = 1.0 / 9.0;

/// Box blur: unweighted 3x3 average.
pub const BOX_BLUR_KERNEL: [[f64; 3]; 3] = [[NINTH; 3]; 3];

/// Low pass: attenuates every pixel to 5/9 of its value, ignoring neighbors.
pub const LOW_PASS_KERNEL: [[f64; 3]; 3] = [
    [0.0, 0.0, 0.0],
    [0.0, 5.0 / 9.0, 0.0],
    [0.0, 0.0, 0.0],
];

/// Apply a 3x3 box blur.
///
/// # Arguments
/// * `input` - Grayscale image (height, width)
///
/// # Returns
/// Blurred image with the same dimensions
pub fn box_blur(input: ArrayView2<u8>) -> Result<Array2<u8>> {
    convolve_with(input, &Kernel::from_rows(&BOX_BLUR_KERNEL)?)
}

/// Apply the fixed low pass kernel.
pub fn low_pass(input: ArrayView2<u8>) -> Result<Array2<u8>> {
    convolve_with(input, &Kernel::from_rows(&LOW_PASS_KERNEL)?)
}
