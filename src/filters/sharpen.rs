//! Sharpen filters: Sharpen and High Pass.
//!
//! Both kernels have negative off-center weights, so dark halos around
//! bright details clamp to 0 instead of wrapping.

use ndarray::{Array2, ArrayView2};

use super::core::{convolve_with, Kernel};
use crate::error::Result;

const SEVEN_NINTHS: f64 = 7.0 / 9.0;

/// Sharpen: center 5, four-neighbors -1, corners 0.
pub const SHARPEN_KERNEL: [[f64; 3]; 3] = [
    [0.0, -1.0, 0.0],
    [-1.0, 5.0, -1.0],
    [0.0, -1.0, 0.0],
];

/// High pass: asymmetric, subtracts the top-left and bottom-right pairs.
pub const HIGH_PASS_KERNEL: [[f64; 3]; 3] = [
    [-SEVEN_NINTHS, -SEVEN_NINTHS, 0.0],
    [0.0, 5.0, 0.0],
    [0.0, -SEVEN_NINTHS, -SEVEN_NINTHS],
];

/// Apply the 3x3 sharpening kernel.
///
/// # Arguments
/// * `input` - Grayscale image (height, width)
///
/// # Returns
/// Sharpened image with the same dimensions
pub fn sharpen(input: ArrayView2<u8>) -> Result<Array2<u8>> {
    convolve_with(input, &Kernel::from_rows(&SHARPEN_KERNEL)?)
}

/// Apply the fixed high pass kernel.
pub fn high_pass(input: ArrayView2<u8>) -> Result<Array2<u8>> {
    convolve_with(input, &Kernel::from_rows(&HIGH_PASS_KERNEL)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_sharpen_uniform_interior_unchanged() {
        let img = Array2::<u8>::from_elem((5, 5), 40);

        let result = sharpen(img.view()).unwrap();

        // 5*40 - 4*40 in the interior; border loses padded neighbors
        assert_eq!(result[[2, 2]], 40);
        assert_eq!(result[[0, 2]], 80);
        assert_eq!(result[[0, 0]], 120);
    }

    #[test]
    fn test_sharpen_dark_pixel_halo_saturates() {
        let mut img = Array2::<u8>::from_elem((3, 3), 200);
        img[[1, 1]] = 0;

        let result = sharpen(img.view()).unwrap();

        // Center: 0 - 4*200 < 0
        assert_eq!(result[[1, 1]], 0);
        // Edge midpoint: 5*200 - (200 + 200 + 0) = 600 -> 255
        assert_eq!(result[[0, 1]], 255);
    }

    #[test]
    fn test_high_pass_uniform_interior() {
        let img = Array2::<u8>::from_elem((5, 5), 90);

        let result = high_pass(img.view()).unwrap();

        // 5*90 - 4*(7/9)*90 = 450 - 280 = 170
        assert!((result[[2, 2]] as i32 - 170).abs() <= 1);
    }

    #[test]
    fn test_high_pass_is_asymmetric() {
        // A bright pixel at the top-left of the center pulls the center
        // down; the same pixel at the top-right does not touch it.
        let mut left = Array2::<u8>::from_elem((3, 3), 30);
        left[[0, 0]] = 255;
        let mut right = Array2::<u8>::from_elem((3, 3), 30);
        right[[0, 2]] = 255;

        let left_result = high_pass(left.view()).unwrap();
        let right_result = high_pass(right.view()).unwrap();

        assert!(left_result[[1, 1]] < right_result[[1, 1]]);
    }

    #[test]
    fn test_high_pass_single_pixel() {
        let img = array![[50u8]];

        let result = high_pass(img.view()).unwrap();

        assert_eq!(result[[0, 0]], 250);
    }
}
