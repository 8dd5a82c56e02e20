//! Core convolution engine shared by every filter.
//!
//! This module provides:
//! - [`Kernel`], a validated rectangular weight grid with odd dimensions
//! - [`convolve`], zero-padded same-size 2D convolution of a grayscale image
//!
//! ## Boundary Handling
//!
//! Samples outside the image read as 0 (constant zero padding, not
//! replication or reflection). Pixels within `kernel_size / 2` of the border
//! are therefore darker than an infinite-image convolution would produce.
//!
//! ## Numeric Handling
//!
//! Weighted sums are accumulated in `f64`, clamped to [0, 255] and then
//! truncated to `u8`. Negative sums become 0, never wrap around.

use log::debug;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{FilterError, Result};

/// Rectangular convolution kernel with odd height and odd width.
///
/// The kernel is applied as a correlation: weight `[[0, 0]]` multiplies the
/// top-left neighbor of the output pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Wrap a weight grid, rejecting even or zero dimensions.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        check_kernel_dims(weights.dim())?;
        Ok(Self { weights })
    }

    /// Build a kernel from fixed-size rows, e.g. the filter bank's 3x3 tables.
    pub fn from_rows<const H: usize, const W: usize>(rows: &[[f64; W]; H]) -> Result<Self> {
        Self::new(Array2::from_shape_fn((H, W), |(r, c)| rows[r][c]))
    }

    /// Square kernel that is zero everywhere except a center weight of 1.
    pub fn identity(size: usize) -> Result<Self> {
        check_kernel_dims((size, size))?;
        let mut weights = Array2::<f64>::zeros((size, size));
        weights[[size / 2, size / 2]] = 1.0;
        Ok(Self { weights })
    }

    /// (height, width)
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    /// Weight of the center cell.
    pub fn center(&self) -> f64 {
        let (h, w) = self.dim();
        self.weights[[h / 2, w / 2]]
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }
}

fn check_kernel_dims((height, width): (usize, usize)) -> Result<()> {
    if height == 0 || width == 0 || height % 2 == 0 || width % 2 == 0 {
        return Err(FilterError::InvalidKernel { height, width });
    }
    Ok(())
}

/// Clamp a weighted sum to the 8-bit range, then truncate.
#[inline]
pub(crate) fn clamp_to_u8(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Convolve a grayscale image with an arbitrary odd-sized kernel.
///
/// # Arguments
/// * `image` - Single-channel image (height, width)
/// * `kernel` - Weight grid (kernel_height, kernel_width), both odd
///
/// # Returns
/// New image with the same dimensions as `image`. Fails with
/// [`FilterError::InvalidKernel`] for even or zero kernel dimensions and
/// [`FilterError::EmptyImage`] for a zero-sized image.
pub fn convolve(image: ArrayView2<u8>, kernel: ArrayView2<f64>) -> Result<Array2<u8>> {
    check_kernel_dims(kernel.dim())?;

    let (height, width) = image.dim();
    if height == 0 || width == 0 {
        return Err(FilterError::EmptyImage { height, width });
    }

    let (kernel_h, kernel_w) = kernel.dim();
    let pad_h = kernel_h / 2;
    let pad_w = kernel_w / 2;

    debug!(
        "convolve: image {}x{}, kernel {}x{}",
        height, width, kernel_h, kernel_w
    );

    let mut data = vec![0u8; height * width];

    // Rows are independent; each worker writes only its own row.
    data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0f64;

            for ky in 0..kernel_h {
                // Padded coordinate y + ky sits at source row y + ky - pad_h
                let sy = match (y + ky).checked_sub(pad_h) {
                    Some(sy) if sy < height => sy,
                    _ => continue,
                };

                for kx in 0..kernel_w {
                    let sx = match (x + kx).checked_sub(pad_w) {
                        Some(sx) if sx < width => sx,
                        _ => continue,
                    };

                    sum += image[[sy, sx]] as f64 * kernel[[ky, kx]];
                }
            }

            *out = clamp_to_u8(sum);
        }
    });

    Ok(Array2::from_shape_vec((height, width), data)?)
}

/// Convolve with a pre-validated [`Kernel`].
pub fn convolve_with(image: ArrayView2<u8>, kernel: &Kernel) -> Result<Array2<u8>> {
    convolve(image, kernel.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};

    /// Deterministic pseudo-random test image.
    fn noise_image(height: usize, width: usize, seed: u32) -> Array2<u8> {
        let mut state = seed;
        Array2::from_shape_fn((height, width), |_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
    }

    /// Explicitly padded reference: copy into a zero border, then slide.
    fn reference_convolve(image: &Array2<u8>, kernel: &Array2<f64>) -> Array2<u8> {
        let (h, w) = image.dim();
        let (kh, kw) = kernel.dim();
        let (ph, pw) = (kh / 2, kw / 2);

        let mut padded = Array2::<f64>::zeros((h + 2 * ph, w + 2 * pw));
        padded
            .slice_mut(s![ph..ph + h, pw..pw + w])
            .assign(&image.mapv(|v| v as f64));

        let mut out = Array2::<u8>::zeros((h, w));
        for i in 0..h {
            for j in 0..w {
                let region = padded.slice(s![i..i + kh, j..j + kw]);
                let sum: f64 = (&region * kernel).sum();
                out[[i, j]] = sum.clamp(0.0, 255.0) as u8;
            }
        }
        out
    }

    #[test]
    fn test_shape_preserved_for_odd_kernels() {
        let img = noise_image(7, 11, 1);
        for (kh, kw) in [(1, 1), (3, 3), (1, 5), (5, 3), (7, 7)] {
            let kernel = Array2::<f64>::from_elem((kh, kw), 0.1);
            let result = convolve(img.view(), kernel.view()).unwrap();
            assert_eq!(result.dim(), img.dim(), "kernel {}x{}", kh, kw);
        }
    }

    #[test]
    fn test_single_pixel_sees_only_center_weight() {
        let img = array![[200u8]];
        let kernel = array![[1.0, 2.0, 3.0], [4.0, 5.0 / 9.0, 6.0], [7.0, 8.0, 9.0]];

        let result = convolve(img.view(), kernel.view()).unwrap();

        // 200 * 5/9 = 111.1 -> 111
        assert_eq!(result[[0, 0]], 111);
    }

    #[test]
    fn test_single_pixel_clamps_center_product() {
        let img = array![[100u8]];
        let sharpen = array![[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

        let result = convolve(img.view(), sharpen.view()).unwrap();

        assert_eq!(result[[0, 0]], 255);
    }

    #[test]
    fn test_identity_kernel_returns_input() {
        let img = noise_image(9, 6, 42);
        let kernel = Kernel::identity(3).unwrap();

        let result = convolve_with(img.view(), &kernel).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_kernel_is_applied_as_correlation() {
        // Only the top-left weight is set, so each output pixel copies its
        // up-left neighbor: the image shifts down and right by one.
        let img = array![[10u8, 20, 30], [40, 50, 60], [70, 80, 90]];
        let kernel = array![[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];

        let result = convolve(img.view(), kernel.view()).unwrap();

        assert_eq!(result, array![[0u8, 0, 0], [0, 10, 20], [0, 40, 50]]);
    }

    #[test]
    fn test_negative_sum_clamps_to_zero() {
        // Bright isolated pixel on a mid-gray field: its four neighbors get
        // 5*100 - (3*100 + 255) = -55, which must become 0 rather than 201.
        let mut img = Array2::<u8>::from_elem((5, 5), 100);
        img[[2, 2]] = 255;
        let sharpen = Kernel::from_rows(&[[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
            .unwrap();

        let result = convolve_with(img.view(), &sharpen).unwrap();

        assert_eq!(result[[2, 2]], 255);
        assert_eq!(result[[1, 2]], 0);
        assert_eq!(result[[3, 2]], 0);
        assert_eq!(result[[2, 1]], 0);
        assert_eq!(result[[2, 3]], 0);
    }

    #[test]
    fn test_zero_padding_darkens_border() {
        let img = Array2::<u8>::from_elem((4, 4), 90);
        let kernel = Array2::<f64>::from_elem((3, 3), 1.0 / 9.0);

        let result = convolve(img.view(), kernel.view()).unwrap();

        // Corner sees 4 of 9 samples, edge sees 6 of 9
        assert!((result[[0, 0]] as i32 - 40).abs() <= 1);
        assert!((result[[0, 1]] as i32 - 60).abs() <= 1);
        assert!((result[[1, 1]] as i32 - 90).abs() <= 1);
    }

    #[test]
    fn test_matches_padded_reference() {
        let img = noise_image(13, 17, 7);
        let kernels = [
            array![[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
            array![[-7.0 / 9.0, -7.0 / 9.0, 0.0], [0.0, 5.0, 0.0], [0.0, -7.0 / 9.0, -7.0 / 9.0]],
            Array2::from_shape_fn((5, 3), |(r, c)| (r as f64 - 2.0) * 0.3 + c as f64 * 0.2),
        ];

        for kernel in kernels.iter() {
            let expected = reference_convolve(&img, kernel);
            let result = convolve(img.view(), kernel.view()).unwrap();
            for ((i, j), &v) in result.indexed_iter() {
                // Accumulation order may differ by one ulp near integers
                assert!(
                    (v as i32 - expected[[i, j]] as i32).abs() <= 1,
                    "mismatch at ({}, {}): {} vs {}",
                    i,
                    j,
                    v,
                    expected[[i, j]]
                );
            }
        }
    }

    #[test]
    fn test_even_kernel_rejected() {
        let img = noise_image(4, 4, 3);
        let kernel = Array2::<f64>::zeros((2, 3));

        let err = convolve(img.view(), kernel.view()).unwrap_err();

        assert!(matches!(err, FilterError::InvalidKernel { height: 2, width: 3 }));
    }

    #[test]
    fn test_zero_sized_kernel_rejected() {
        assert!(matches!(
            Kernel::new(Array2::<f64>::zeros((0, 3))),
            Err(FilterError::InvalidKernel { height: 0, width: 3 })
        ));
        assert!(matches!(
            Kernel::identity(4),
            Err(FilterError::InvalidKernel { .. })
        ));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = Array2::<u8>::zeros((0, 5));
        let kernel = Kernel::identity(3).unwrap();

        let err = convolve_with(img.view(), &kernel).unwrap_err();

        assert!(matches!(err, FilterError::EmptyImage { height: 0, width: 5 }));
    }

    #[test]
    fn test_kernel_center() {
        let kernel = Kernel::from_rows(&[[0.0, 0.0, 0.0], [0.0, 5.0 / 9.0, 0.0], [0.0, 0.0, 0.0]])
            .unwrap();
        assert_eq!(kernel.dim(), (3, 3));
        assert_eq!(kernel.center(), 5.0 / 9.0);
    }
}
