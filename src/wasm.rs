//! WebAssembly exports for the grayscale filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//! Images cross the boundary as flat row-major `u8` buffers
//! (length = width * height); kernels as flat row-major `f64` buffers.
//! Errors are thrown as JavaScript exceptions carrying the message.

use ndarray::{Array2, ArrayView2};
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::bank::{FilterBank, FilterId};
use crate::filters::core::convolve;

fn to_js(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn image_view(data: &[u8], width: usize, height: usize) -> Result<ArrayView2<'_, u8>, JsValue> {
    ArrayView2::from_shape((height, width), data).map_err(|e| to_js(e.into()))
}

// ============================================================================
// Convolution
// ============================================================================

/// Convolve a grayscale image with an arbitrary odd-sized kernel.
///
/// # Arguments
/// * `data` - Flat array of gray bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `kernel` - Flat array of weights (length = kernel_width * kernel_height)
/// * `kernel_width` - Kernel width, odd
/// * `kernel_height` - Kernel height, odd
///
/// # Returns
/// Flat array of gray bytes with the same dimensions
#[wasm_bindgen]
pub fn convolve_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &[f64],
    kernel_width: usize,
    kernel_height: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = image_view(data, width, height)?;
    let weights = ArrayView2::from_shape((kernel_height, kernel_width), kernel)
        .map_err(|e| to_js(e.into()))?;

    let result = convolve(input, weights).map_err(to_js)?;
    Ok(into_flat(result))
}

// ============================================================================
// Filter Bank
// ============================================================================

/// Apply one named filter from the bank.
///
/// # Arguments
/// * `data` - Flat array of gray bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `filter` - Slug or label, e.g. "box_blur" or "Edge Detection"
///
/// # Returns
/// Flat array of gray bytes with the same dimensions
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    filter: &str,
) -> Result<Vec<u8>, JsValue> {
    let id = FilterId::from_slug(filter)
        .ok_or_else(|| JsValue::from_str(&format!("unknown filter: {filter}")))?;
    let input = image_view(data, width, height)?;

    let result = FilterBank::default().apply(id, input).map_err(to_js)?;
    Ok(into_flat(result))
}

fn into_flat(image: Array2<u8>) -> Vec<u8> {
    image.into_raw_vec_and_offset().0
}
