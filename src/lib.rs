//! grayconv
//!
//! Grayscale image filtering built on one zero-padded 2D convolution
//! engine, with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are single-channel `u8` arrays of shape (height, width), values
//! 0-255. Kernels are `f64` arrays with odd height and odd width.
//!
//! ## Filter Architecture
//! Every filter produces an output with the same dimensions as its input.
//! [`apply_all`] runs the fixed filter bank and returns six named results:
//! Input, Box Blur, Edge Detection, Sharpen, High Pass, Low Pass.
//!
//! ```
//! use grayconv::{apply_all, FilterId};
//! use ndarray::Array2;
//!
//! let image = Array2::from_shape_fn((4, 4), |(y, x)| (x * 60 + y) as u8);
//! let results = apply_all(image.view()).unwrap();
//! assert_eq!(results[2].id, FilterId::EdgeDetection);
//! ```

pub mod cli;
pub mod error;
pub mod filters;
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::error::FilterError;
pub use crate::filters::bank::{apply_all, BankConfig, FilterBank, FilterId, FilterResult};
pub use crate::filters::core::{convolve, convolve_with, Kernel};
pub use crate::filters::edge::GradientFallback;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::bank::{BankConfig, FilterBank};
    use crate::filters::core::convolve as convolve_u8;
    use crate::filters::edge::GradientFallback;

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    /// Convolve a uint8 (H, W) image with a float64 (KH, KW) kernel.
    ///
    /// Zero-padded, same-size output. Raises ValueError for even kernel
    /// dimensions or an empty image.
    #[pyfunction]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        kernel: PyReadonlyArray2<'py, f64>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let result = convolve_u8(image.as_array(), kernel.as_array())?;
        Ok(result.into_pyarray(py))
    }

    /// Run the filter bank and return a list of (label, image) pairs.
    ///
    /// # Arguments
    /// * `image` - uint8 (H, W) grayscale image
    /// * `strict_gradient` - raise instead of returning zeros when the
    ///   edge detector sees a perfectly flat image
    #[pyfunction]
    #[pyo3(signature = (image, strict_gradient=false))]
    pub fn apply_all<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        strict_gradient: bool,
    ) -> PyResult<Vec<(&'static str, Bound<'py, PyArray2<u8>>)>> {
        let bank = FilterBank::new(BankConfig {
            gradient_fallback: if strict_gradient {
                GradientFallback::Error
            } else {
                GradientFallback::Zeros
            },
            ..Default::default()
        });
        let results = bank.apply_all(image.as_array())?;
        Ok(results
            .into_iter()
            .map(|r| (r.id.label(), r.image.into_pyarray(py)))
            .collect())
    }

    /// grayconv Rust extension module
    #[pymodule]
    pub fn grayconv(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(apply_all, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::grayconv;
