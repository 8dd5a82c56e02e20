//! Grayscale convolution filters.
//!
//! ## Image Format
//!
//! | Format | Type | Shape | Range |
//! |--------|------|-------|-------|
//! | Grayscale8 | `Array2<u8>` | (H, W) | 0-255 |
//! | Kernel | `Array2<f64>` | (KH, KW), both odd | any |
//!
//! ## Architecture
//!
//! - **One engine** - every filter is a call (or two) into [`core::convolve`]
//! - **Zero padding** - out-of-bounds samples read as 0
//! - **Clamp then truncate** - sums are clamped to [0, 255] before the `u8` cast
//! - **Pure** - inputs are borrowed read-only, outputs are freshly allocated
//! - **Thread-safe** - rayon parallelizes rows and, in [`bank`], whole filters
//!
//! ## Filters
//!
//! - **Smoothing** ([`blur`]): box blur, low pass
//! - **Sharpening** ([`sharpen`]): sharpen, high pass
//! - **Edge detection** ([`edge`]): Sobel gradient magnitude

pub mod core;
pub mod blur;
pub mod sharpen;
pub mod edge;
pub mod bank;
