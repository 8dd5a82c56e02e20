//! The fixed filter bank and its `apply_all` pipeline.
//!
//! Filters are described by [`FILTER_TABLE`]: each entry names a filter and
//! the kernel(s) it runs. A [`Stage::Linear`] entry is one convolution; a
//! [`Stage::GradientMagnitude`] entry convolves twice and combines the
//! results nonlinearly. Adding a filter means adding a table entry.

use std::fmt;
use std::time::Instant;

use log::debug;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use super::blur::{BOX_BLUR_KERNEL, LOW_PASS_KERNEL};
use super::core::{convolve_with, Kernel};
use super::edge::{gradient_magnitude, GradientFallback, SOBEL_X, SOBEL_Y};
use super::sharpen::{HIGH_PASS_KERNEL, SHARPEN_KERNEL};
use crate::error::{FilterError, Result};

/// Identifies one entry of an `apply_all` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterId {
    Input,
    BoxBlur,
    EdgeDetection,
    Sharpen,
    HighPass,
    LowPass,
}

impl FilterId {
    /// All ids in `apply_all` order.
    pub const ALL: [FilterId; 6] = [
        FilterId::Input,
        FilterId::BoxBlur,
        FilterId::EdgeDetection,
        FilterId::Sharpen,
        FilterId::HighPass,
        FilterId::LowPass,
    ];

    /// Human readable name, e.g. "Box Blur".
    pub fn label(self) -> &'static str {
        match self {
            FilterId::Input => "Input",
            FilterId::BoxBlur => "Box Blur",
            FilterId::EdgeDetection => "Edge Detection",
            FilterId::Sharpen => "Sharpen",
            FilterId::HighPass => "High Pass",
            FilterId::LowPass => "Low Pass",
        }
    }

    /// File name fragment, e.g. "box_blur".
    pub fn slug(self) -> &'static str {
        match self {
            FilterId::Input => "input",
            FilterId::BoxBlur => "box_blur",
            FilterId::EdgeDetection => "edge_detection",
            FilterId::Sharpen => "sharpen",
            FilterId::HighPass => "high_pass",
            FilterId::LowPass => "low_pass",
        }
    }

    /// Parse a slug or label. Case-insensitive; `-` and spaces count as `_`.
    pub fn from_slug(name: &str) -> Option<FilterId> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        FilterId::ALL.into_iter().find(|id| id.slug() == normalized)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed 3x3 weight table.
pub type Kernel3 = [[f64; 3]; 3];

/// How a filter turns its kernel(s) into an output image.
#[derive(Debug, Clone, Copy)]
pub enum Stage {
    /// Single convolution.
    Linear(&'static Kernel3),
    /// Two convolutions combined as `sqrt(x² + y²)`, normalized to [0, 255].
    GradientMagnitude {
        x: &'static Kernel3,
        y: &'static Kernel3,
    },
}

/// One row of the filter table.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub id: FilterId,
    pub stage: Stage,
}

/// Every derived filter, in `apply_all` order (after the input).
pub static FILTER_TABLE: [FilterSpec; 5] = [
    FilterSpec {
        id: FilterId::BoxBlur,
        stage: Stage::Linear(&BOX_BLUR_KERNEL),
    },
    FilterSpec {
        id: FilterId::EdgeDetection,
        stage: Stage::GradientMagnitude {
            x: &SOBEL_X,
            y: &SOBEL_Y,
        },
    },
    FilterSpec {
        id: FilterId::Sharpen,
        stage: Stage::Linear(&SHARPEN_KERNEL),
    },
    FilterSpec {
        id: FilterId::HighPass,
        stage: Stage::Linear(&HIGH_PASS_KERNEL),
    },
    FilterSpec {
        id: FilterId::LowPass,
        stage: Stage::Linear(&LOW_PASS_KERNEL),
    },
];

impl FilterSpec {
    /// Look up the table entry for `id`. `Input` has no entry.
    pub fn find(id: FilterId) -> Option<&'static FilterSpec> {
        FILTER_TABLE.iter().find(|spec| spec.id == id)
    }

    fn run(&self, input: ArrayView2<u8>, config: &BankConfig) -> Result<Array2<u8>> {
        match self.stage {
            Stage::Linear(rows) => convolve_with(input, &Kernel::from_rows(rows)?),
            Stage::GradientMagnitude { x, y } => gradient_magnitude(
                input,
                &Kernel::from_rows(x)?,
                &Kernel::from_rows(y)?,
                config.gradient_fallback,
            ),
        }
    }
}

/// A named output of the filter bank.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub id: FilterId,
    pub image: Array2<u8>,
}

impl FilterResult {
    pub fn label(&self) -> &'static str {
        self.id.label()
    }
}

/// Filter bank settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankConfig {
    /// Run the filters for one image on the rayon pool.
    pub parallel: bool,
    /// Sobel behavior on flat images.
    pub gradient_fallback: GradientFallback,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            gradient_fallback: GradientFallback::Zeros,
        }
    }
}

/// Runs the fixed filter table over grayscale images.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBank {
    config: BankConfig,
}

impl FilterBank {
    pub fn new(config: BankConfig) -> Self {
        Self { config }
    }

    /// Apply a single filter. `FilterId::Input` returns a copy of the input.
    pub fn apply(&self, id: FilterId, input: ArrayView2<u8>) -> Result<Array2<u8>> {
        check_image(input)?;
        match FilterSpec::find(id) {
            Some(spec) => spec.run(input, &self.config),
            None => Ok(input.to_owned()),
        }
    }

    /// Apply every filter to `input`.
    ///
    /// Returns six results ordered Input, Box Blur, Edge Detection, Sharpen,
    /// High Pass, Low Pass. The first is an unmodified copy of `input`.
    pub fn apply_all(&self, input: ArrayView2<u8>) -> Result<Vec<FilterResult>> {
        check_image(input)?;
        let start = Instant::now();

        let run = |spec: &FilterSpec| -> Result<FilterResult> {
            let image = spec.run(input, &self.config)?;
            Ok(FilterResult { id: spec.id, image })
        };

        // Indexed collect keeps table order in the parallel case
        let filtered: Vec<FilterResult> = if self.config.parallel {
            FILTER_TABLE.par_iter().map(run).collect::<Result<_>>()?
        } else {
            FILTER_TABLE.iter().map(run).collect::<Result<_>>()?
        };

        let mut results = Vec::with_capacity(filtered.len() + 1);
        results.push(FilterResult {
            id: FilterId::Input,
            image: input.to_owned(),
        });
        results.extend(filtered);

        debug!(
            "apply_all: {}x{} image, {} results in {:.2?} (parallel={})",
            input.nrows(),
            input.ncols(),
            results.len(),
            start.elapsed(),
            self.config.parallel
        );

        Ok(results)
    }
}

fn check_image(input: ArrayView2<u8>) -> Result<()> {
    let (height, width) = input.dim();
    if height == 0 || width == 0 {
        return Err(FilterError::EmptyImage { height, width });
    }
    Ok(())
}

/// Apply every filter with the default [`BankConfig`].
pub fn apply_all(input: ArrayView2<u8>) -> Result<Vec<FilterResult>> {
    FilterBank::default().apply_all(input)
}
