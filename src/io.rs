//! Image file I/O for grayscale buffers.
//!
//! - `load_grayscale`: decode any supported format into an 8-bit gray buffer.
//! - `save_grayscale`: write an 8-bit gray buffer to a PNG.
//! - `output_path` / `save_results`: `<stem>_<slug>.png` naming for bank output.

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageBuffer, Luma};
use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::error::FilterError;
use crate::filters::bank::{FilterId, FilterResult};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image too large: {height}x{width}")]
    TooLarge { height: usize, width: usize },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Load an image from disk and convert it to 8-bit grayscale.
pub fn load_grayscale(path: &Path) -> Result<Array2<u8>, IoError> {
    let img = image::open(path)
        .map_err(|source| IoError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();

    let width = img.width() as usize;
    let height = img.height() as usize;
    debug!("loaded {} ({}x{})", path.display(), height, width);

    let data = img.into_raw();
    Ok(Array2::from_shape_vec((height, width), data).map_err(FilterError::from)?)
}

/// Save an 8-bit grayscale buffer as PNG, creating parent directories.
pub fn save_grayscale(image: ArrayView2<u8>, path: &Path) -> Result<(), IoError> {
    ensure_parent_dir(path)?;

    let (height, width) = image.dim();
    let too_large = || IoError::TooLarge { height, width };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    // Standard layout is row-major, which is what ImageBuffer expects
    let data: Vec<u8> = image.iter().copied().collect();
    let buffer: GrayImage =
        ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, data).ok_or_else(too_large)?;

    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| IoError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// `dir/<stem>_<slug>.png`
pub fn output_path(dir: &Path, stem: &str, id: FilterId) -> PathBuf {
    named_output_path(dir, stem, id.slug())
}

/// `dir/<stem>_<suffix>.png`
pub fn named_output_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{stem}_{suffix}.png"))
}

/// Save every result as `<stem>_<slug>.png` in `dir`.
///
/// Returns the written paths in result order.
pub fn save_results(
    results: &[FilterResult],
    dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>, IoError> {
    results
        .iter()
        .map(|result| {
            let path = output_path(dir, stem, result.id);
            save_grayscale(result.image.view(), &path)?;
            Ok(path)
        })
        .collect()
}

fn ensure_parent_dir(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| IoError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
