//! Pixel operations backing the command catalog.
//!
//! Everything delegates to the `image` crate ecosystem; this module owns no
//! codec, resampler, or rasterizer of its own.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode / encode (JPEG, PNG, BMP, GIF, TIFF, WebP) | `image` crate |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Rotate (right angles) | `rotate90` / `rotate180` / `rotate270` |
//! | Rotate (arbitrary) | `imageproc::geometric_transformations::rotate_about_center` |
//! | Blur | `DynamicImage::blur` (gaussian) |
//! | Named filters | 3x3 kernels (scale + offset), applied here |
//! | Text overlay | `imageproc::drawing::draw_text_mut` + `ab_glyph` |
//! | Compositing | `image::imageops::overlay` |
//!
//! The module is split into:
//! - **Codec**: load/save and the [`OutputFormat`] catalog
//! - **Geometry**: resize, rotate, crop, flip
//! - **Adjust**: per-pixel tone and color adjustments, histograms
//! - **Filter**: gaussian blur and the 3x3 kernel filters
//! - **Overlay**: text, watermark, layer compositing, blending

pub mod adjust;
pub mod codec;
pub mod filter;
pub mod geometry;
pub mod overlay;

pub use adjust::Histogram;
pub use codec::{OutputFormat, is_recognized, load, save};
pub use filter::NamedFilter;
pub use geometry::FlipDirection;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {path}: {detail}")]
    Decode { path: PathBuf, detail: String },
    #[error("failed to encode {path}: {detail}")]
    Encode { path: PathBuf, detail: String },
    #[error("cannot infer output format of: {0}")]
    UnknownFormat(PathBuf),
}
