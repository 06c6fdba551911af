//! Image loading, saving, and the output format catalog.
//!
//! Format support is whatever the `image` crate decoders compiled into the
//! binary can handle. Output is restricted to the four formats the `--format`
//! flag names; when no format override is given, the output path's extension
//! decides.

use super::ImagingError;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Extensions the batch runner recognizes as image inputs.
///
/// These all have decoders compiled in (see the feature list in Cargo.toml).
pub const RECOGNIZED_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "bmp", "gif", "tif", "tiff", "webp"];

/// True if the path's extension marks it as a decodable image.
pub fn is_recognized(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            RECOGNIZED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Output encoding selected by the `--format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl OutputFormat {
    /// File extension used when rewriting output paths for a format override.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(format!(
                "unknown format '{other}'. Expected JPEG, PNG, BMP, or GIF"
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Gif => "GIF",
        };
        f.write_str(name)
    }
}

/// Rewrite `path` with the format's extension when an override is in effect.
pub fn apply_format(path: &Path, format: Option<OutputFormat>) -> PathBuf {
    match format {
        Some(f) => path.with_extension(f.extension()),
        None => path.to_path_buf(),
    }
}

/// Load and decode an image from disk.
pub fn load(path: &Path) -> Result<DynamicImage, ImagingError> {
    image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => ImagingError::Io(io),
        other => ImagingError::Decode {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    })
}

/// Encode and save an image, inferring the format from the path extension
/// unless an explicit [`OutputFormat`] is given.
///
/// JPEG cannot carry alpha, and the GIF encoder wants RGBA frames; pixel
/// formats are normalized here so callers never need to care.
pub fn save(
    img: &DynamicImage,
    path: &Path,
    format: Option<OutputFormat>,
) -> Result<(), ImagingError> {
    let target = match format {
        Some(f) => f.image_format(),
        None => ImageFormat::from_path(path)
            .map_err(|_| ImagingError::UnknownFormat(path.to_path_buf()))?,
    };

    let converted;
    let to_write = match target {
        ImageFormat::Jpeg if img.color().has_alpha() => {
            converted = DynamicImage::ImageRgb8(img.to_rgb8());
            &converted
        }
        ImageFormat::Gif => {
            converted = DynamicImage::ImageRgba8(img.to_rgba8());
            &converted
        }
        _ => img,
    };

    to_write.save_with_format(path, target).map_err(|e| match e {
        ImageError::IoError(io) => ImagingError::Io(io),
        other => ImagingError::Encode {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    })
}
