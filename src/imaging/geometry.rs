//! Geometric transforms: resize, rotate, crop, flip.

use image::DynamicImage;
use image::imageops::FilterType;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use std::str::FromStr;

/// Resize to exact dimensions (aspect ratio is not preserved).
pub fn resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Rotate counter-clockwise by `degrees`.
///
/// Multiples of 90 are exact quarter-turns that swap dimensions and lose no
/// pixel data. Any other angle keeps the original canvas, resamples
/// bilinearly, and fills the exposed corners with black — such rotations are
/// not exact round-trips.
pub fn rotate(img: &DynamicImage, degrees: f32) -> DynamicImage {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        return img.clone();
    }
    // DynamicImage's quarter-turns are clockwise; ours are CCW.
    if normalized == 90.0 {
        return img.rotate270();
    }
    if normalized == 180.0 {
        return img.rotate180();
    }
    if normalized == 270.0 {
        return img.rotate90();
    }

    let rgba = img.to_rgba8();
    let rotated = rotate_about_center(
        &rgba,
        -degrees.to_radians(),
        Interpolation::Bilinear,
        image::Rgba([0, 0, 0, 255]),
    );
    DynamicImage::ImageRgba8(rotated)
}

/// Crop to the box `(left, top)`–`(right, bottom)`, exclusive on the far edge.
///
/// Callers validate ordering and bounds; see `Command::apply`.
pub fn crop(img: &DynamicImage, left: u32, top: u32, right: u32, bottom: u32) -> DynamicImage {
    img.crop_imm(left, top, right - left, bottom - top)
}

/// Mirror axis for the flip command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    Horizontal,
    Vertical,
}

impl FromStr for FlipDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(FlipDirection::Horizontal),
            "vertical" => Ok(FlipDirection::Vertical),
            other => Err(format!(
                "unknown flip direction '{other}'. Expected horizontal or vertical"
            )),
        }
    }
}

impl std::fmt::Display for FlipDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlipDirection::Horizontal => f.write_str("horizontal"),
            FlipDirection::Vertical => f.write_str("vertical"),
        }
    }
}

/// Mirror the image along the given axis.
pub fn flip(img: &DynamicImage, direction: FlipDirection) -> DynamicImage {
    match direction {
        FlipDirection::Horizontal => img.fliph(),
        FlipDirection::Vertical => img.flipv(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        }))
    }

    #[test]
    fn resize_forces_exact_dimensions() {
        let out = resize(&gradient(100, 50), 30, 40);
        assert_eq!(out.dimensions(), (30, 40));
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let out = rotate(&gradient(100, 60), 90.0);
        assert_eq!(out.dimensions(), (60, 100));
    }

    #[test]
    fn rotate_90_then_back_is_identity() {
        let img = gradient(100, 100);
        let back = rotate(&rotate(&img, 90.0), -90.0);
        assert_eq!(back.to_rgba8().as_raw(), img.to_rgba8().as_raw());
    }

    #[test]
    fn rotate_ccw_quarter_turn_moves_top_left_to_bottom_left() {
        let mut src = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let out = rotate(&DynamicImage::ImageRgba8(src), 90.0);
        assert_eq!(out.to_rgba8().get_pixel(0, 3), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn arbitrary_rotation_keeps_canvas_size() {
        let out = rotate(&gradient(100, 60), 45.0);
        assert_eq!(out.dimensions(), (100, 60));
    }

    #[test]
    fn crop_yields_box_dimensions() {
        let out = crop(&gradient(100, 100), 10, 10, 50, 50);
        assert_eq!(out.dimensions(), (40, 40));
    }

    #[test]
    fn crop_keeps_expected_origin_pixel() {
        let img = gradient(100, 100);
        let out = crop(&img, 10, 20, 50, 60);
        assert_eq!(
            out.to_rgba8().get_pixel(0, 0),
            img.to_rgba8().get_pixel(10, 20)
        );
    }

    #[test]
    fn double_flip_is_identity() {
        let img = gradient(33, 17);
        let twice = flip(&flip(&img, FlipDirection::Horizontal), FlipDirection::Horizontal);
        assert_eq!(twice.to_rgba8().as_raw(), img.to_rgba8().as_raw());
    }

    #[test]
    fn flip_direction_parses_both_axes() {
        assert_eq!(
            "horizontal".parse::<FlipDirection>().unwrap(),
            FlipDirection::Horizontal
        );
        assert_eq!(
            "VERTICAL".parse::<FlipDirection>().unwrap(),
            FlipDirection::Vertical
        );
        assert!("diagonal".parse::<FlipDirection>().is_err());
    }
}
