//! Text, watermark, and layer compositing.

use ab_glyph::{FontVec, PxScale};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};

/// System font locations tried when `--text_font` is not given.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-fonts/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font from the explicit path, or fall back to well-known system
/// locations. `None` means no usable font was found anywhere.
pub fn load_font(explicit: Option<&Path>) -> Option<FontVec> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };
    for candidate in candidates {
        if let Ok(bytes) = std::fs::read(&candidate)
            && let Ok(font) = FontVec::try_from_vec(bytes)
        {
            return Some(font);
        }
    }
    None
}

/// Parse a color argument: a small set of named colors or `#RRGGBB` hex.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let named = match value.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0]),
        "white" => Some([255, 255, 255]),
        "red" => Some([255, 0, 0]),
        "green" => Some([0, 128, 0]),
        "blue" => Some([0, 0, 255]),
        "yellow" => Some([255, 255, 0]),
        "cyan" => Some([0, 255, 255]),
        "magenta" => Some([255, 0, 255]),
        "gray" | "grey" => Some([128, 128, 128]),
        _ => None,
    };
    if let Some([r, g, b]) = named {
        return Some(Rgba([r, g, b, 255]));
    }

    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}

/// Draw a line of text at the given position.
pub fn draw_text(
    img: &DynamicImage,
    text: &str,
    x: i32,
    y: i32,
    size: f32,
    color: Rgba<u8>,
    font: &FontVec,
) -> DynamicImage {
    let mut rgba = img.to_rgba8();
    draw_text_mut(&mut rgba, color, x, y, PxScale::from(size), font, text);
    DynamicImage::ImageRgba8(rgba)
}

/// Alpha-composite a watermark image at the given position.
///
/// Coordinates may be negative or off-canvas; `image::imageops::overlay`
/// clips as needed.
pub fn watermark(img: &DynamicImage, mark: &DynamicImage, x: i64, y: i64) -> DynamicImage {
    let mut base = img.to_rgba8();
    image::imageops::overlay(&mut base, &mark.to_rgba8(), x, y);
    DynamicImage::ImageRgba8(base)
}

/// Composite a layer at the origin with its alpha scaled by `opacity`.
pub fn composite(img: &DynamicImage, layer: &DynamicImage, opacity: f32) -> DynamicImage {
    let mut faded = layer.to_rgba8();
    for pixel in faded.pixels_mut() {
        pixel.0[3] = (pixel.0[3] as f32 * opacity).round().clamp(0.0, 255.0) as u8;
    }
    let mut base = img.to_rgba8();
    image::imageops::overlay(&mut base, &faded, 0, 0);
    DynamicImage::ImageRgba8(base)
}

/// Whole-frame interpolation between two images: `out = a*(1-alpha) + b*alpha`.
///
/// The second image is resized to match the first, so any pair of images can
/// be blended.
pub fn blend(img: &DynamicImage, other: &DynamicImage, alpha: f32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let resized = if other.dimensions() == (width, height) {
        other.to_rgba8()
    } else {
        other
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgba8()
    };

    let mut base = img.to_rgba8();
    for (bottom, top) in base.pixels_mut().zip(resized.pixels()) {
        for channel in 0..4 {
            let a = bottom.0[channel] as f32;
            let b = top.0[channel] as f32;
            bottom.0[channel] = (a + (b - a) * alpha).round().clamp(0.0, 255.0) as u8;
        }
    }
    DynamicImage::ImageRgba8(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(r: u8, g: u8, b: u8, a: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([r, g, b, a])))
    }

    #[test]
    fn parse_named_colors() {
        assert_eq!(parse_color("white"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_color("RED"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("grey"), Some(Rgba([128, 128, 128, 255])));
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(parse_color("#336699"), Some(Rgba([0x33, 0x66, 0x99, 255])));
        assert_eq!(parse_color("#GGGGGG"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("periwinkle"), None);
    }

    #[test]
    fn blend_endpoints() {
        let a = solid(100, 0, 0, 255);
        let b = solid(0, 200, 0, 255);

        let zero = blend(&a, &b, 0.0);
        assert_eq!(zero.to_rgba8().get_pixel(0, 0).0, [100, 0, 0, 255]);

        let one = blend(&a, &b, 1.0);
        assert_eq!(one.to_rgba8().get_pixel(0, 0).0, [0, 200, 0, 255]);
    }

    #[test]
    fn blend_midpoint_averages() {
        let a = solid(100, 0, 0, 255);
        let b = solid(0, 200, 0, 255);
        let half = blend(&a, &b, 0.5);
        assert_eq!(half.to_rgba8().get_pixel(0, 0).0, [50, 100, 0, 255]);
    }

    #[test]
    fn blend_resizes_mismatched_layer() {
        let a = solid(100, 0, 0, 255);
        let b = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 7, Rgba([0, 200, 0, 255])));
        let out = blend(&a, &b, 1.0);
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.to_rgba8().get_pixel(5, 5).0, [0, 200, 0, 255]);
    }

    #[test]
    fn watermark_respects_position_and_alpha() {
        let base = solid(10, 10, 10, 255);
        let mark = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        let out = watermark(&base, &mark, 4, 4);
        let rgba = out.to_rgba8();
        assert_eq!(rgba.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(0, 0).0, [10, 10, 10, 255]);
    }

    #[test]
    fn composite_zero_opacity_is_identity() {
        let base = solid(10, 20, 30, 255);
        let layer = solid(200, 200, 200, 255);
        let out = composite(&base, &layer, 0.0);
        assert_eq!(out.to_rgba8().get_pixel(5, 5).0, [10, 20, 30, 255]);
    }

    #[test]
    fn composite_full_opacity_replaces() {
        let base = solid(10, 20, 30, 255);
        let layer = solid(200, 200, 200, 255);
        let out = composite(&base, &layer, 1.0);
        assert_eq!(out.to_rgba8().get_pixel(5, 5).0, [200, 200, 200, 255]);
    }

    #[test]
    fn load_font_with_bogus_path_is_none() {
        assert!(load_font(Some(Path::new("/nonexistent/font.ttf"))).is_none());
    }
}
