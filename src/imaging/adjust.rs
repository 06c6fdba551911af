//! Per-pixel tone and color adjustments.
//!
//! The enhancement operations (brightness, contrast, saturation) are
//! interpolations between the image and a degenerate version of itself —
//! black, uniform mean gray, and grayscale respectively. Factor 1.0 is always
//! the identity, 0.0 is the fully degenerate image, and values above 1.0
//! push past the original.

use image::DynamicImage;

/// ITU-R 601 luma weights, matching the usual L-channel conversion.
const LUMA: (f32, f32, f32) = (0.299, 0.587, 0.114);

fn luma_of(r: f32, g: f32, b: f32) -> f32 {
    LUMA.0 * r + LUMA.1 * g + LUMA.2 * b
}

/// Apply a per-pixel RGB transform, preserving alpha.
fn map_rgb<F>(img: &DynamicImage, transform: F) -> DynamicImage
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32),
{
    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (nr, ng, nb) = transform(r as f32, g as f32, b as f32);
        pixel.0 = [
            nr.round().clamp(0.0, 255.0) as u8,
            ng.round().clamp(0.0, 255.0) as u8,
            nb.round().clamp(0.0, 255.0) as u8,
            a,
        ];
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Scale every channel by `factor` (0.0 = black, 1.0 = unchanged).
pub fn brightness(img: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(img, |r, g, b| (r * factor, g * factor, b * factor))
}

/// Interpolate between a uniform mean-gray image and the original.
pub fn contrast(img: &DynamicImage, factor: f32) -> DynamicImage {
    let luma = img.to_luma8();
    let total: u64 = luma.pixels().map(|p| p.0[0] as u64).sum();
    let count = (luma.width() as u64 * luma.height() as u64).max(1);
    let mean = (total as f32 / count as f32).round();

    map_rgb(img, |r, g, b| {
        (
            mean + (r - mean) * factor,
            mean + (g - mean) * factor,
            mean + (b - mean) * factor,
        )
    })
}

/// Interpolate between the grayscale image and the original
/// (0.0 = grayscale, 1.0 = unchanged, above 1.0 = oversaturated).
pub fn saturation(img: &DynamicImage, factor: f32) -> DynamicImage {
    map_rgb(img, |r, g, b| {
        let gray = luma_of(r, g, b);
        (
            gray + (r - gray) * factor,
            gray + (g - gray) * factor,
            gray + (b - gray) * factor,
        )
    })
}

/// Convert to a single-channel grayscale image.
pub fn grayscale(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img.to_luma8())
}

/// Invert color channels (alpha is preserved).
pub fn invert(img: &DynamicImage) -> DynamicImage {
    let mut out = img.clone();
    out.invert();
    out
}

/// Histogram-equalize each color channel independently.
pub fn equalize(img: &DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let mut histograms = [[0u32; 256]; 3];
    for pixel in rgba.pixels() {
        for channel in 0..3 {
            histograms[channel][pixel.0[channel] as usize] += 1;
        }
    }

    let total = rgba.width() as u64 * rgba.height() as u64;
    let luts: Vec<[u8; 256]> = histograms
        .iter()
        .map(|h| equalization_lut(h, total))
        .collect();

    map_rgb(img, |r, g, b| {
        (
            luts[0][r as usize] as f32,
            luts[1][g as usize] as f32,
            luts[2][b as usize] as f32,
        )
    })
}

/// Build the cumulative-distribution LUT for one channel.
///
/// A constant channel has no range to spread, so it maps to identity.
fn equalization_lut(histogram: &[u32; 256], total: u64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    let cdf_min = histogram.iter().copied().find(|&c| c > 0).unwrap_or(0) as u64;
    let range = total.saturating_sub(cdf_min);
    if range == 0 {
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return lut;
    }

    let mut cumulative = 0u64;
    for (i, &count) in histogram.iter().enumerate() {
        cumulative += count as u64;
        let scaled = (cumulative.saturating_sub(cdf_min)) as f64 / range as f64 * 255.0;
        lut[i] = scaled.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply a 3x4 affine color transform.
///
/// The matrix is row-major: `r' = m0*r + m1*g + m2*b + m3`, and likewise for
/// green and blue with the next two rows. Offsets are in the 0–255 domain.
pub fn color_transform(img: &DynamicImage, matrix: &[f32; 12]) -> DynamicImage {
    map_rgb(img, |r, g, b| {
        (
            matrix[0] * r + matrix[1] * g + matrix[2] * b + matrix[3],
            matrix[4] * r + matrix[5] * g + matrix[6] * b + matrix[7],
            matrix[8] * r + matrix[9] * g + matrix[10] * b + matrix[11],
        )
    })
}

/// Per-channel pixel value counts (256 bins each), plus luminance.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub r: [u32; 256],
    pub g: [u32; 256],
    pub b: [u32; 256],
    pub luma: [u32; 256],
}

/// Count pixel values per channel.
pub fn histogram(img: &DynamicImage) -> Histogram {
    let mut hist = Histogram {
        r: [0; 256],
        g: [0; 256],
        b: [0; 256],
        luma: [0; 256],
    };
    for pixel in img.to_rgba8().pixels() {
        let [r, g, b, _] = pixel.0;
        hist.r[r as usize] += 1;
        hist.g[g as usize] += 1;
        hist.b[b as usize] += 1;
        let l = luma_of(r as f32, g as f32, b as f32).round().clamp(0.0, 255.0);
        hist.luma[l as usize] += 1;
    }
    hist
}
