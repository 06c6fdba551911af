//! Gaussian blur and the 3x3 kernel filters.
//!
//! The named filters are classic photo-editor convolution kernels, each a
//! `(kernel, scale, offset)` triple: the weighted sum is divided by `scale`
//! and shifted by `offset` before clamping. Edge pixels are handled by
//! replicating the border.

use image::DynamicImage;
use std::str::FromStr;

/// A 3x3 convolution described by kernel weights, a divisor, and an offset.
#[derive(Debug, Clone, Copy)]
pub struct Kernel3x3 {
    pub kernel: [f32; 9],
    pub scale: f32,
    pub offset: f32,
}

pub const SHARPEN: Kernel3x3 = Kernel3x3 {
    kernel: [-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
    scale: 16.0,
    offset: 0.0,
};

pub const EDGE_ENHANCE: Kernel3x3 = Kernel3x3 {
    kernel: [-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
    scale: 2.0,
    offset: 0.0,
};

pub const EDGE_ENHANCE_MORE: Kernel3x3 = Kernel3x3 {
    kernel: [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

pub const FIND_EDGES: Kernel3x3 = Kernel3x3 {
    kernel: [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

/// Same edge kernel as [`FIND_EDGES`] but offset into white, producing the
/// pencil-sketch look.
pub const CONTOUR: Kernel3x3 = Kernel3x3 {
    kernel: [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 255.0,
};

pub const DETAIL: Kernel3x3 = Kernel3x3 {
    kernel: [0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0],
    scale: 6.0,
    offset: 0.0,
};

pub const EMBOSS: Kernel3x3 = Kernel3x3 {
    kernel: [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    scale: 1.0,
    offset: 128.0,
};

/// Gaussian blur with the given radius (sigma).
pub fn blur(img: &DynamicImage, radius: f32) -> DynamicImage {
    img.blur(radius)
}

/// Sharpen with the standard 3x3 sharpening kernel.
pub fn sharpen(img: &DynamicImage) -> DynamicImage {
    apply_kernel(img, &SHARPEN)
}

/// Enhance edges with the mild edge-enhancement kernel.
pub fn edge_enhance(img: &DynamicImage) -> DynamicImage {
    apply_kernel(img, &EDGE_ENHANCE)
}

/// Effect filters selectable via `--filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedFilter {
    Emboss,
    Contour,
    FindEdges,
    Detail,
    EdgeEnhanceMore,
}

impl NamedFilter {
    pub fn name(self) -> &'static str {
        match self {
            NamedFilter::Emboss => "emboss",
            NamedFilter::Contour => "contour",
            NamedFilter::FindEdges => "find_edges",
            NamedFilter::Detail => "detail",
            NamedFilter::EdgeEnhanceMore => "edge_enhance_more",
        }
    }

    fn kernel(self) -> &'static Kernel3x3 {
        match self {
            NamedFilter::Emboss => &EMBOSS,
            NamedFilter::Contour => &CONTOUR,
            NamedFilter::FindEdges => &FIND_EDGES,
            NamedFilter::Detail => &DETAIL,
            NamedFilter::EdgeEnhanceMore => &EDGE_ENHANCE_MORE,
        }
    }
}

impl FromStr for NamedFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "emboss" => Ok(NamedFilter::Emboss),
            "contour" => Ok(NamedFilter::Contour),
            "find_edges" => Ok(NamedFilter::FindEdges),
            "detail" => Ok(NamedFilter::Detail),
            "edge_enhance_more" => Ok(NamedFilter::EdgeEnhanceMore),
            other => Err(format!(
                "unknown filter '{other}'. Expected emboss, contour, find_edges, \
                 detail, or edge_enhance_more"
            )),
        }
    }
}

impl std::fmt::Display for NamedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply one of the named effect filters.
pub fn named(img: &DynamicImage, filter: NamedFilter) -> DynamicImage {
    apply_kernel(img, filter.kernel())
}

/// Convolve color channels with a 3x3 kernel, replicating border pixels.
/// Alpha passes through untouched.
pub fn apply_kernel(img: &DynamicImage, k: &Kernel3x3) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = rgba.clone();

    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for ky in 0..3i64 {
                for kx in 0..3i64 {
                    let sx = (x as i64 + kx - 1).clamp(0, width as i64 - 1) as u32;
                    let sy = (y as i64 + ky - 1).clamp(0, height as i64 - 1) as u32;
                    let weight = k.kernel[(ky * 3 + kx) as usize];
                    let sample = rgba.get_pixel(sx, sy);
                    for channel in 0..3 {
                        acc[channel] += weight * sample.0[channel] as f32;
                    }
                }
            }
            let pixel = out.get_pixel_mut(x, y);
            for channel in 0..3 {
                pixel.0[channel] =
                    (acc[channel] / k.scale + k.offset).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    DynamicImage::ImageRgba8(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(value: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            9,
            9,
            image::Rgba([value, value, value, 255]),
        ))
    }

    fn center_pixel(img: &DynamicImage) -> [u8; 4] {
        img.to_rgba8().get_pixel(4, 4).0
    }

    #[test]
    fn filter_names_parse() {
        assert_eq!("emboss".parse::<NamedFilter>().unwrap(), NamedFilter::Emboss);
        assert_eq!(
            "EDGE_ENHANCE_MORE".parse::<NamedFilter>().unwrap(),
            NamedFilter::EdgeEnhanceMore
        );
        assert!("solarize".parse::<NamedFilter>().is_err());
    }

    #[test]
    fn sharpen_preserves_flat_regions() {
        // Kernel weights sum to the scale, so uniform areas are fixed points.
        let out = sharpen(&solid(120));
        assert_eq!(center_pixel(&out), [120, 120, 120, 255]);
    }

    #[test]
    fn find_edges_maps_flat_to_black() {
        let out = named(&solid(120), NamedFilter::FindEdges);
        assert_eq!(center_pixel(&out), [0, 0, 0, 255]);
    }

    #[test]
    fn contour_maps_flat_to_white() {
        let out = named(&solid(120), NamedFilter::Contour);
        assert_eq!(center_pixel(&out), [255, 255, 255, 255]);
    }

    #[test]
    fn emboss_maps_flat_to_mid_gray() {
        let out = named(&solid(120), NamedFilter::Emboss);
        assert_eq!(center_pixel(&out), [128, 128, 128, 255]);
    }

    #[test]
    fn find_edges_highlights_a_boundary() {
        let mut src = RgbaImage::from_pixel(9, 9, image::Rgba([0, 0, 0, 255]));
        for y in 0..9 {
            for x in 5..9 {
                src.put_pixel(x, y, image::Rgba([255, 255, 255, 255]));
            }
        }
        let out = named(&DynamicImage::ImageRgba8(src), NamedFilter::FindEdges);
        let rgba = out.to_rgba8();
        // Far from the boundary stays black; on the boundary lights up.
        assert_eq!(rgba.get_pixel(1, 4).0[0], 0);
        assert!(rgba.get_pixel(5, 4).0[0] > 0);
    }

    #[test]
    fn kernel_preserves_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            5,
            5,
            image::Rgba([10, 20, 30, 77]),
        ));
        let out = apply_kernel(&img, &SHARPEN);
        assert_eq!(out.to_rgba8().get_pixel(2, 2).0[3], 77);
    }

    #[test]
    fn blur_spreads_a_point() {
        let mut src = RgbaImage::from_pixel(9, 9, image::Rgba([0, 0, 0, 255]));
        src.put_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
        let out = blur(&DynamicImage::ImageRgba8(src), 2.0);
        let rgba = out.to_rgba8();
        assert!(rgba.get_pixel(4, 4).0[0] < 255);
        assert!(rgba.get_pixel(3, 4).0[0] > 0);
    }
}
