//! The editing command catalog.
//!
//! Every edit the tool can perform is a [`Command`] value: a named, fully
//! parameterized operation that turns one image into another without touching
//! the original. The CLI builds commands from typed flags, the interactive
//! shell parses them from `name arg...` lines via [`catalog`], and both funnel
//! into [`Command::apply`].

use crate::imaging::{
    self, FlipDirection, ImagingError, NamedFilter, adjust, filter, geometry, overlay,
};
use image::{DynamicImage, GenericImageView, Rgba};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parameters for the text command, bundled to keep [`Command`] readable.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub size: f32,
    pub color: Rgba<u8>,
    pub font: Option<PathBuf>,
}

/// A single fully parameterized edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize { width: u32, height: u32 },
    Rotate { degrees: f32 },
    Crop { left: u32, top: u32, right: u32, bottom: u32 },
    Flip(FlipDirection),
    Grayscale,
    Brightness(f32),
    Contrast(f32),
    Color(f32),
    Saturation(f32),
    Blur(f32),
    Sharpen,
    EdgeEnhance,
    Filter(NamedFilter),
    Invert,
    Equalize,
    ColorTransform([f32; 12]),
    Blend { path: PathBuf, alpha: f32 },
    Overlay { path: PathBuf, opacity: f32 },
    Watermark { path: PathBuf, x: i64, y: i64 },
    Text(TextParams),
}

#[derive(Error, Debug)]
pub enum CommandError {
    /// An auxiliary input (watermark, overlay, blend source) does not exist.
    /// Callers treat this as a skipped step, not a fatal failure.
    #[error("asset not found: {0}")]
    MissingAsset(PathBuf),
    /// No usable font, either at the given path or any known system location.
    #[error("no usable font found{}", .0.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    MissingFont(Option<PathBuf>),
    #[error("crop box {left} {top} {right} {bottom} exceeds image bounds {width}x{height}")]
    CropOutOfBounds { left: u32, top: u32, right: u32, bottom: u32, width: u32, height: u32 },
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

impl CommandError {
    /// True for errors that mean "this step could not run"; the pipeline
    /// reports these and carries the image through unchanged.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CommandError::MissingAsset(_) | CommandError::MissingFont(_)
        )
    }
}

fn load_asset(path: &Path) -> Result<DynamicImage, CommandError> {
    if !path.exists() {
        return Err(CommandError::MissingAsset(path.to_path_buf()));
    }
    Ok(imaging::load(path)?)
}

impl Command {
    /// Catalog name, as used by shell input and status reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Resize { .. } => "resize",
            Command::Rotate { .. } => "rotate",
            Command::Crop { .. } => "crop",
            Command::Flip(_) => "flip",
            Command::Grayscale => "grayscale",
            Command::Brightness(_) => "brightness",
            Command::Contrast(_) => "contrast",
            Command::Color(_) => "color",
            Command::Saturation(_) => "saturation",
            Command::Blur(_) => "blur",
            Command::Sharpen => "sharpen",
            Command::EdgeEnhance => "edge_enhance",
            Command::Filter(_) => "filter",
            Command::Invert => "invert",
            Command::Equalize => "equalize",
            Command::ColorTransform(_) => "color_transform",
            Command::Blend { .. } => "blend",
            Command::Overlay { .. } => "overlay",
            Command::Watermark { .. } => "watermark",
            Command::Text(_) => "text",
        }
    }

    /// Run the edit, producing a new image.
    pub fn apply(&self, img: &DynamicImage) -> Result<DynamicImage, CommandError> {
        match self {
            Command::Resize { width, height } => Ok(geometry::resize(img, *width, *height)),
            Command::Rotate { degrees } => Ok(geometry::rotate(img, *degrees)),
            Command::Crop { left, top, right, bottom } => {
                let (width, height) = img.dimensions();
                if *right > width || *bottom > height {
                    return Err(CommandError::CropOutOfBounds {
                        left: *left,
                        top: *top,
                        right: *right,
                        bottom: *bottom,
                        width,
                        height,
                    });
                }
                Ok(geometry::crop(img, *left, *top, *right, *bottom))
            }
            Command::Flip(direction) => Ok(geometry::flip(img, *direction)),
            Command::Grayscale => Ok(adjust::grayscale(img)),
            Command::Brightness(factor) => Ok(adjust::brightness(img, *factor)),
            Command::Contrast(factor) => Ok(adjust::contrast(img, *factor)),
            Command::Color(factor) | Command::Saturation(factor) => {
                Ok(adjust::saturation(img, *factor))
            }
            Command::Blur(radius) => Ok(filter::blur(img, *radius)),
            Command::Sharpen => Ok(filter::sharpen(img)),
            Command::EdgeEnhance => Ok(filter::edge_enhance(img)),
            Command::Filter(named) => Ok(filter::named(img, *named)),
            Command::Invert => Ok(adjust::invert(img)),
            Command::Equalize => Ok(adjust::equalize(img)),
            Command::ColorTransform(matrix) => Ok(adjust::color_transform(img, matrix)),
            Command::Blend { path, alpha } => {
                let other = load_asset(path)?;
                Ok(overlay::blend(img, &other, *alpha))
            }
            Command::Overlay { path, opacity } => {
                let layer = load_asset(path)?;
                Ok(overlay::composite(img, &layer, *opacity))
            }
            Command::Watermark { path, x, y } => {
                let mark = load_asset(path)?;
                Ok(overlay::watermark(img, &mark, *x, *y))
            }
            Command::Text(params) => {
                let font = overlay::load_font(params.font.as_deref())
                    .ok_or_else(|| CommandError::MissingFont(params.font.clone()))?;
                Ok(overlay::draw_text(
                    img,
                    &params.text,
                    params.x,
                    params.y,
                    params.size,
                    params.color,
                    &font,
                ))
            }
        }
    }
}

/// Shell-line parsing failure. The command name is known; the arguments
/// did not fit its signature.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("{name}: expected {usage}")]
    WrongArity { name: &'static str, usage: &'static str },
    #[error("{name}: {detail}")]
    InvalidValue { name: &'static str, detail: String },
}

/// One catalog entry: the command's name, an argument summary for `help`,
/// and a parser turning shell arguments into a [`Command`].
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub parse: fn(&[&str]) -> Result<Command, ParseError>,
}

fn arity(name: &'static str, usage: &'static str, args: &[&str], n: usize) -> Result<(), ParseError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(ParseError::WrongArity { name, usage })
    }
}

fn value<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        name,
        detail: format!("invalid value '{raw}'"),
    })
}

fn unit_interval(name: &'static str, raw: &str) -> Result<f32, ParseError> {
    let v: f32 = value(name, raw)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ParseError::InvalidValue {
            name,
            detail: format!("'{raw}' is not within [0, 1]"),
        });
    }
    Ok(v)
}

fn positive_dimension(name: &'static str, raw: &str) -> Result<u32, ParseError> {
    let v: u32 = value(name, raw)?;
    if v == 0 {
        return Err(ParseError::InvalidValue {
            name,
            detail: "dimensions must be positive".into(),
        });
    }
    Ok(v)
}

fn parse_resize(args: &[&str]) -> Result<Command, ParseError> {
    arity("resize", "resize WIDTH HEIGHT", args, 2)?;
    Ok(Command::Resize {
        width: positive_dimension("resize", args[0])?,
        height: positive_dimension("resize", args[1])?,
    })
}

fn parse_rotate(args: &[&str]) -> Result<Command, ParseError> {
    arity("rotate", "rotate DEGREES", args, 1)?;
    Ok(Command::Rotate { degrees: value("rotate", args[0])? })
}

fn parse_crop(args: &[&str]) -> Result<Command, ParseError> {
    arity("crop", "crop LEFT TOP RIGHT BOTTOM", args, 4)?;
    let left = value("crop", args[0])?;
    let top = value("crop", args[1])?;
    let right = value("crop", args[2])?;
    let bottom = value("crop", args[3])?;
    if right <= left || bottom <= top {
        return Err(ParseError::InvalidValue {
            name: "crop",
            detail: "box is empty (right/bottom must exceed left/top)".into(),
        });
    }
    Ok(Command::Crop { left, top, right, bottom })
}

fn parse_flip(args: &[&str]) -> Result<Command, ParseError> {
    arity("flip", "flip {horizontal|vertical}", args, 1)?;
    args[0]
        .parse()
        .map(Command::Flip)
        .map_err(|detail| ParseError::InvalidValue { name: "flip", detail })
}

fn parse_grayscale(args: &[&str]) -> Result<Command, ParseError> {
    arity("grayscale", "grayscale", args, 0)?;
    Ok(Command::Grayscale)
}

fn factor(name: &'static str, usage: &'static str, args: &[&str]) -> Result<f32, ParseError> {
    arity(name, usage, args, 1)?;
    let v: f32 = value(name, args[0])?;
    if v < 0.0 {
        return Err(ParseError::InvalidValue {
            name,
            detail: "factor must be non-negative".into(),
        });
    }
    Ok(v)
}

fn parse_brightness(args: &[&str]) -> Result<Command, ParseError> {
    Ok(Command::Brightness(factor("brightness", "brightness FACTOR", args)?))
}

fn parse_contrast(args: &[&str]) -> Result<Command, ParseError> {
    Ok(Command::Contrast(factor("contrast", "contrast FACTOR", args)?))
}

fn parse_color_cmd(args: &[&str]) -> Result<Command, ParseError> {
    Ok(Command::Color(factor("color", "color FACTOR", args)?))
}

fn parse_saturation(args: &[&str]) -> Result<Command, ParseError> {
    Ok(Command::Saturation(factor("saturation", "saturation FACTOR", args)?))
}

fn parse_blur(args: &[&str]) -> Result<Command, ParseError> {
    arity("blur", "blur RADIUS", args, 1)?;
    let radius: f32 = value("blur", args[0])?;
    if radius <= 0.0 {
        return Err(ParseError::InvalidValue {
            name: "blur",
            detail: "radius must be positive".into(),
        });
    }
    Ok(Command::Blur(radius))
}

fn parse_sharpen(args: &[&str]) -> Result<Command, ParseError> {
    arity("sharpen", "sharpen", args, 0)?;
    Ok(Command::Sharpen)
}

fn parse_edge_enhance(args: &[&str]) -> Result<Command, ParseError> {
    arity("edge_enhance", "edge_enhance", args, 0)?;
    Ok(Command::EdgeEnhance)
}

fn parse_filter(args: &[&str]) -> Result<Command, ParseError> {
    arity("filter", "filter NAME", args, 1)?;
    args[0]
        .parse()
        .map(Command::Filter)
        .map_err(|detail| ParseError::InvalidValue { name: "filter", detail })
}

fn parse_invert(args: &[&str]) -> Result<Command, ParseError> {
    arity("invert", "invert", args, 0)?;
    Ok(Command::Invert)
}

fn parse_equalize(args: &[&str]) -> Result<Command, ParseError> {
    arity("equalize", "equalize", args, 0)?;
    Ok(Command::Equalize)
}

fn parse_color_transform(args: &[&str]) -> Result<Command, ParseError> {
    arity("color_transform", "color_transform M0 .. M11 (12 floats)", args, 12)?;
    let mut matrix = [0.0f32; 12];
    for (slot, raw) in matrix.iter_mut().zip(args) {
        *slot = value("color_transform", raw)?;
    }
    Ok(Command::ColorTransform(matrix))
}

fn parse_blend(args: &[&str]) -> Result<Command, ParseError> {
    arity("blend", "blend PATH ALPHA", args, 2)?;
    Ok(Command::Blend {
        path: PathBuf::from(args[0]),
        alpha: unit_interval("blend", args[1])?,
    })
}

fn parse_overlay(args: &[&str]) -> Result<Command, ParseError> {
    arity("overlay", "overlay PATH OPACITY", args, 2)?;
    Ok(Command::Overlay {
        path: PathBuf::from(args[0]),
        opacity: unit_interval("overlay", args[1])?,
    })
}

fn parse_watermark(args: &[&str]) -> Result<Command, ParseError> {
    arity("watermark", "watermark PATH X Y", args, 3)?;
    Ok(Command::Watermark {
        path: PathBuf::from(args[0]),
        x: value("watermark", args[1])?,
        y: value("watermark", args[2])?,
    })
}

// The string comes last and may span several words, so this one parses a
// prefix instead of a fixed arity.
fn parse_text(args: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "text X Y SIZE COLOR WORDS...";
    if args.len() < 5 {
        return Err(ParseError::WrongArity { name: "text", usage: USAGE });
    }
    let size: f32 = value("text", args[2])?;
    if size <= 0.0 {
        return Err(ParseError::InvalidValue {
            name: "text",
            detail: "size must be positive".into(),
        });
    }
    let color = overlay::parse_color(args[3]).ok_or_else(|| ParseError::InvalidValue {
        name: "text",
        detail: format!("unknown color '{}'", args[3]),
    })?;
    Ok(Command::Text(TextParams {
        text: args[4..].join(" "),
        x: value("text", args[0])?,
        y: value("text", args[1])?,
        size,
        color,
        font: None,
    }))
}

/// The full catalog, in pipeline application order.
pub fn catalog() -> &'static [CommandSpec] {
    const CATALOG: &[CommandSpec] = &[
        CommandSpec { name: "resize", usage: "resize WIDTH HEIGHT", parse: parse_resize },
        CommandSpec { name: "rotate", usage: "rotate DEGREES", parse: parse_rotate },
        CommandSpec { name: "crop", usage: "crop LEFT TOP RIGHT BOTTOM", parse: parse_crop },
        CommandSpec { name: "flip", usage: "flip {horizontal|vertical}", parse: parse_flip },
        CommandSpec { name: "grayscale", usage: "grayscale", parse: parse_grayscale },
        CommandSpec { name: "brightness", usage: "brightness FACTOR", parse: parse_brightness },
        CommandSpec { name: "contrast", usage: "contrast FACTOR", parse: parse_contrast },
        CommandSpec { name: "color", usage: "color FACTOR", parse: parse_color_cmd },
        CommandSpec { name: "saturation", usage: "saturation FACTOR", parse: parse_saturation },
        CommandSpec { name: "blur", usage: "blur RADIUS", parse: parse_blur },
        CommandSpec { name: "sharpen", usage: "sharpen", parse: parse_sharpen },
        CommandSpec { name: "edge_enhance", usage: "edge_enhance", parse: parse_edge_enhance },
        CommandSpec {
            name: "filter",
            usage: "filter {emboss|contour|find_edges|detail|edge_enhance_more}",
            parse: parse_filter,
        },
        CommandSpec { name: "invert", usage: "invert", parse: parse_invert },
        CommandSpec { name: "equalize", usage: "equalize", parse: parse_equalize },
        CommandSpec {
            name: "color_transform",
            usage: "color_transform M0 .. M11 (12 floats)",
            parse: parse_color_transform,
        },
        CommandSpec { name: "blend", usage: "blend PATH ALPHA", parse: parse_blend },
        CommandSpec { name: "overlay", usage: "overlay PATH OPACITY", parse: parse_overlay },
        CommandSpec { name: "watermark", usage: "watermark PATH X Y", parse: parse_watermark },
        CommandSpec { name: "text", usage: "text X Y SIZE COLOR WORDS...", parse: parse_text },
    ];
    CATALOG
}

/// Look up a catalog entry by command name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    catalog().iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn checkerboard() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(20, 20, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        }))
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<_> = catalog().iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), catalog().len());
    }

    #[test]
    fn find_resolves_every_catalog_name() {
        for spec in catalog() {
            assert!(find(spec.name).is_some());
        }
        assert!(find("posterize").is_none());
    }

    #[test]
    fn parse_resize_line() {
        let cmd = (find("resize").unwrap().parse)(&["640", "480"]).unwrap();
        assert_eq!(cmd, Command::Resize { width: 640, height: 480 });
    }

    #[test]
    fn parse_resize_rejects_zero() {
        assert!((find("resize").unwrap().parse)(&["0", "480"]).is_err());
    }

    #[test]
    fn parse_crop_rejects_empty_box() {
        assert!((find("crop").unwrap().parse)(&["50", "10", "50", "60"]).is_err());
    }

    #[test]
    fn parse_blend_rejects_alpha_out_of_range() {
        assert!((find("blend").unwrap().parse)(&["other.png", "1.5"]).is_err());
        let cmd = (find("blend").unwrap().parse)(&["other.png", "0.25"]).unwrap();
        assert_eq!(
            cmd,
            Command::Blend { path: PathBuf::from("other.png"), alpha: 0.25 }
        );
    }

    #[test]
    fn parse_text_joins_trailing_words() {
        let cmd = (find("text").unwrap().parse)(&["5", "10", "24", "white", "hello", "there"])
            .unwrap();
        match cmd {
            Command::Text(params) => {
                assert_eq!(params.text, "hello there");
                assert_eq!((params.x, params.y), (5, 10));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_wrong_arity_shows_usage() {
        let err = (find("rotate").unwrap().parse)(&[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::WrongArity { name: "rotate", usage: "rotate DEGREES" }
        );
    }

    #[test]
    fn crop_within_bounds_applies() {
        let out = Command::Crop { left: 2, top: 2, right: 12, bottom: 8 }
            .apply(&checkerboard())
            .unwrap();
        assert_eq!(out.dimensions(), (10, 6));
    }

    #[test]
    fn crop_out_of_bounds_is_a_command_error() {
        let result = Command::Crop { left: 0, top: 0, right: 21, bottom: 10 }
            .apply(&checkerboard());
        assert!(matches!(result, Err(CommandError::CropOutOfBounds { .. })));
    }

    #[test]
    fn missing_watermark_asset_is_skippable() {
        let result = Command::Watermark {
            path: PathBuf::from("/nonexistent/mark.png"),
            x: 0,
            y: 0,
        }
        .apply(&checkerboard());
        match result {
            Err(err) => assert!(err.is_skippable()),
            Ok(_) => panic!("expected a missing-asset error"),
        }
    }

    #[test]
    fn color_and_saturation_agree() {
        let img = checkerboard();
        let a = Command::Color(0.5).apply(&img).unwrap();
        let b = Command::Saturation(0.5).apply(&img).unwrap();
        assert_eq!(a.to_rgba8().as_raw(), b.to_rgba8().as_raw());
    }

    #[test]
    fn apply_does_not_mutate_the_input() {
        let img = checkerboard();
        let before = img.to_rgba8().as_raw().clone();
        let _ = Command::Invert.apply(&img).unwrap();
        assert_eq!(img.to_rgba8().as_raw(), &before);
    }
}
