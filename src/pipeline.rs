//! Flag parsing and the fixed edit pipeline.
//!
//! [`EditArgs`] is the clap surface shared by single-file and batch runs.
//! [`Pipeline::from_args`] validates every parameter up front, before any
//! image is opened, so a bad flag aborts the whole invocation instead of
//! failing halfway through a directory. The resulting command list always
//! runs in catalog order, regardless of the order flags were typed in.

use crate::command::{Command, CommandError, TextParams};
use crate::imaging::OutputFormat;
use crate::imaging::overlay::parse_color;
use clap::Args;
use image::DynamicImage;
use std::path::PathBuf;
use thiserror::Error;

/// One flag per catalog command. Long option names follow the command names,
/// underscores included.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    /// Resize to exact dimensions
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub resize: Option<Vec<u32>>,

    /// Rotate counter-clockwise by degrees
    #[arg(long, allow_negative_numbers = true, value_name = "DEGREES")]
    pub rotate: Option<f32>,

    /// Crop to a box; the right/bottom edge is exclusive
    #[arg(long, num_args = 4, value_names = ["LEFT", "TOP", "RIGHT", "BOTTOM"])]
    pub crop: Option<Vec<u32>>,

    /// Mirror the image (horizontal or vertical)
    #[arg(long, value_name = "DIRECTION")]
    pub flip: Option<String>,

    /// Convert to grayscale
    #[arg(long)]
    pub grayscale: bool,

    /// Brightness factor (1.0 = unchanged)
    #[arg(long, value_name = "FACTOR")]
    pub brightness: Option<f32>,

    /// Contrast factor (1.0 = unchanged)
    #[arg(long, value_name = "FACTOR")]
    pub contrast: Option<f32>,

    /// Color balance factor (1.0 = unchanged)
    #[arg(long, value_name = "FACTOR")]
    pub color: Option<f32>,

    /// Saturation factor (1.0 = unchanged)
    #[arg(long, value_name = "FACTOR")]
    pub saturation: Option<f32>,

    /// Gaussian blur radius
    #[arg(long, value_name = "RADIUS")]
    pub blur: Option<f32>,

    /// Sharpen
    #[arg(long)]
    pub sharpen: bool,

    /// Enhance edges
    #[arg(long = "edge_enhance")]
    pub edge_enhance: bool,

    /// Apply a named effect filter
    #[arg(long, value_name = "NAME")]
    pub filter: Option<String>,

    /// Invert colors
    #[arg(long)]
    pub invert: bool,

    /// Equalize the histogram of each channel
    #[arg(long)]
    pub equalize: bool,

    /// 3x4 color matrix, row-major, offsets in the 0-255 domain
    #[arg(
        long = "color_transform",
        num_args = 12,
        allow_negative_numbers = true,
        value_name = "M"
    )]
    pub color_transform: Option<Vec<f32>>,

    /// Blend with another image
    #[arg(long, value_name = "PATH")]
    pub blend: Option<PathBuf>,

    /// Blend weight of the other image
    #[arg(long = "blend_alpha", value_name = "ALPHA", default_value_t = 0.5)]
    pub blend_alpha: f32,

    /// Composite another image over this one
    #[arg(long, value_name = "PATH")]
    pub overlay: Option<PathBuf>,

    /// Opacity of the overlaid image
    #[arg(long = "overlay_opacity", value_name = "OPACITY", default_value_t = 1.0)]
    pub overlay_opacity: f32,

    /// Stamp a watermark image
    #[arg(long, value_name = "PATH")]
    pub watermark: Option<PathBuf>,

    /// Watermark position
    #[arg(
        long = "watermark_position",
        num_args = 2,
        allow_negative_numbers = true,
        value_names = ["X", "Y"]
    )]
    pub watermark_position: Option<Vec<i64>>,

    /// Draw a line of text
    #[arg(long, value_name = "STRING")]
    pub text: Option<String>,

    /// Text position
    #[arg(
        long = "text_position",
        num_args = 2,
        allow_negative_numbers = true,
        value_names = ["X", "Y"]
    )]
    pub text_position: Option<Vec<i32>>,

    /// Text size in pixels
    #[arg(long = "text_size", value_name = "SIZE", default_value_t = 24.0)]
    pub text_size: f32,

    /// Text color (named or #RRGGBB)
    #[arg(long = "text_color", value_name = "COLOR", default_value = "white")]
    pub text_color: String,

    /// Font file to use for text (falls back to system fonts)
    #[arg(long = "text_font", value_name = "PATH")]
    pub text_font: Option<PathBuf>,

    /// Output format override (JPEG, PNG, BMP, or GIF)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// A flag failed validation. Raised before any image I/O.
#[derive(Error, Debug, PartialEq)]
pub enum ArgError {
    #[error("--{flag}: dimensions must be positive")]
    ZeroDimension { flag: &'static str },
    #[error("--crop: box is empty (right/bottom must exceed left/top)")]
    EmptyCropBox,
    #[error("--{flag}: factor must be non-negative")]
    NegativeFactor { flag: &'static str },
    #[error("--{flag}: value must be positive")]
    NotPositive { flag: &'static str },
    #[error("--{flag}: value must be within [0, 1]")]
    OutOfUnitInterval { flag: &'static str },
    #[error("--{flag}: {detail}")]
    Invalid { flag: &'static str, detail: String },
}

fn non_negative(flag: &'static str, v: f32) -> Result<f32, ArgError> {
    if v < 0.0 {
        Err(ArgError::NegativeFactor { flag })
    } else {
        Ok(v)
    }
}

fn unit_interval(flag: &'static str, v: f32) -> Result<f32, ArgError> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(ArgError::OutOfUnitInterval { flag })
    }
}

/// What happened to one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    Applied,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub command: &'static str,
    pub status: StepStatus,
}

/// A validated, ordered list of edits plus the output format override.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub commands: Vec<Command>,
    pub format: Option<OutputFormat>,
}

impl Pipeline {
    /// Validate flags and assemble the command list in catalog order.
    pub fn from_args(args: &EditArgs) -> Result<Pipeline, ArgError> {
        let mut commands = Vec::new();

        if let Some(dims) = &args.resize {
            let (width, height) = (dims[0], dims[1]);
            if width == 0 || height == 0 {
                return Err(ArgError::ZeroDimension { flag: "resize" });
            }
            commands.push(Command::Resize { width, height });
        }
        if let Some(degrees) = args.rotate {
            commands.push(Command::Rotate { degrees });
        }
        if let Some(corners) = &args.crop {
            let (left, top, right, bottom) = (corners[0], corners[1], corners[2], corners[3]);
            if right <= left || bottom <= top {
                return Err(ArgError::EmptyCropBox);
            }
            commands.push(Command::Crop { left, top, right, bottom });
        }
        if let Some(raw) = &args.flip {
            let direction = raw
                .parse()
                .map_err(|detail| ArgError::Invalid { flag: "flip", detail })?;
            commands.push(Command::Flip(direction));
        }
        if args.grayscale {
            commands.push(Command::Grayscale);
        }
        if let Some(factor) = args.brightness {
            commands.push(Command::Brightness(non_negative("brightness", factor)?));
        }
        if let Some(factor) = args.contrast {
            commands.push(Command::Contrast(non_negative("contrast", factor)?));
        }
        if let Some(factor) = args.color {
            commands.push(Command::Color(non_negative("color", factor)?));
        }
        if let Some(factor) = args.saturation {
            commands.push(Command::Saturation(non_negative("saturation", factor)?));
        }
        if let Some(radius) = args.blur {
            if radius <= 0.0 {
                return Err(ArgError::NotPositive { flag: "blur" });
            }
            commands.push(Command::Blur(radius));
        }
        if args.sharpen {
            commands.push(Command::Sharpen);
        }
        if args.edge_enhance {
            commands.push(Command::EdgeEnhance);
        }
        if let Some(raw) = &args.filter {
            let named = raw
                .parse()
                .map_err(|detail| ArgError::Invalid { flag: "filter", detail })?;
            commands.push(Command::Filter(named));
        }
        if args.invert {
            commands.push(Command::Invert);
        }
        if args.equalize {
            commands.push(Command::Equalize);
        }
        if let Some(values) = &args.color_transform {
            let matrix: [f32; 12] =
                values
                    .as_slice()
                    .try_into()
                    .map_err(|_| ArgError::Invalid {
                        flag: "color_transform",
                        detail: format!("expected 12 matrix values, got {}", values.len()),
                    })?;
            commands.push(Command::ColorTransform(matrix));
        }
        if let Some(path) = &args.blend {
            commands.push(Command::Blend {
                path: path.clone(),
                alpha: unit_interval("blend_alpha", args.blend_alpha)?,
            });
        }
        if let Some(path) = &args.overlay {
            commands.push(Command::Overlay {
                path: path.clone(),
                opacity: unit_interval("overlay_opacity", args.overlay_opacity)?,
            });
        }
        if let Some(path) = &args.watermark {
            let (x, y) = match &args.watermark_position {
                Some(pos) => (pos[0], pos[1]),
                None => (0, 0),
            };
            commands.push(Command::Watermark { path: path.clone(), x, y });
        }
        if let Some(text) = &args.text {
            if args.text_size <= 0.0 {
                return Err(ArgError::NotPositive { flag: "text_size" });
            }
            let color = parse_color(&args.text_color).ok_or_else(|| ArgError::Invalid {
                flag: "text_color",
                detail: format!("unknown color '{}'", args.text_color),
            })?;
            let (x, y) = match &args.text_position {
                Some(pos) => (pos[0], pos[1]),
                None => (10, 10),
            };
            commands.push(Command::Text(TextParams {
                text: text.clone(),
                x,
                y,
                size: args.text_size,
                color,
                font: args.text_font.clone(),
            }));
        }

        let format = match &args.format {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|detail| ArgError::Invalid { flag: "format", detail })?,
            ),
            None => None,
        };

        Ok(Pipeline { commands, format })
    }

    /// True when no flag requested an edit (a format override alone still
    /// counts as work to do at save time).
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.format.is_none()
    }

    /// Apply every command in order. A step whose auxiliary asset is missing
    /// is reported as skipped and the image carries through unchanged; any
    /// other failure aborts.
    pub fn run(
        &self,
        img: DynamicImage,
    ) -> Result<(DynamicImage, Vec<StepReport>), CommandError> {
        let mut current = img;
        let mut reports = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            match command.apply(&current) {
                Ok(next) => {
                    current = next;
                    reports.push(StepReport {
                        command: command.name(),
                        status: StepStatus::Applied,
                    });
                }
                Err(err) if err.is_skippable() => {
                    reports.push(StepReport {
                        command: command.name(),
                        status: StepStatus::Skipped(err.to_string()),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok((current, reports))
    }
}
