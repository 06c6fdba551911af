use clap::Parser;
use retouch::imaging::codec;
use retouch::pipeline::{EditArgs, Pipeline};
use retouch::{batch, imaging, output, shell};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Batch photo editor for the command line")]
#[command(long_about = "\
Batch photo editor for the command line

Describe edits with flags; they always apply in a fixed order (resize, rotate,
crop, flip, grayscale, brightness, contrast, color, saturation, blur, sharpen,
edge_enhance, filter, invert, equalize, color_transform, blend, overlay,
watermark, text), never in the order the flags were typed.

Modes:

  Single file:
    retouch --input photo.jpg --resize 800 600 --sharpen --output out.jpg

  Whole directory (mirrors the tree under the output directory, writes
  batch-log.txt and summary.json next to the results):
    retouch --batch --input photos/ --output edited/ --grayscale

  Interactive shell (open, edit, undo, redo, save):
    retouch --interactive

Flag validation happens before any file is opened; a bad flag aborts the whole
invocation. In batch mode, a file that fails to decode is logged and skipped,
and the run continues.

Factors follow the photo-editor convention: 1.0 leaves the image unchanged,
0.0 is the fully degenerate image (black, gray, or grayscale), and values
above 1.0 push past the original.")]
#[command(version = env!("RETOUCH_VERSION"))]
struct Cli {
    /// Input image, or input directory with --batch
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output image, or output directory with --batch
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Process every recognized image under the input directory
    #[arg(long)]
    batch: bool,

    /// Open the interactive editing shell
    #[arg(long)]
    interactive: bool,

    /// Print a per-channel histogram of the final image
    #[arg(long)]
    histogram: bool,

    #[command(flatten)]
    edit: EditArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.interactive {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        shell::run(stdin.lock(), &mut stdout)?;
        return Ok(());
    }

    // Everything is validated before the first file is touched.
    let pipeline = Pipeline::from_args(&cli.edit)?;

    let Some(input) = &cli.input else {
        return Err("--input is required (or use --interactive)".into());
    };

    if cli.batch {
        let Some(output_dir) = &cli.output else {
            return Err("--batch requires --output DIRECTORY".into());
        };
        let summary = batch::run(input, output_dir, &pipeline)?;
        batch::write_logs(&summary, output_dir)?;
        output::print_batch_summary(&summary);
        return Ok(());
    }

    if cli.output.is_none() && !cli.histogram {
        return Err("--output is required (unless only --histogram was asked for)".into());
    }

    let img = imaging::load(input)?;
    let (edited, reports) = pipeline.run(img)?;
    output::print_step_reports(&reports);

    if let Some(out) = &cli.output {
        let target = codec::apply_format(out, pipeline.format);
        imaging::save(&edited, &target, pipeline.format)?;
        println!("wrote {}", target.display());
    }

    if cli.histogram {
        output::print_histogram(&imaging::adjust::histogram(&edited));
    }

    Ok(())
}
