//! Directory-batch processing.
//!
//! Walks the input tree, applies one validated [`Pipeline`] to every
//! recognized image, and mirrors the directory structure under the output
//! root. Files are processed in sorted order, strictly one at a time. A
//! failure on one file is recorded in the summary and the run continues;
//! only output-directory and log-writing failures abort.

use crate::imaging::{self, codec};
use crate::pipeline::{Pipeline, StepStatus};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("input directory not found: {0}")]
    InputMissing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize batch summary: {0}")]
    Summary(#[from] serde_json::Error),
}

/// Result of processing one file, keyed by its input-relative path.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub file: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok {
        output: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        skipped: Vec<String>,
    },
    Failed {
        error: String,
    },
}

/// Ordered per-file outcomes for a whole run.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Ok { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

/// Names of the two log files written into the output directory.
pub const TEXT_LOG: &str = "batch-log.txt";
pub const JSON_LOG: &str = "summary.json";

/// Process every recognized image under `input`, writing results under
/// `output` with the same relative paths.
pub fn run(input: &Path, output: &Path, pipeline: &Pipeline) -> Result<BatchSummary, BatchError> {
    if !input.is_dir() {
        return Err(BatchError::InputMissing(input.to_path_buf()));
    }
    std::fs::create_dir_all(output)?;

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| codec::is_recognized(path))
        .collect();
    files.sort();

    let mut entries = Vec::with_capacity(files.len());
    // With a format override, inputs differing only by extension map to the
    // same output path; the first writer wins and later ones are failures.
    let mut written: HashMap<PathBuf, String> = HashMap::new();
    for path in files {
        let relative = path.strip_prefix(input).unwrap_or(&path).to_path_buf();
        let destination = codec::apply_format(&output.join(&relative), pipeline.format);
        let outcome = if let Some(earlier) = written.get(&destination) {
            Outcome::Failed {
                error: format!(
                    "output {} already written by {earlier}",
                    destination.display()
                ),
            }
        } else {
            match process_one(&path, &destination, pipeline) {
                Ok(skipped) => {
                    written.insert(destination.clone(), relative.display().to_string());
                    Outcome::Ok {
                        output: destination.display().to_string(),
                        skipped,
                    }
                }
                Err(error) => Outcome::Failed { error },
            }
        };
        entries.push(BatchEntry {
            file: relative.display().to_string(),
            outcome,
        });
    }

    Ok(BatchSummary { entries })
}

fn process_one(
    source: &Path,
    destination: &Path,
    pipeline: &Pipeline,
) -> Result<Vec<String>, String> {
    let img = imaging::load(source).map_err(|e| e.to_string())?;
    let (edited, reports) = pipeline.run(img).map_err(|e| e.to_string())?;
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    imaging::save(&edited, destination, pipeline.format).map_err(|e| e.to_string())?;

    Ok(reports
        .into_iter()
        .filter_map(|report| match report.status {
            StepStatus::Skipped(reason) => Some(format!("{}: {reason}", report.command)),
            StepStatus::Applied => None,
        })
        .collect())
}

/// Write the text and JSON logs into the output directory.
pub fn write_logs(summary: &BatchSummary, output: &Path) -> Result<(), BatchError> {
    let text = crate::output::format_batch_summary(summary);
    std::fs::write(output.join(TEXT_LOG), text)?;
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(output.join(JSON_LOG), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::EditArgs;
    use image::{DynamicImage, RgbaImage};
    use tempfile::TempDir;

    fn write_png(path: &Path, value: u8) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([value, value, value, 255]),
        ));
        imaging::save(&img, path, None).unwrap();
    }

    fn invert_pipeline() -> Pipeline {
        Pipeline::from_args(&EditArgs { invert: true, ..EditArgs::default() }).unwrap()
    }

    #[test]
    fn missing_input_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let result = run(
            &tmp.path().join("nope"),
            &tmp.path().join("out"),
            &invert_pipeline(),
        );
        assert!(matches!(result, Err(BatchError::InputMissing(_))));
    }

    #[test]
    fn one_corrupt_file_does_not_abort_the_rest() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("a.png"), 10);
        write_png(&input.join("b.png"), 20);
        write_png(&input.join("c.png"), 30);
        std::fs::write(input.join("broken.png"), b"not a png").unwrap();
        std::fs::write(input.join("notes.txt"), b"ignored").unwrap();

        let output = tmp.path().join("out");
        let summary = run(&input, &output, &invert_pipeline()).unwrap();

        assert_eq!(summary.entries.len(), 4);
        assert_eq!(summary.succeeded(), 3);
        assert_eq!(summary.failed(), 1);
        assert!(output.join("a.png").exists());
        assert!(!output.join("broken.png").exists());
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn entries_come_out_in_sorted_order() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("zebra.png"), 10);
        write_png(&input.join("alpha.png"), 20);

        let summary = run(&input, &tmp.path().join("out"), &invert_pipeline()).unwrap();
        let files: Vec<_> = summary.entries.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, ["alpha.png", "zebra.png"]);
    }

    #[test]
    fn nested_directories_are_mirrored() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("2024/june/trip.png"), 10);

        let output = tmp.path().join("out");
        let summary = run(&input, &output, &invert_pipeline()).unwrap();
        assert_eq!(summary.succeeded(), 1);
        assert!(output.join("2024/june/trip.png").exists());
    }

    #[test]
    fn format_override_rewrites_output_extensions() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("photo.png"), 10);

        let pipeline = Pipeline::from_args(&EditArgs {
            format: Some("JPEG".into()),
            ..EditArgs::default()
        })
        .unwrap();
        let output = tmp.path().join("out");
        run(&input, &output, &pipeline).unwrap();
        assert!(output.join("photo.jpg").exists());
        assert!(!output.join("photo.png").exists());
    }

    #[test]
    fn format_override_collisions_are_recorded_not_silent() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("a.png"), 10);
        // Same stem, different extension: both would land on a.jpg.
        std::fs::create_dir_all(&input).unwrap();
        let jpeg = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([200, 200, 200, 255]),
        ));
        imaging::save(&jpeg, &input.join("a.jpg"), None).unwrap();

        let pipeline = Pipeline::from_args(&EditArgs {
            format: Some("JPEG".into()),
            ..EditArgs::default()
        })
        .unwrap();
        let output = tmp.path().join("out");
        let summary = run(&input, &output, &pipeline).unwrap();

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        // Sorted order means a.jpg wins and a.png reports the collision.
        assert_eq!(summary.entries[0].file, "a.jpg");
        assert!(matches!(summary.entries[0].outcome, Outcome::Ok { .. }));
        match &summary.entries[1].outcome {
            Outcome::Failed { error } => {
                assert!(error.contains("already written by a.jpg"), "{error}");
            }
            other => panic!("expected a collision failure, got {other:?}"),
        }
    }

    #[test]
    fn logs_land_in_the_output_directory() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        write_png(&input.join("a.png"), 10);
        std::fs::write(input.join("broken.png"), b"not a png").unwrap();

        let output = tmp.path().join("out");
        let summary = run(&input, &output, &invert_pipeline()).unwrap();
        write_logs(&summary, &output).unwrap();

        let text = std::fs::read_to_string(output.join(TEXT_LOG)).unwrap();
        assert!(text.contains("a.png"));
        assert!(text.contains("broken.png"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output.join(JSON_LOG)).unwrap())
                .unwrap();
        assert_eq!(json["entries"].as_array().unwrap().len(), 2);
        assert_eq!(json["entries"][0]["status"], "ok");
        assert_eq!(json["entries"][1]["status"], "failed");
    }
}
