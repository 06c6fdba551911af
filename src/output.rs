//! User-facing output.
//!
//! Pure `format_*` functions build strings; thin `print_*` wrappers put them
//! on stdout. Everything testable lives on the `format_*` side.

use crate::batch::{BatchEntry, BatchSummary, Outcome};
use crate::imaging::Histogram;
use crate::pipeline::{StepReport, StepStatus};

/// One line per pipeline step: what ran and what was skipped.
pub fn format_step_reports(reports: &[StepReport]) -> String {
    let mut out = String::new();
    for report in reports {
        match &report.status {
            StepStatus::Applied => out.push_str(&format!("applied {}\n", report.command)),
            StepStatus::Skipped(reason) => {
                out.push_str(&format!("skipped {}: {reason}\n", report.command))
            }
        }
    }
    out
}

pub fn format_batch_entry(entry: &BatchEntry) -> String {
    match &entry.outcome {
        Outcome::Ok { skipped, .. } if skipped.is_empty() => format!("ok      {}", entry.file),
        Outcome::Ok { skipped, .. } => {
            format!("ok      {} (skipped: {})", entry.file, skipped.join("; "))
        }
        Outcome::Failed { error } => format!("FAILED  {}: {error}", entry.file),
    }
}

/// The text log: one line per file plus a totals line.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();
    for entry in &summary.entries {
        out.push_str(&format_batch_entry(entry));
        out.push('\n');
    }
    out.push_str(&format!(
        "{} processed, {} failed\n",
        summary.succeeded(),
        summary.failed()
    ));
    out
}

const HISTOGRAM_BUCKETS: usize = 16;
const HISTOGRAM_BAR_WIDTH: usize = 40;

fn bucketize(bins: &[u32; 256]) -> [u64; HISTOGRAM_BUCKETS] {
    let mut buckets = [0u64; HISTOGRAM_BUCKETS];
    let per_bucket = 256 / HISTOGRAM_BUCKETS;
    for (i, &count) in bins.iter().enumerate() {
        buckets[i / per_bucket] += count as u64;
    }
    buckets
}

fn format_channel(label: &str, bins: &[u32; 256], out: &mut String) {
    let buckets = bucketize(bins);
    let max = buckets.iter().copied().max().unwrap_or(0).max(1);
    out.push_str(label);
    out.push('\n');
    let per_bucket = 256 / HISTOGRAM_BUCKETS;
    for (i, &count) in buckets.iter().enumerate() {
        let width = (count * HISTOGRAM_BAR_WIDTH as u64 / max) as usize;
        out.push_str(&format!(
            "  {:>3}-{:>3} |{:<bar$}| {count}\n",
            i * per_bucket,
            (i + 1) * per_bucket - 1,
            "#".repeat(width),
            bar = HISTOGRAM_BAR_WIDTH,
        ));
    }
}

/// Bucketed bar-chart rendering of all four channels.
pub fn format_histogram(hist: &Histogram) -> String {
    let mut out = String::new();
    format_channel("luminance", &hist.luma, &mut out);
    format_channel("red", &hist.r, &mut out);
    format_channel("green", &hist.g, &mut out);
    format_channel("blue", &hist.b, &mut out);
    out
}

pub fn print_step_reports(reports: &[StepReport]) {
    print!("{}", format_step_reports(reports));
}

pub fn print_batch_summary(summary: &BatchSummary) {
    print!("{}", format_batch_summary(summary));
}

pub fn print_histogram(hist: &Histogram) {
    print!("{}", format_histogram(hist));
}
