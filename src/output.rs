//! CLI output formatting.
//!
//! Every card prints as a positional index and title, followed by indented
//! detail lines. Failures are reported inline, in the position of the URL that
//! failed, so the output reads in input order.
//!
//! # Output Format
//!
//! ## Fetch
//!
//! ```text
//! 001 https://www.loc.gov/item/2005625258/manifest.json (1 image)
//!     001 A new map of Texas
//!         Author: Mitchell, Samuel Augustus
//!         Date: Philadelphia : S.A. Mitchell, 1846
//!         Collection: Geography and Map Division
//!         Attribution: Library of Congress
//!         Link: http://www.loc.gov/item/2005625258/
//!         Image: https://tile.loc.gov/image-services/iiif/.../info.json
//! 002 https://example.org/missing.json
//!     Error: There was an error fetching the IIIF Manifest: ...
//!
//! Added 1 image from 1 manifest (1 failed)
//! ```
//!
//! ## Import
//!
//! ```text
//! Loaded 3 images from combined.json
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::gallery::BatchReport;
use crate::ingest::IngestError;
use crate::record::ImageRecord;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    match n {
        1 => format!("1 {word}"),
        n => format!("{n} {word}s"),
    }
}

/// One card: index + title, then its details one level deeper.
fn record_lines(index: usize, record: &ImageRecord, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let detail = indent(depth + 1);
    let mut lines = vec![format!("{pad}{} {}", format_index(index), record.title)];
    lines.push(format!("{detail}Author: {}", record.author));
    lines.push(format!("{detail}Date: {}", record.date));
    lines.push(format!("{detail}Collection: {}", record.collection));
    lines.push(format!("{detail}Attribution: {}", record.attribution));
    lines.push(format!("{detail}Link: {}", record.location_link));
    lines.push(format!("{detail}Image: {}", record.full_resolution_url));
    lines
}

// ============================================================================
// Records
// ============================================================================

pub fn format_records(records: &[ImageRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| record_lines(i + 1, record, 0))
        .collect()
}

pub fn print_records(records: &[ImageRecord]) {
    for line in format_records(records) {
        println!("{}", line);
    }
}

// ============================================================================
// Fetch
// ============================================================================

/// Message shown for a manifest that could not be ingested.
pub fn fetch_error_message(error: &IngestError) -> String {
    format!("Error: There was an error fetching the IIIF Manifest: {error}")
}

/// Batch outcomes in input order, with each manifest's cards nested under it.
///
/// `cards` is every card the batch rendered, in render order; each successful
/// outcome consumes as many as it reported.
pub fn format_batch_report(report: &BatchReport, cards: &[ImageRecord]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut remaining = cards;

    for (i, outcome) in report.outcomes.iter().enumerate() {
        let header = format!("{} {}", format_index(i + 1), outcome.url);
        match &outcome.result {
            Ok(count) => {
                lines.push(format!("{header} ({})", plural(*count, "image")));
                let (own, rest) = remaining.split_at((*count).min(remaining.len()));
                for (j, record) in own.iter().enumerate() {
                    lines.extend(record_lines(j + 1, record, 1));
                }
                remaining = rest;
            }
            Err(error) => {
                lines.push(header);
                lines.push(format!("{}{}", indent(1), fetch_error_message(error)));
            }
        }
    }

    let failed = report.failures().count();
    let fetched = report.outcomes.len() - failed;
    let mut summary = format!(
        "Added {} from {}",
        plural(report.cards_rendered(), "image"),
        plural(fetched, "manifest")
    );
    if failed > 0 {
        summary.push_str(&format!(" ({failed} failed)"));
    }
    lines.push(String::new());
    lines.push(summary);
    lines
}

pub fn print_batch_report(report: &BatchReport, cards: &[ImageRecord]) {
    for line in format_batch_report(report, cards) {
        println!("{}", line);
    }
}

// ============================================================================
// Import / export
// ============================================================================

pub fn format_import_result(path: &Path, result: &Result<usize, IngestError>) -> Vec<String> {
    match result {
        Ok(count) => vec![format!(
            "Loaded {} from {}",
            plural(*count, "image"),
            path.display()
        )],
        Err(error) => vec![format!("Failed to load manifest: {error}")],
    }
}

pub fn print_import_result(path: &Path, result: &Result<usize, IngestError>) {
    for line in format_import_result(path, result) {
        println!("{}", line);
    }
}

pub fn format_written(what: &str, path: &Path) -> String {
    format!("{what} → {}", path.display())
}
