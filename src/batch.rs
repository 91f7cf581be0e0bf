//! Segment every packet listing in a directory.
//!
//! Traces are independent, so each one gets its own [`Segmenter`] run and
//! flow table on the rayon pool. A failing trace is logged and recorded in
//! the report; the remaining traces are unaffected.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::chunkfile;
use crate::error::{Error, Result};
use crate::packet;
use crate::segment::{SegmentConfig, Segmenter};

/// Extension of packet listings picked up by [`run_batch`].
pub const LISTING_EXTENSION: &str = "jsonl";

/// Outcome of one successfully processed trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub flows: usize,
    pub chunks: usize,
}

/// A trace that could not be processed.
#[derive(Debug)]
pub struct TraceFailure {
    pub input: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<TraceSummary>,
    pub failed: Vec<TraceFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Output file name for a listing: `trace.jsonl` becomes `chunk_trace.txt`.
pub fn output_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("chunk_{}.txt", stem)
}

/// Packet listings in `dir`, sorted by name.
pub fn collect_listings(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut listings = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == LISTING_EXTENSION) {
            listings.push(path);
        }
    }
    listings.sort();
    Ok(listings)
}

/// Segment one listing and write its chunk file into `output_dir`.
pub fn process_trace(
    input: &Path,
    output_dir: &Path,
    segmenter: &Segmenter,
) -> Result<TraceSummary> {
    let packets = packet::read_packets(input)?;
    let table = segmenter.segment(&packets)?;
    let output = output_dir.join(output_name(input));
    chunkfile::save_table(&table, &output)?;

    Ok(TraceSummary {
        input: input.to_path_buf(),
        output,
        flows: table.len(),
        chunks: table.chunk_count(),
    })
}

/// Process every listing in `input_dir` in parallel.
///
/// Only directory-level failures (unreadable input directory, output
/// directory that cannot be created) are returned as errors.
pub fn run_batch(input_dir: &Path, output_dir: &Path, config: &SegmentConfig) -> Result<BatchReport> {
    let listings = collect_listings(input_dir)?;
    fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

    tracing::info!(
        traces = listings.len(),
        input = %input_dir.display(),
        output = %output_dir.display(),
        "starting batch"
    );

    let segmenter = Segmenter::new(config.clone());
    let results: Vec<_> = listings
        .par_iter()
        .map(|input| (input, process_trace(input, output_dir, &segmenter)))
        .collect();

    let mut report = BatchReport::default();
    for (input, result) in results {
        match result {
            Ok(summary) => {
                tracing::info!(
                    input = %input.display(),
                    flows = summary.flows,
                    chunks = summary.chunks,
                    "wrote {}",
                    summary.output.display()
                );
                report.processed.push(summary);
            }
            Err(error) => {
                tracing::warn!(input = %input.display(), "skipping trace: {}", error);
                report.failed.push(TraceFailure {
                    input: input.clone(),
                    error,
                });
            }
        }
    }

    Ok(report)
}
