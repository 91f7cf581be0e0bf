//! Summarize a chunk file

use std::path::Path;

use anyhow::Result;
use humansize::{format_size, BINARY};

use vsc::{chunkfile, ChunkType, Flow};

pub fn handle(input: &Path, json: bool) -> Result<()> {
    let parsed = chunkfile::load_table(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.table)?);
        return Ok(());
    }

    println!(
        "{}: {} flow(s), {} chunk(s)",
        input.display(),
        parsed.table.len(),
        parsed.table.chunk_count()
    );
    for flow in parsed.table.flows() {
        println!("  {}", flow_summary(flow));
    }
    if !parsed.defects.is_empty() {
        println!("{} line(s) skipped:", parsed.defects.len());
        for defect in &parsed.defects {
            println!("  {}", defect);
        }
    }
    Ok(())
}

/// One-line description of a flow: endpoints, chunk split and volume.
pub fn flow_summary(flow: &Flow) -> String {
    let mean_duration = mean(flow.chunks.iter().skip(1).map(|c| c.duration_time));
    format!(
        "{} <-> {}: {} chunks ({} video, {} audio), {}, mean interval {:.3}s",
        flow.src,
        flow.dst,
        flow.chunks.len(),
        flow.count_of(ChunkType::Video),
        flow.count_of(ChunkType::Audio),
        format_size(flow.total_bytes(), BINARY),
        mean_duration.unwrap_or(0.0)
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
