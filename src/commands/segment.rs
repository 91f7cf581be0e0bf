//! Segment a single packet listing

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use vsc::{chunkfile, packet, Config, Segmenter};

pub fn handle(input: &Path, output: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let packets = packet::read_packets(input)?;
    let (table, stats) = Segmenter::new(config.segment)
        .segment_with_stats(&packets)
        .with_context(|| format!("Failed to segment {}", input.display()))?;

    tracing::info!(
        packets = stats.packets,
        skipped = stats.skipped(),
        flows = table.len(),
        chunks = table.chunk_count(),
        "segmented {}",
        input.display()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    match output {
        Some(path) => {
            chunkfile::save_table(&table, path)?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            chunkfile::write_table(&table, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
