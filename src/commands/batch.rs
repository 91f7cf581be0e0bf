//! Segment a directory of packet listings

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use vsc::{batch, Config};

pub fn handle(input_dir: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let output_dir = output_dir.unwrap_or(config.output.directory);

    let report = batch::run_batch(input_dir, &output_dir, &config.segment)?;

    println!(
        "Processed {}/{} trace(s) into {}",
        report.processed.len(),
        report.total(),
        output_dir.display()
    );
    for failure in &report.failed {
        eprintln!("  failed: {}: {}", failure.input.display(), failure.error);
    }

    if report.total() > 0 && report.processed.is_empty() {
        bail!("all {} trace(s) failed", report.total());
    }
    Ok(())
}
