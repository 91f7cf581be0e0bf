//! Directory batch processing

use std::fs;

use vsc::batch::run_batch;
use vsc::chunkfile;
use vsc::{Error, SegmentConfig};

use crate::common::{cycle, listing, streaming_session, VIDEO_CDN};

#[test]
fn batch_writes_one_chunk_file_per_listing() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let out_dir = output.path().join("chunks");

    fs::write(input.path().join("a.jsonl"), listing(&streaming_session(0.0))).unwrap();
    fs::write(input.path().join("b.jsonl"), listing(&streaming_session(50.0))).unwrap();

    let report = run_batch(input.path(), &out_dir, &SegmentConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.processed.len(), 2);
    assert!(report.processed.iter().all(|s| s.chunks == 8 && s.flows == 2));

    let loaded = chunkfile::load_table(out_dir.join("chunk_a.txt")).unwrap();
    assert_eq!(loaded.table.chunk_count(), 8);
    assert!(out_dir.join("chunk_b.txt").exists());
}

#[test]
fn failing_traces_do_not_stop_the_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    fs::write(input.path().join("good.jsonl"), listing(&streaming_session(0.0))).unwrap();
    fs::write(input.path().join("empty.jsonl"), "").unwrap();
    fs::write(input.path().join("corrupt.jsonl"), "{\"ts\": 1.0, \"len\"").unwrap();

    let report = run_batch(input.path(), output.path(), &SegmentConfig::default()).unwrap();
    assert_eq!(report.total(), 3);
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.failed.len(), 2);

    let failed: Vec<_> = report
        .failed
        .iter()
        .map(|f| f.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(failed, vec!["corrupt.jsonl", "empty.jsonl"]);
    assert!(report
        .failed
        .iter()
        .any(|f| matches!(f.error, Error::MalformedTrace(_))));
    assert!(report
        .failed
        .iter()
        .any(|f| matches!(f.error, Error::PacketListing { .. })));
    assert!(output.path().join("chunk_good.txt").exists());
    assert!(!output.path().join("chunk_empty.txt").exists());
}

#[test]
fn trace_without_chunks_writes_empty_file() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("quiet.jsonl"), listing(&cycle(VIDEO_CDN, 0.0, 3))).unwrap();

    let report = run_batch(input.path(), output.path(), &SegmentConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.processed[0].chunks, 0);
    let written = fs::read_to_string(output.path().join("chunk_quiet.txt")).unwrap();
    assert!(written.is_empty());
}
