//! Chunk file persistence: write, read back, tolerate damage

use std::fs;

use vsc::chunkfile::{self, DefectKind};
use vsc::segment;

use crate::common::{addr, streaming_session, CLIENT, VIDEO_CDN};

const TOLERANCE: f64 = 1e-6;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

#[test]
fn roundtrip_preserves_chunks() {
    let original = segment(&streaming_session(1_700_000_000.0)).unwrap();
    let text = chunkfile::render_table(&original);
    let parsed = chunkfile::parse_table(&text);

    assert!(parsed.defects.is_empty());
    assert_eq!(parsed.table.len(), original.len());

    for (before, after) in original.flows().zip(parsed.table.flows()) {
        assert_eq!(before.src, after.src);
        assert_eq!(before.dst, after.dst);
        assert_eq!(before.chunks.len(), after.chunks.len());

        for (b, a) in before.chunks.iter().zip(&after.chunks) {
            assert_eq!(b.size, a.size);
            assert_eq!(b.kind, a.kind);
            assert!(close(b.request_time, a.request_time));
            assert!(close(b.first_byte_wait_time, a.first_byte_wait_time));
            assert!(close(b.download_time, a.download_time));
            assert!(close(b.slack_time, a.slack_time));
            assert!(close(b.start, a.start));
            assert!(close(b.end, a.end));
        }
    }
}

#[test]
fn roundtrip_rederives_durations() {
    let original = segment(&streaming_session(0.0)).unwrap();
    let parsed = chunkfile::parse_table(&chunkfile::render_table(&original));

    let before = original.get(addr(CLIENT), addr(VIDEO_CDN)).unwrap();
    let after = parsed.table.get(addr(CLIENT), addr(VIDEO_CDN)).unwrap();

    // live segmentation measures to the next request, loading measures from the previous one
    assert!(close(before.chunks[0].duration_time, 4.0));
    assert_eq!(after.chunks[0].duration_time, 0.0);
    for i in 1..after.chunks.len() {
        assert!(close(after.chunks[i].duration_time, before.chunks[i - 1].duration_time));
    }
}

#[test]
fn file_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chunk_session.txt");
    let original = segment(&streaming_session(0.0)).unwrap();

    chunkfile::save_table(&original, &path).unwrap();
    let loaded = chunkfile::load_table(&path).unwrap();

    assert_eq!(loaded.table.chunk_count(), original.chunk_count());
}

#[test]
fn corrupted_line_only_drops_that_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chunk_damaged.txt");
    let original = segment(&streaming_session(0.0)).unwrap();
    let text = chunkfile::render_table(&original);

    let mut lines: Vec<String> = text.lines().map(String::from).collect();
    lines[2] = "  GET: 4.0, TTFB: ###, down: 0.5".to_string();
    fs::write(&path, lines.join("\n")).unwrap();

    let loaded = chunkfile::load_table(&path).unwrap();
    assert_eq!(loaded.table.len(), original.len());
    assert_eq!(loaded.table.chunk_count(), original.chunk_count() - 1);
    assert_eq!(loaded.defects.len(), 1);
    assert_eq!(loaded.defects[0].line, 3);
    assert_eq!(loaded.defects[0].kind, DefectKind::MalformedChunk);
}

#[test]
fn empty_table_renders_empty_file() {
    let table = vsc::FlowTable::new();
    assert_eq!(chunkfile::render_table(&table), "");
    assert!(chunkfile::parse_table("\n\n").table.is_empty());
}
