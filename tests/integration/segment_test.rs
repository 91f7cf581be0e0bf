//! Segmentation engine behaviour over synthetic traces

use vsc::{segment, ChunkType, Error, PacketView, SegmentConfig, Segmenter};

use crate::common::{addr, cycle, streaming_session, AUDIO_CDN, CLIENT, VIDEO_CDN};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn session_produces_one_flow_per_server() {
    let table = segment(&streaming_session(0.0)).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.chunk_count(), 8);
    assert!(table.get(addr(CLIENT), addr("34.120.5.5")).is_none());
}

#[test]
fn video_flow_alternates_by_segment_size() {
    let table = segment(&streaming_session(0.0)).unwrap();
    let video = table.get(addr(VIDEO_CDN), addr(CLIENT)).unwrap();
    let kinds: Vec<_> = video.chunks.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ChunkType::Video, ChunkType::Audio, ChunkType::Video, ChunkType::Audio]
    );
    let sizes: Vec<_> = video.chunks.iter().map(|c| c.size).collect();
    assert_eq!(sizes, vec![600_000, 300_000, 600_000, 300_000]);
}

#[test]
fn uniform_flow_is_all_audio() {
    let table = segment(&streaming_session(0.0)).unwrap();
    let audio = table.get(addr(AUDIO_CDN), addr(CLIENT)).unwrap();
    assert_eq!(audio.chunks.len(), 4);
    assert!(audio.chunks.iter().all(|c| c.kind == ChunkType::Audio));
}

#[test]
fn chunk_timings_follow_packets() {
    let table = segment(&streaming_session(0.0)).unwrap();
    let video = table.get(addr(VIDEO_CDN), addr(CLIENT)).unwrap();
    let first = &video.chunks[0];

    assert!(close(first.request_time, 0.0));
    assert!(close(first.first_byte_wait_time, 0.05));
    assert!(close(first.download_time, 0.798));
    assert!(close(first.end, 0.848));
    assert!(close(first.slack_time, 4.0 - 0.848));
    assert!(close(first.duration_time, 4.0));
}

#[test]
fn wall_clock_timestamps_become_relative() {
    let base = 1_700_000_000.0;
    let table = segment(&streaming_session(base)).unwrap();
    let audio = table.get(addr(AUDIO_CDN), addr(CLIENT)).unwrap();
    assert!((audio.chunks[0].request_time - 2.0).abs() < 1e-5);
    assert!((audio.chunks[3].request_time - 14.0).abs() < 1e-5);
}

#[test]
fn empty_trace_fails() {
    assert!(matches!(segment(&[]), Err(Error::MalformedTrace(_))));
}

#[test]
fn custom_thresholds_apply() {
    let mut packets = cycle(VIDEO_CDN, 0.0, 20);
    packets.push(PacketView::tcp(1.0, addr(CLIENT), addr(VIDEO_CDN), 650));

    assert!(segment(&packets).unwrap().is_empty());

    let config = SegmentConfig {
        min_chunk_payload: 10_000,
        ..SegmentConfig::default()
    };
    let table = Segmenter::new(config).segment(&packets).unwrap();
    assert_eq!(table.chunk_count(), 1);
}

#[test]
fn raised_request_threshold_merges_cycles() {
    let mut packets = cycle(VIDEO_CDN, 0.0, 100);
    packets.extend(cycle(VIDEO_CDN, 1.0, 100));
    packets.push(PacketView::tcp(2.0, addr(CLIENT), addr(VIDEO_CDN), 1200));

    let config = SegmentConfig {
        request_min_payload: 1000,
        ..SegmentConfig::default()
    };
    let table = Segmenter::new(config).segment(&packets).unwrap();
    let flow = table.flows().next().unwrap();
    assert_eq!(flow.chunks.len(), 1);
    assert_eq!(flow.chunks[0].size, 300_000);
}
