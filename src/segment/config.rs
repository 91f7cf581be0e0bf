//! Thresholds for the segmentation engine.

use serde::{Deserialize, Serialize};

use crate::chunk::MIN_CHUNK_PAYLOAD;

/// Outbound packets larger than this many bytes open a new cycle.
pub const REQUEST_MIN_PAYLOAD: u64 = 300;

/// UDP port of encrypted streaming (QUIC).
pub const QUIC_PORT: u16 = 443;

/// Configuration for the segmentation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Minimum inbound payload for a cycle to become a chunk (exclusive)
    pub min_chunk_payload: u64,
    /// Minimum outbound packet length treated as a request (exclusive)
    pub request_min_payload: u64,
    /// UDP port accepted as streaming traffic
    pub quic_port: u16,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_chunk_payload: MIN_CHUNK_PAYLOAD,
            request_min_payload: REQUEST_MIN_PAYLOAD,
            quic_port: QUIC_PORT,
        }
    }
}
