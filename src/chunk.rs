//! Detected download cycles and their timing metrics.
//!
//! ```text
//!   <--                           duration                          -->
//!   GET   first_byte_wait   start    download        end   slack    GET
//!    |                        |                       |              |
//!    +------------------------+-----------------------+--------------+
//! ```

use serde::Serialize;

/// Minimum cumulative inbound payload (bytes) for a cycle to count as a chunk.
pub const MIN_CHUNK_PAYLOAD: u64 = 80 * 1024;

/// Classification tag of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChunkType {
    Audio,
    Video,
    /// Not yet classified
    #[default]
    #[serde(rename = "BG")]
    Background,
}

impl ChunkType {
    pub fn tag(&self) -> &'static str {
        match self {
            ChunkType::Audio => "AUDIO",
            ChunkType::Video => "VIDEO",
            ChunkType::Background => "BG",
        }
    }

    /// Unknown tags map to [`ChunkType::Background`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "AUDIO" => ChunkType::Audio,
            "VIDEO" => ChunkType::Video,
            _ => ChunkType::Background,
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One request/response cycle. Times are seconds relative to trace start.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Chunk {
    /// Time of the outbound request that opened this cycle
    pub request_time: f64,
    /// Request to first inbound byte (0 if no byte arrived)
    pub first_byte_wait_time: f64,
    /// First to last inbound byte
    pub download_time: f64,
    /// Last inbound byte to the next request
    pub slack_time: f64,
    /// Request to next request
    pub duration_time: f64,
    /// Cumulative inbound payload bytes
    pub size: u64,
    pub start: f64,
    pub end: f64,
    #[serde(rename = "type")]
    pub kind: ChunkType,
}

impl Chunk {
    pub fn new(request_time: f64) -> Self {
        Self {
            request_time,
            ..Self::default()
        }
    }

    /// Rebuild a chunk from the fields stored in a chunk file.
    ///
    /// `start`/`end` are derived from the stored timings. `duration_time` is
    /// the gap since `previous_request`, or 0 for the first chunk of a flow,
    /// which differs from the live value set by [`crate::Flow::close_chunk`].
    pub fn from_persisted(
        request_time: f64,
        first_byte_wait_time: f64,
        download_time: f64,
        slack_time: f64,
        size: u64,
        kind: ChunkType,
        previous_request: Option<f64>,
    ) -> Self {
        let start = request_time + first_byte_wait_time;
        Self {
            request_time,
            first_byte_wait_time,
            download_time,
            slack_time,
            duration_time: previous_request.map_or(0.0, |prev| request_time - prev),
            size,
            start,
            end: start + download_time,
            kind,
        }
    }
}
