//! Per-connection chunk detection.
//!
//! A [`Flow`] accumulates the cycle currently being downloaded and keeps the
//! cycles that completed with enough payload. [`FlowTable`] maps both
//! directions of a host pair onto the same flow.

mod table;

use std::net::IpAddr;

use serde::Serialize;

use crate::chunk::{Chunk, ChunkType};

pub use table::{FlowKey, FlowTable};

/// Bidirectional accumulator for one host pair.
#[derive(Debug, Clone, Serialize)]
pub struct Flow {
    /// First endpoint as first observed
    pub src: IpAddr,
    /// Second endpoint as first observed
    pub dst: IpAddr,
    /// Completed chunks in temporal order
    pub chunks: Vec<Chunk>,
    #[serde(skip)]
    current: Chunk,
    #[serde(skip)]
    downloading: bool,
}

impl Flow {
    pub fn new(src: IpAddr, dst: IpAddr) -> Self {
        Self {
            src,
            dst,
            chunks: Vec::new(),
            current: Chunk::new(0.0),
            downloading: false,
        }
    }

    /// The cycle being accumulated.
    pub fn current(&self) -> &Chunk {
        &self.current
    }

    /// Whether the current cycle has received its first inbound byte.
    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    /// Handle an outbound request at `next_request_time`.
    ///
    /// The current cycle is kept only if its payload exceeds `min_payload`.
    /// Either way a fresh cycle starts at `next_request_time`. Returns `true`
    /// when a chunk was appended.
    pub fn close_chunk(&mut self, next_request_time: f64, min_payload: u64) -> bool {
        let mut finished =
            std::mem::replace(&mut self.current, Chunk::new(next_request_time));
        self.downloading = false;

        if finished.size <= min_payload {
            return false;
        }

        finished.download_time = finished.end - finished.start;
        finished.slack_time = next_request_time - finished.end;
        finished.duration_time = next_request_time - finished.request_time;
        self.chunks.push(finished);
        true
    }

    /// Handle an inbound data packet.
    pub fn absorb(&mut self, time: f64, payload: u64) {
        if !self.downloading {
            self.downloading = true;
            self.current.start = time;
            self.current.first_byte_wait_time = time - self.current.request_time;
        }
        self.current.size = self.current.size.saturating_add(payload);
        self.current.end = time;
    }

    /// Label chunks above the flow's mean size as video, the rest as audio.
    pub fn classify(&mut self) {
        if self.chunks.is_empty() {
            return;
        }

        let total: u128 = self.chunks.iter().map(|c| u128::from(c.size)).sum();
        let mean = total as f64 / self.chunks.len() as f64;

        for chunk in &mut self.chunks {
            chunk.kind = if chunk.size as f64 > mean {
                ChunkType::Video
            } else {
                ChunkType::Audio
            };
        }
    }

    /// Count of chunks with the given tag.
    pub fn count_of(&self, kind: ChunkType) -> usize {
        self.chunks.iter().filter(|c| c.kind == kind).count()
    }

    /// Total payload across completed chunks, saturating at `u64::MAX`.
    pub fn total_bytes(&self) -> u64 {
        self.chunks
            .iter()
            .fold(0u64, |total, c| total.saturating_add(c.size))
    }
}
