//! Segmentation engine: ordered packets in, classified flow table out.
//!
//! Packets are processed strictly in capture order. For every eligible
//! packet the engine resolves its flow, decides whether it travels from the
//! client (a request) or towards it (a response), and drives the flow's
//! chunk state machine. After the last packet, flows without chunks are
//! pruned and the rest are classified.
//!
//! The client address and the trace start time come from the first packet
//! and are carried explicitly in a [`TraceContext`].

mod config;

use std::net::IpAddr;

use crate::error::{Error, Result};
use crate::flow::FlowTable;
use crate::packet::{is_local_address, PacketView};

pub use config::{SegmentConfig, QUIC_PORT, REQUEST_MIN_PAYLOAD};

/// Per-trace identity inferred from the first packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceContext {
    /// Address treated as the streaming client
    pub client: IpAddr,
    /// Capture time that maps to relative time 0
    pub start_time: f64,
}

impl TraceContext {
    pub fn new(client: IpAddr, start_time: f64) -> Self {
        Self { client, start_time }
    }

    /// Client is the first packet's source, start is its timestamp.
    pub fn from_first_packet(packets: &[PacketView]) -> Result<Self> {
        let first = packets
            .first()
            .ok_or_else(|| Error::MalformedTrace("trace contains no packets".to_string()))?;
        let client = first.src.ok_or_else(|| {
            Error::MalformedTrace("first packet has no network-layer source".to_string())
        })?;
        Ok(Self::new(client, first.ts))
    }
}

/// Which side sent a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the client towards the server
    Outbound,
    /// From the server towards the client
    Inbound,
}

/// Why a packet was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither TCP nor UDP on the streaming port
    UnsupportedPacket,
    /// No source or destination address
    MissingAddress,
}

/// Counters collected during one segmentation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub packets: usize,
    pub unsupported: usize,
    pub missing_address: usize,
    /// Outbound packets that opened a new cycle
    pub requests: usize,
    /// Outbound packets below the request threshold
    pub ignored_outbound: usize,
    /// Inbound packets added to a cycle
    pub absorbed: usize,
    pub chunks: usize,
    pub pruned_flows: usize,
}

impl SegmentStats {
    pub fn skipped(&self) -> usize {
        self.unsupported + self.missing_address
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::UnsupportedPacket => self.unsupported += 1,
            SkipReason::MissingAddress => self.missing_address += 1,
        }
    }
}

/// Single-threaded chunk detector for one trace at a time.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentConfig,
}

impl Segmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Segment a trace. Fails with [`Error::MalformedTrace`] if the trace is
    /// empty or its first packet has no source address.
    pub fn segment(&self, packets: &[PacketView]) -> Result<FlowTable> {
        self.segment_with_stats(packets).map(|(table, _)| table)
    }

    pub fn segment_with_stats(&self, packets: &[PacketView]) -> Result<(FlowTable, SegmentStats)> {
        let context = TraceContext::from_first_packet(packets)?;
        Ok(self.segment_with_context(packets, context))
    }

    /// Segment with an explicitly supplied client identity and start time.
    pub fn segment_with_context(
        &self,
        packets: &[PacketView],
        context: TraceContext,
    ) -> (FlowTable, SegmentStats) {
        let mut table = FlowTable::new();
        let mut stats = SegmentStats {
            packets: packets.len(),
            ..SegmentStats::default()
        };

        for (index, packet) in packets.iter().enumerate() {
            let (src, dst) = match self.admit(packet) {
                Ok(endpoints) => endpoints,
                Err(reason) => {
                    tracing::trace!(index, ?reason, "skipping packet");
                    stats.record_skip(reason);
                    continue;
                }
            };

            let time = packet.ts - context.start_time;
            let flow = table.lookup_or_create(src, dst);

            match direction(src, &context) {
                Direction::Outbound if packet.len > self.config.request_min_payload => {
                    stats.requests += 1;
                    if flow.close_chunk(time, self.config.min_chunk_payload) {
                        stats.chunks += 1;
                    }
                }
                Direction::Outbound => stats.ignored_outbound += 1,
                Direction::Inbound => {
                    stats.absorbed += 1;
                    flow.absorb(time, packet.len);
                }
            }
        }

        stats.pruned_flows = table.finish();

        tracing::debug!(
            packets = stats.packets,
            skipped = stats.skipped(),
            requests = stats.requests,
            chunks = stats.chunks,
            flows = table.len(),
            pruned = stats.pruned_flows,
            "segmented trace"
        );

        (table, stats)
    }

    fn admit(&self, packet: &PacketView) -> Result<(IpAddr, IpAddr), SkipReason> {
        if !packet.is_streaming_transport(self.config.quic_port) {
            return Err(SkipReason::UnsupportedPacket);
        }
        packet.endpoints().ok_or(SkipReason::MissingAddress)
    }
}

/// A packet is outbound if it comes from a local address or from the client.
pub fn direction(src: IpAddr, context: &TraceContext) -> Direction {
    if is_local_address(&src) || src == context.client {
        Direction::Outbound
    } else {
        Direction::Inbound
    }
}

/// Segment a trace with the default thresholds.
pub fn segment(packets: &[PacketView]) -> Result<FlowTable> {
    Segmenter::default().segment(packets)
}
