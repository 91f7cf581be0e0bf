//! Video Stream Chunker
//!
//! Reconstructs per-connection request/response cycles ("chunks") from an
//! ordered packet trace of streaming-video traffic, classifies them as audio
//! or video, and persists them in a line-oriented text format.
//!
//! # Module Structure
//!
//! - [`packet`] - Decoded packet records and the packet listing reader
//! - [`chunk`] - Chunk value type and classification tags
//! - [`flow`] - Per-flow chunk state machine and the flow table
//! - [`segment`] - Segmentation engine
//! - [`chunkfile`] - Chunk file writer and tolerant parser
//! - [`batch`] - Parallel directory driver
//! - [`config`] - User configuration

pub mod batch;
pub mod chunk;
pub mod chunkfile;
pub mod cli;
pub mod config;
pub mod error;
pub mod flow;
pub mod packet;
pub mod segment;

pub use chunk::{Chunk, ChunkType, MIN_CHUNK_PAYLOAD};
pub use chunkfile::{load_table, parse_table, save_table, ParseDefect, ParsedTable};
pub use config::Config;
pub use error::{Error, Result};
pub use flow::{Flow, FlowKey, FlowTable};
pub use packet::{PacketView, Transport};
pub use segment::{segment, SegmentConfig, SegmentStats, Segmenter, TraceContext};
