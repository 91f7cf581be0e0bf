//! Chunk file format: persisted text rendering of a [`FlowTable`].
//!
//! One block per flow, terminated by a blank line:
//!
//! ```text
//! Source IP: 192.168.1.20, Destination IP: 93.184.216.34
//!   GET: 0.52, TTFB: 0.031, down: 1.2, slack: 0.4, size: 412000, type: VIDEO
//!   GET: 2.12, TTFB: 0.029, down: 0.3, slack: 1.1, size: 96000, type: AUDIO
//!
//! ```
//!
//! Loading never fails on content: unrecognized lines are skipped and
//! reported as [`ParseDefect`]s, so a damaged file yields partial data.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::net::IpAddr;
use std::path::Path;

use crate::chunk::{Chunk, ChunkType};
use crate::error::{Error, Result};
use crate::flow::FlowTable;

const HEADER_PREFIX: &str = "Source IP: ";
const HEADER_SEPARATOR: &str = ", Destination IP: ";
const CHUNK_LABELS: [&str; 6] = ["GET", "TTFB", "down", "slack", "size", "type"];

/// Why a line was skipped while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectKind {
    /// Looks like a flow header but the addresses do not parse
    MalformedHeader,
    /// Neither a header nor a valid chunk line
    MalformedChunk,
    /// Valid chunk line with no flow header above it
    OrphanChunk,
}

/// A skipped line in a chunk file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDefect {
    /// 1-based line number
    pub line: usize,
    pub kind: DefectKind,
}

impl std::fmt::Display for ParseDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            DefectKind::MalformedHeader => "malformed flow header",
            DefectKind::MalformedChunk => "unrecognized line",
            DefectKind::OrphanChunk => "chunk outside any flow",
        };
        write!(f, "line {}: {}", self.line, what)
    }
}

/// Result of loading a chunk file.
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub table: FlowTable,
    pub defects: Vec<ParseDefect>,
}

/// Chunk file rendering of a table, usable with `{}` formatting.
pub struct ChunkFileDisplay<'a>(pub &'a FlowTable);

impl std::fmt::Display for ChunkFileDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for flow in self.0.flows() {
            writeln!(f, "{}{}{}{}", HEADER_PREFIX, flow.src, HEADER_SEPARATOR, flow.dst)?;
            for chunk in &flow.chunks {
                writeln!(
                    f,
                    "  GET: {}, TTFB: {}, down: {}, slack: {}, size: {}, type: {}",
                    chunk.request_time,
                    chunk.first_byte_wait_time,
                    chunk.download_time,
                    chunk.slack_time,
                    chunk.size,
                    chunk.kind.tag()
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Write a table in chunk file format.
pub fn write_table<W: Write>(table: &FlowTable, writer: &mut W) -> io::Result<()> {
    write!(writer, "{}", ChunkFileDisplay(table))
}

/// Render a table to a string.
pub fn render_table(table: &FlowTable) -> String {
    ChunkFileDisplay(table).to_string()
}

/// Write a table to `path`, replacing any existing file.
pub fn save_table<P: AsRef<Path>>(table: &FlowTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_table(table, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(path, e))
}

/// Read and parse a chunk file. Only I/O failures are errors.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<ParsedTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let parsed = parse_table(&content);
    for defect in &parsed.defects {
        tracing::warn!(path = %path.display(), "skipped {}", defect);
    }
    Ok(parsed)
}

/// Parse chunk file text.
///
/// `start`/`end` and `duration_time` are rebuilt from the stored fields
/// (see [`Chunk::from_persisted`]).
pub fn parse_table(content: &str) -> ParsedTable {
    let mut parsed = ParsedTable::default();
    let mut open: Option<(IpAddr, IpAddr)> = None;
    let mut previous_request: Option<f64> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        if line.starts_with(HEADER_PREFIX) {
            previous_request = None;
            open = parse_header(line);
            match open {
                Some((src, dst)) => {
                    parsed.table.lookup_or_create(src, dst);
                }
                None => parsed.defects.push(ParseDefect {
                    line: line_no,
                    kind: DefectKind::MalformedHeader,
                }),
            }
            continue;
        }

        let Some(chunk) = parse_chunk_line(line, previous_request) else {
            parsed.defects.push(ParseDefect {
                line: line_no,
                kind: DefectKind::MalformedChunk,
            });
            continue;
        };

        let Some((src, dst)) = open else {
            parsed.defects.push(ParseDefect {
                line: line_no,
                kind: DefectKind::OrphanChunk,
            });
            continue;
        };

        previous_request = Some(chunk.request_time);
        parsed.table.lookup_or_create(src, dst).chunks.push(chunk);
    }

    parsed
}

/// Text after the destination address (e.g. `, Port: 443`) is ignored.
fn parse_header(line: &str) -> Option<(IpAddr, IpAddr)> {
    let (src, rest) = line.strip_prefix(HEADER_PREFIX)?.split_once(HEADER_SEPARATOR)?;
    let dst = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()?;
    Some((src.trim().parse().ok()?, dst.parse().ok()?))
}

fn parse_chunk_line(line: &str, previous_request: Option<f64>) -> Option<Chunk> {
    let mut values = [""; 6];
    let mut fields = line.split(", ");
    for (slot, label) in values.iter_mut().zip(CHUNK_LABELS) {
        let (key, value) = fields.next()?.split_once(": ")?;
        if key.trim() != label {
            return None;
        }
        *slot = value.trim();
    }
    if fields.next().is_some() {
        return None;
    }

    let [request, wait, download, slack, size, tag] = values;
    Some(Chunk::from_persisted(
        parse_time(request)?,
        parse_time(wait)?,
        parse_time(download)?,
        parse_time(slack)?,
        size.parse().ok()?,
        ChunkType::from_tag(tag),
        previous_request,
    ))
}

fn parse_time(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
