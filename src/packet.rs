//! Decoded packet records consumed by the segmentation engine.
//!
//! Packets arrive as a JSON-lines listing produced by an external decoder,
//! one [`PacketView`] per line:
//!
//! ```text
//! {"ts":1700000000.25,"transport":"tcp","src":"10.0.0.2","dst":"1.2.3.4","sport":51000,"dport":443,"len":1500}
//! ```

use std::fs;
use std::io::{BufRead, BufReader};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transport header carried by a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
    #[default]
    #[serde(other)]
    Other,
}

/// The fields of a captured packet the engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketView {
    /// Capture timestamp in seconds
    pub ts: f64,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub src: Option<IpAddr>,
    #[serde(default)]
    pub dst: Option<IpAddr>,
    #[serde(default)]
    pub sport: Option<u16>,
    #[serde(default)]
    pub dport: Option<u16>,
    /// Total packet length in bytes
    pub len: u64,
}

impl PacketView {
    pub fn new(ts: f64, transport: Transport, src: IpAddr, dst: IpAddr, len: u64) -> Self {
        Self {
            ts,
            transport,
            src: Some(src),
            dst: Some(dst),
            sport: None,
            dport: None,
            len,
        }
    }

    pub fn tcp(ts: f64, src: IpAddr, dst: IpAddr, len: u64) -> Self {
        Self::new(ts, Transport::Tcp, src, dst, len)
    }

    pub fn udp(ts: f64, src: IpAddr, dst: IpAddr, ports: (u16, u16), len: u64) -> Self {
        Self {
            sport: Some(ports.0),
            dport: Some(ports.1),
            ..Self::new(ts, Transport::Udp, src, dst, len)
        }
    }

    /// Source and destination address, if the packet has a network header.
    pub fn endpoints(&self) -> Option<(IpAddr, IpAddr)> {
        Some((self.src?, self.dst?))
    }

    /// TCP, or UDP to/from the encrypted-streaming port.
    pub fn is_streaming_transport(&self, quic_port: u16) -> bool {
        match self.transport {
            Transport::Tcp => true,
            Transport::Udp => self.sport == Some(quic_port) || self.dport == Some(quic_port),
            Transport::Other => false,
        }
    }
}

/// Private, loopback or link-local address.
pub fn is_local_address(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_local_v4(v4),
        IpAddr::V6(v6) => is_local_v6(v6),
    }
}

fn is_local_v4(addr: &Ipv4Addr) -> bool {
    addr.is_private() || addr.is_loopback() || addr.is_link_local()
}

fn is_local_v6(addr: &Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_local_v4(&v4);
    }
    let first = addr.segments()[0];
    // fe80::/10 link-local, fc00::/7 unique local
    addr.is_loopback() || (first & 0xffc0) == 0xfe80 || (first & 0xfe00) == 0xfc00
}

/// Read a packet listing from a path.
pub fn read_packets<P: AsRef<Path>>(path: P) -> Result<Vec<PacketView>> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| Error::io(path, e))?;
    parse_packets_reader(BufReader::new(file), path)
}

/// Parse a packet listing. `path` only labels errors.
pub fn parse_packets_reader<R: BufRead>(reader: R, path: &Path) -> Result<Vec<PacketView>> {
    let mut packets = Vec::new();
    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let packet = serde_json::from_str(&line).map_err(|source| Error::PacketListing {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        packets.push(packet);
    }
    Ok(packets)
}

/// Parse a packet listing held in memory.
pub fn parse_packets_str(content: &str) -> Result<Vec<PacketView>> {
    parse_packets_reader(BufReader::new(content.as_bytes()), Path::new("<memory>"))
}
