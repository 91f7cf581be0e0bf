//! Error types for segmentation and chunk file I/O.

use std::path::PathBuf;

/// Errors surfaced to callers of the library.
///
/// Per-packet and per-line problems are recovered internally (see
/// [`crate::segment::SkipReason`] and [`crate::chunkfile::ParseDefect`]) and
/// never show up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed trace: {0}")]
    MalformedTrace(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt packet listing {} at line {line}: {source}", path.display())]
    PacketListing {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
