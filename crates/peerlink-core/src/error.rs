//! Error types for peerlink

use thiserror::Error;

/// Result type alias for peerlink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Peerlink protocol error types
///
/// Every variant is local to the frame or payload in question; none of
/// them is fatal to the connection or the process.
#[derive(Error, Debug)]
pub enum Error {
    /// Message kind name or code not part of the protocol
    #[error("unknown message kind: {0}")]
    UnknownMessageKind(String),

    /// Frame bytes are truncated, carry an unrecognized type tag, or
    /// declare a length that disagrees with the buffer
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Encoded frame exceeds the per-frame transport ceiling
    #[error("frame too large: {0} bytes (max 16384)")]
    FrameTooLarge(usize),

    /// Envelope could not be encoded
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Chunk declares a total that conflicts with the open buffer for
    /// the same parent identifier
    #[error("conflicting chunk total for {parent}: buffer expects {expected}, chunk declares {got}")]
    InconsistentChunkMetadata {
        parent: String,
        expected: u32,
        got: u32,
    },

    /// Chunk sequence index falls outside the declared total
    #[error("chunk index {index} out of range (total {total})")]
    ChunkIndexOutOfRange { index: u32, total: u32 },

    /// Configuration value fails a type/range check
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::EncodeError(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::MalformedFrame(e.to_string())
    }
}
