//! Peerlink Core
//!
//! Core vocabulary and data-handling primitives for the peerlink
//! peer-to-peer real-time communication client.
//!
//! This crate provides:
//! - Signaling message taxonomy ([`MessageKind`], [`ClientMessageKind`], [`ServerMessageKind`])
//! - Wire envelope encoding/decoding ([`Envelope`], [`codec`])
//! - Chunk split and reassembly for oversized payloads ([`chunk`])
//! - Client configuration ([`PeerConfig`])

use std::time::Duration;

pub mod chunk;
pub mod codec;
pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use chunk::{split, ChunkDescriptor, Reassembler};
pub use codec::{decode, encode};
pub use config::{IceServer, PeerConfig, TransportPolicy};
pub use error::{Error, Result};
pub use types::{ChunkMeta, ClientMessageKind, Envelope, MessageKind, ServerMessageKind};
pub use value::Value;

/// Protocol version
pub const PROTOCOL_VERSION: u8 = 1;

/// Hard per-frame ceiling imposed by the transport (16 KiB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024;

/// Default per-chunk data cap, leaving envelope headroom below
/// [`MAX_FRAME_SIZE`]
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 16_300;

/// Default inactivity bound after which a partial reassembly is reclaimed
pub const DEFAULT_REASSEMBLY_TTL: Duration = Duration::from_secs(30);
