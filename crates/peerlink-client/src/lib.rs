//! Peerlink Client Library
//!
//! Client-side glue over the peerlink protocol core: peer identifier
//! and API key utilities, transport capability detection, and the data
//! pipeline that chunks outbound payloads and reassembles inbound ones.
//!
//! # Example
//!
//! ```ignore
//! use peerlink_client::prelude::*;
//! use peerlink_core::PeerConfig;
//!
//! let config = PeerConfig::default();
//! let (pipeline, mut deliveries) = Pipeline::new(&config);
//!
//! // outbound: one oversized payload becomes several wire frames
//! let frames = pipeline.encode_outbound(payload)?;
//!
//! // inbound: frames from the wire, reassembled payloads out the channel
//! pipeline.ingest(&frame)?;
//! while let Some(event) = deliveries.recv().await { /* ... */ }
//! ```

pub mod capability;
pub mod error;
pub mod ident;
pub mod pipeline;

pub use capability::{detect, RtcSupport};
pub use error::{ClientError, Result};
pub use pipeline::{InboundEvent, Pipeline};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::capability::{detect, RtcSupport};
    pub use crate::error::{ClientError, Result};
    pub use crate::ident::{random_id, random_token, validate_api_key, validate_peer_id};
    pub use crate::pipeline::{InboundEvent, Pipeline};
    pub use peerlink_core::{Envelope, MessageKind, PeerConfig, Value};
}
