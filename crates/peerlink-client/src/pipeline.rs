//! Data pipeline over one signaling connection
//!
//! Wires the taxonomy, codec, and chunker together. Outbound payloads
//! are split and enveloped into ready-to-send wire frames; inbound
//! frames are decoded, classified by kind, and chunked data is
//! reassembled before delivery. Completed payloads are handed to the
//! application through a bounded channel so a slow consumer cannot
//! stall the ingestion path.
//!
//! Frame-local failures (undecodable bytes, conflicting chunk metadata)
//! are logged and dropped; they never tear down the connection.

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use peerlink_core::{
    chunk, codec, ClientMessageKind, Envelope, MessageKind, PeerConfig, Reassembler,
    ServerMessageKind, Value,
};

use crate::error::{ClientError, Result};

/// Capacity of the completed-delivery channel
const DELIVERY_BACKLOG: usize = 64;

/// A frame classified for the session layer
#[derive(Debug)]
pub enum InboundEvent {
    /// Fully reassembled application payload from a room peer
    Data(Bytes),
    /// Signaling message for the session layer to act on
    Signal(Envelope),
}

/// Data pipeline over one signaling connection
pub struct Pipeline {
    max_chunk_size: usize,
    reassembler: Reassembler,
    deliveries: mpsc::Sender<InboundEvent>,
}

impl Pipeline {
    /// Build a pipeline and the receiving end of its delivery channel
    pub fn new(config: &PeerConfig) -> (Self, mpsc::Receiver<InboundEvent>) {
        let (deliveries, rx) = mpsc::channel(DELIVERY_BACKLOG);
        (
            Self {
                max_chunk_size: config.max_chunk_size,
                reassembler: Reassembler::new(),
                deliveries,
            },
            rx,
        )
    }

    /// Envelope and encode one outbound payload into wire frames
    ///
    /// Payloads over the chunk cap are split; each fragment rides its
    /// own ROOM_SEND_DATA envelope carrying the shared parent
    /// identifier.
    pub fn encode_outbound(&self, payload: Bytes) -> Result<Vec<Bytes>> {
        let chunks = chunk::split(payload, self.max_chunk_size);
        let mut frames = Vec::with_capacity(chunks.len());
        for part in chunks {
            let mut envelope = Envelope::new(
                MessageKind::Client(ClientMessageKind::RoomSendData),
                Value::Bytes(part.data.to_vec()),
            );
            envelope.chunk = part.meta;
            frames.push(codec::encode(&envelope)?);
        }
        Ok(frames)
    }

    /// Envelope and encode one outbound signaling message
    ///
    /// Accepts any JSON-shaped payload, e.g. an SDP offer object.
    pub fn encode_signal(
        &self,
        kind: ClientMessageKind,
        payload: serde_json::Value,
    ) -> Result<Bytes> {
        let envelope = Envelope::new(MessageKind::Client(kind), Value::from(payload));
        Ok(codec::encode(&envelope)?)
    }

    /// Ingest one wire frame
    ///
    /// The only error surfaced is a severed delivery channel; anything
    /// wrong with the frame itself is dropped locally.
    pub fn ingest(&self, frame: &[u8]) -> Result<()> {
        let envelope = match codec::decode(frame) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "dropping undecodable frame");
                return Ok(());
            }
        };

        let kind = match envelope.kind {
            MessageKind::Server(kind) => kind,
            MessageKind::Client(kind) => {
                warn!(kind = %kind, "dropping client-originated kind arriving inbound");
                return Ok(());
            }
        };

        match kind {
            ServerMessageKind::RoomData => self.ingest_data(envelope),
            ServerMessageKind::Open
            | ServerMessageKind::Error
            | ServerMessageKind::Offer
            | ServerMessageKind::Answer
            | ServerMessageKind::Candidate
            | ServerMessageKind::Leave
            | ServerMessageKind::AuthExpiresIn
            | ServerMessageKind::RoomLogs
            | ServerMessageKind::RoomUsers
            | ServerMessageKind::RoomUserJoin
            | ServerMessageKind::RoomUserLeave
            | ServerMessageKind::SfuOffer => self.deliver(InboundEvent::Signal(envelope)),
        }
    }

    fn ingest_data(&self, envelope: Envelope) -> Result<()> {
        let Value::Bytes(data) = envelope.payload else {
            warn!("dropping ROOM_DATA frame with non-binary payload");
            return Ok(());
        };
        let data = Bytes::from(data);

        match envelope.chunk {
            None => self.deliver(InboundEvent::Data(data)),
            Some(meta) => match self.reassembler.accept(&meta, data) {
                Ok(Some(payload)) => {
                    debug!(parent = %meta.parent, bytes = payload.len(), "delivering reassembled payload");
                    self.deliver(InboundEvent::Data(payload))
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    warn!(error = %e, "dropping in-flight chunked payload");
                    Ok(())
                }
            },
        }
    }

    /// Fire-and-forget handoff to the application
    fn deliver(&self, event: InboundEvent) -> Result<()> {
        match self.deliveries.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("application is lagging, dropping delivery");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ClientError::ChannelClosed),
        }
    }

    /// In-flight partial reassemblies, for diagnostics
    pub fn pending_reassemblies(&self) -> usize {
        self.reassembler.pending()
    }

    /// Reclaim partial reassemblies idle past the inactivity bound
    pub fn evict_stale(&self) -> usize {
        self.reassembler.evict_stale()
    }
}
