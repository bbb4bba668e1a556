//! Signaling message taxonomy and wire envelope
//!
//! The message kinds exchanged with the signaling server are a closed
//! set, partitioned into client-originated and server-originated
//! families. Every kind carries a stable numeric code and a canonical
//! wire name; both appear in logs and wire traces, so neither may change
//! within a protocol version.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Messages sent from client to signaling server
///
/// Codes occupy 0x01-0x0E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClientMessageKind {
    SendOffer = 0x01,
    SendAnswer = 0x02,
    SendCandidate = 0x03,
    SendLeave = 0x04,
    RoomJoin = 0x05,
    RoomLeave = 0x06,
    RoomGetLogs = 0x07,
    RoomGetUsers = 0x08,
    RoomSendData = 0x09,
    SfuGetOffer = 0x0A,
    SfuAnswer = 0x0B,
    SfuCandidate = 0x0C,
    Ping = 0x0D,
    UpdateCredential = 0x0E,
}

/// Messages sent from signaling server to client
///
/// Codes occupy 0x40-0x4C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServerMessageKind {
    Open = 0x40,
    Error = 0x41,
    Offer = 0x42,
    Answer = 0x43,
    Candidate = 0x44,
    Leave = 0x45,
    AuthExpiresIn = 0x46,
    RoomLogs = 0x47,
    RoomUsers = 0x48,
    RoomData = 0x49,
    RoomUserJoin = 0x4A,
    RoomUserLeave = 0x4B,
    SfuOffer = 0x4C,
}

impl ClientMessageKind {
    /// Every client-originated kind, in code order
    pub const ALL: [ClientMessageKind; 14] = [
        ClientMessageKind::SendOffer,
        ClientMessageKind::SendAnswer,
        ClientMessageKind::SendCandidate,
        ClientMessageKind::SendLeave,
        ClientMessageKind::RoomJoin,
        ClientMessageKind::RoomLeave,
        ClientMessageKind::RoomGetLogs,
        ClientMessageKind::RoomGetUsers,
        ClientMessageKind::RoomSendData,
        ClientMessageKind::SfuGetOffer,
        ClientMessageKind::SfuAnswer,
        ClientMessageKind::SfuCandidate,
        ClientMessageKind::Ping,
        ClientMessageKind::UpdateCredential,
    ];

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessageKind::SendOffer => "SEND_OFFER",
            ClientMessageKind::SendAnswer => "SEND_ANSWER",
            ClientMessageKind::SendCandidate => "SEND_CANDIDATE",
            ClientMessageKind::SendLeave => "SEND_LEAVE",
            ClientMessageKind::RoomJoin => "ROOM_JOIN",
            ClientMessageKind::RoomLeave => "ROOM_LEAVE",
            ClientMessageKind::RoomGetLogs => "ROOM_GET_LOGS",
            ClientMessageKind::RoomGetUsers => "ROOM_GET_USERS",
            ClientMessageKind::RoomSendData => "ROOM_SEND_DATA",
            ClientMessageKind::SfuGetOffer => "SFU_GET_OFFER",
            ClientMessageKind::SfuAnswer => "SFU_ANSWER",
            ClientMessageKind::SfuCandidate => "SFU_CANDIDATE",
            ClientMessageKind::Ping => "PING",
            ClientMessageKind::UpdateCredential => "UPDATE_CREDENTIAL",
        }
    }

    /// Numeric wire code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x01 => Some(ClientMessageKind::SendOffer),
            0x02 => Some(ClientMessageKind::SendAnswer),
            0x03 => Some(ClientMessageKind::SendCandidate),
            0x04 => Some(ClientMessageKind::SendLeave),
            0x05 => Some(ClientMessageKind::RoomJoin),
            0x06 => Some(ClientMessageKind::RoomLeave),
            0x07 => Some(ClientMessageKind::RoomGetLogs),
            0x08 => Some(ClientMessageKind::RoomGetUsers),
            0x09 => Some(ClientMessageKind::RoomSendData),
            0x0A => Some(ClientMessageKind::SfuGetOffer),
            0x0B => Some(ClientMessageKind::SfuAnswer),
            0x0C => Some(ClientMessageKind::SfuCandidate),
            0x0D => Some(ClientMessageKind::Ping),
            0x0E => Some(ClientMessageKind::UpdateCredential),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ClientMessageKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl ServerMessageKind {
    /// Every server-originated kind, in code order
    pub const ALL: [ServerMessageKind; 13] = [
        ServerMessageKind::Open,
        ServerMessageKind::Error,
        ServerMessageKind::Offer,
        ServerMessageKind::Answer,
        ServerMessageKind::Candidate,
        ServerMessageKind::Leave,
        ServerMessageKind::AuthExpiresIn,
        ServerMessageKind::RoomLogs,
        ServerMessageKind::RoomUsers,
        ServerMessageKind::RoomData,
        ServerMessageKind::RoomUserJoin,
        ServerMessageKind::RoomUserLeave,
        ServerMessageKind::SfuOffer,
    ];

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            ServerMessageKind::Open => "OPEN",
            ServerMessageKind::Error => "ERROR",
            ServerMessageKind::Offer => "OFFER",
            ServerMessageKind::Answer => "ANSWER",
            ServerMessageKind::Candidate => "CANDIDATE",
            ServerMessageKind::Leave => "LEAVE",
            ServerMessageKind::AuthExpiresIn => "AUTH_EXPIRES_IN",
            ServerMessageKind::RoomLogs => "ROOM_LOGS",
            ServerMessageKind::RoomUsers => "ROOM_USERS",
            ServerMessageKind::RoomData => "ROOM_DATA",
            ServerMessageKind::RoomUserJoin => "ROOM_USER_JOIN",
            ServerMessageKind::RoomUserLeave => "ROOM_USER_LEAVE",
            ServerMessageKind::SfuOffer => "SFU_OFFER",
        }
    }

    /// Numeric wire code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x40 => Some(ServerMessageKind::Open),
            0x41 => Some(ServerMessageKind::Error),
            0x42 => Some(ServerMessageKind::Offer),
            0x43 => Some(ServerMessageKind::Answer),
            0x44 => Some(ServerMessageKind::Candidate),
            0x45 => Some(ServerMessageKind::Leave),
            0x46 => Some(ServerMessageKind::AuthExpiresIn),
            0x47 => Some(ServerMessageKind::RoomLogs),
            0x48 => Some(ServerMessageKind::RoomUsers),
            0x49 => Some(ServerMessageKind::RoomData),
            0x4A => Some(ServerMessageKind::RoomUserJoin),
            0x4B => Some(ServerMessageKind::RoomUserLeave),
            0x4C => Some(ServerMessageKind::SfuOffer),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ServerMessageKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ClientMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ServerMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A message kind from either family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Client(ClientMessageKind),
    Server(ServerMessageKind),
}

impl MessageKind {
    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::Client(kind) => kind.name(),
            MessageKind::Server(kind) => kind.name(),
        }
    }

    /// Numeric wire code
    pub fn code(&self) -> u8 {
        match self {
            MessageKind::Client(kind) => kind.code(),
            MessageKind::Server(kind) => kind.code(),
        }
    }

    /// Resolve a kind from its wire code
    pub fn from_code(code: u8) -> Result<Self> {
        ClientMessageKind::from_u8(code)
            .map(MessageKind::Client)
            .or_else(|| ServerMessageKind::from_u8(code).map(MessageKind::Server))
            .ok_or_else(|| Error::UnknownMessageKind(format!("0x{code:02x}")))
    }

    /// Resolve a kind from its canonical name
    pub fn from_name(name: &str) -> Result<Self> {
        ClientMessageKind::from_name(name)
            .map(MessageKind::Client)
            .or_else(|| ServerMessageKind::from_name(name).map(MessageKind::Server))
            .ok_or_else(|| Error::UnknownMessageKind(name.to_string()))
    }

    pub fn is_client(&self) -> bool {
        matches!(self, MessageKind::Client(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, MessageKind::Server(_))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for MessageKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for MessageKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        MessageKind::from_code(code).map_err(serde::de::Error::custom)
    }
}

/// Ordering metadata carried by one fragment of a chunked payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    /// Correlation token shared by every chunk of one payload
    pub parent: String,
    /// 0-based, contiguous sequence index
    pub index: u32,
    /// Declared chunk count for the whole payload
    pub total: u32,
}

/// One discrete unit of binary data placed on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message kind code
    pub kind: MessageKind,
    /// Application or signaling payload
    pub payload: Value,
    /// Present only on fragments of a chunked payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkMeta>,
}

impl Envelope {
    /// Create an envelope with no chunk metadata
    pub fn new(kind: MessageKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            chunk: None,
        }
    }

    /// Attach chunk metadata
    pub fn with_chunk(mut self, meta: ChunkMeta) -> Self {
        self.chunk = Some(meta);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_code_roundtrip_client() {
        for kind in ClientMessageKind::ALL {
            assert_eq!(ClientMessageKind::from_u8(kind.code()), Some(kind));
            assert_eq!(ClientMessageKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_name_code_roundtrip_server() {
        for kind in ServerMessageKind::ALL {
            assert_eq!(ServerMessageKind::from_u8(kind.code()), Some(kind));
            assert_eq!(ServerMessageKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_codes_unique_across_families() {
        let mut codes: Vec<u8> = ClientMessageKind::ALL.iter().map(|k| k.code()).collect();
        codes.extend(ServerMessageKind::ALL.iter().map(|k| k.code()));
        let len = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), len);
    }

    #[test]
    fn test_names_unique_across_families() {
        let mut names: Vec<&str> = ClientMessageKind::ALL.iter().map(|k| k.name()).collect();
        names.extend(ServerMessageKind::ALL.iter().map(|k| k.name()));
        let len = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = MessageKind::from_name("NOT_A_KIND").unwrap_err();
        assert!(matches!(err, Error::UnknownMessageKind(_)));
    }

    #[test]
    fn test_unknown_code_fails() {
        assert!(MessageKind::from_code(0xFF).is_err());
        assert!(MessageKind::from_code(0x00).is_err());
    }

    #[test]
    fn test_kind_resolution_partition() {
        let kind = MessageKind::from_name("ROOM_SEND_DATA").unwrap();
        assert!(kind.is_client());
        let kind = MessageKind::from_name("ROOM_DATA").unwrap();
        assert!(kind.is_server());
    }
}
