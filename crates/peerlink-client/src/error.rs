//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Core protocol error
    #[error("protocol error: {0}")]
    Protocol(#[from] peerlink_core::Error),

    /// The application dropped its end of the delivery channel
    #[error("delivery channel closed")]
    ChannelClosed,
}
