//! Inbound message seam.
//!
//! A transport hands the pump one message at a time and carries replies
//! back to wherever the message came from. The concrete transport is
//! chosen at bootstrap; tests script one in memory.

use async_trait::async_trait;
use thiserror::Error;

use leavebot_core::UserId;

/// One message received from the chat surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub user: UserId,
    pub channel_id: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to receive from chat transport: {0}")]
    Receive(String),
    #[error("failed to send reply: {0}")]
    Reply(String),
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// The next inbound message, or `None` once the transport is
    /// closed. Returning `None` shuts the pump down cleanly.
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, TransportError>;

    /// Sends `text` back to the channel the message arrived on.
    async fn reply(&self, message: &InboundMessage, text: &str) -> Result<(), TransportError>;
}

/// Transport that never produces a message. Default wiring until a real
/// chat backend is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopChatTransport;

#[async_trait]
impl ChatTransport for NoopChatTransport {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, TransportError> {
        Ok(None)
    }

    async fn reply(&self, _message: &InboundMessage, _text: &str) -> Result<(), TransportError> {
        Ok(())
    }
}
