//! Notification delivery for alerts
//!
//! Every channel reports a plain success flag. Configuration gaps and
//! transport failures are logged at the channel boundary and never
//! propagate.

use async_trait::async_trait;

use crate::models::AlertMessage;

/// A pluggable alert sender
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Short channel name used in logs
    fn channel_type(&self) -> &'static str;

    /// Deliver `message` to every recipient, returning whether it succeeded
    async fn deliver(&self, message: &AlertMessage, recipients: &[String]) -> bool;
}

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Channel settings are missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A sender or recipient address could not be parsed
    #[error("Invalid address: {0}")]
    Address(String),

    /// The message could not be built or handed to the server
    #[error("Transport error: {0}")]
    Transport(String),

    /// The messaging API request failed or was rejected
    #[error("HTTP error: {0}")]
    Http(String),
}
