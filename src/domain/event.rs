//! Opaque, pre-serialized events carried by the broadcast hub.
//!
//! Producers turn whatever they want to announce into an [`Event`] once;
//! the hub and the sessions only ever clone and forward the encoded text.
//! Cloning shares the underlying buffer, so fan-out to many subscribers
//! does not copy the payload.

use axum::extract::ws::{Message, Utf8Bytes};
use serde::Serialize;

use crate::error::GatewayError;

/// A single JSON text frame destined for every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event(Utf8Bytes);

impl Event {
    /// Serializes `value` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if `value` cannot be serialized.
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, GatewayError> {
        let text = serde_json::to_string(value)?;
        Ok(Self(Utf8Bytes::from(text)))
    }

    /// Wraps already encoded text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(Utf8Bytes::from(text.into()))
    }

    /// Returns the encoded payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Converts the event into a WebSocket text message.
    #[must_use]
    pub fn into_message(self) -> Message {
        Message::Text(self.0)
    }
}
