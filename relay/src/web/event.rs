//! Inbound Parakey webhook payloads.

use axum::body::Bytes;
use serde_json::Value;

use crate::error::{RelayError, RelayResult};

/// Event kind that triggers a disarm.
pub const DOOR_UNLOCKED: &str = "door_unlocked";

/// Request body as handed to the webhook handler.
#[derive(Debug, Clone)]
pub enum InboundBody {
    /// Undecoded bytes straight off the wire.
    Raw(Bytes),
    /// A value that has already been parsed upstream.
    Decoded(Value),
}

impl InboundBody {
    /// Parse raw bodies; decoded values pass through untouched.
    pub fn decode(self) -> RelayResult<InboundEvent> {
        match self {
            Self::Raw(bytes) => serde_json::from_slice(&bytes)
                .map(InboundEvent)
                .map_err(RelayError::MalformedBody),
            Self::Decoded(value) => Ok(InboundEvent(value)),
        }
    }
}

impl From<Bytes> for InboundBody {
    fn from(bytes: Bytes) -> Self {
        Self::Raw(bytes)
    }
}

impl From<Value> for InboundBody {
    fn from(value: Value) -> Self {
        Self::Decoded(value)
    }
}

/// A decoded webhook payload. Only `event` is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent(pub Value);

impl InboundEvent {
    /// The `event` field, if present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("event").and_then(Value::as_str)
    }

    pub fn is_door_unlocked(&self) -> bool {
        self.kind() == Some(DOOR_UNLOCKED)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }
}
