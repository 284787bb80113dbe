//! Inbound event decoding.
//!
//! Every stream message is a JSON object tagged by `type`. Decoding is a pure
//! step: one text message in, exactly one [`Event`] or one [`DecodeError`]
//! out. Callers drop failed messages and keep going.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use maze::{MazeSnapshot, MazeVariant, SnapshotError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const KIND_LOG: &str = "log";
pub const KIND_MAZE: &str = "maze";
pub const KIND_CONNECTION_STATUS: &str = "connection_status";

/// Error returned by [`Decoder::decode`]. Neither variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Bad JSON, a non-object message, or a missing/mistyped field.
    #[error("malformed event: {0}")]
    Malformed(String),
    /// Well-formed message whose `type` is not one we handle.
    #[error("unknown event kind: {0}")]
    UnknownKind(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<SnapshotError> for DecodeError {
    fn from(err: SnapshotError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// One line of the rover log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: String,
    pub message: String,
}

/// A decoded server push.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Log(LogEntry),
    /// Complete replacement maze state.
    Maze(MazeSnapshot),
    ConnectionStatus { connected: bool },
}

impl Event {
    /// Wire tag this event was decoded from.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Log(_) => KIND_LOG,
            Self::Maze(_) => KIND_MAZE,
            Self::ConnectionStatus { .. } => KIND_CONNECTION_STATUS,
        }
    }
}

#[derive(Deserialize)]
struct ConnectionStatusPayload {
    connected: bool,
}

/// Stateless decoder bound to the session's maze representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decoder {
    variant: MazeVariant,
}

impl Decoder {
    #[must_use]
    pub fn new(variant: MazeVariant) -> Self {
        Self { variant }
    }

    #[must_use]
    pub fn variant(&self) -> MazeVariant {
        self.variant
    }

    /// Decode one raw stream message.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] for invalid JSON, non-object
    /// messages, a missing `type` tag, or payload fields that are missing or
    /// mistyped. Returns [`DecodeError::UnknownKind`] for any other tag.
    pub fn decode(&self, text: &str) -> Result<Event, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        let Some(kind) = value.get("type").and_then(Value::as_str).map(ToOwned::to_owned) else {
            return Err(DecodeError::Malformed("missing string field `type`".to_owned()));
        };

        match kind.as_str() {
            KIND_LOG => Ok(Event::Log(serde_json::from_value(value)?)),
            KIND_MAZE => Ok(Event::Maze(MazeSnapshot::decode(self.variant, value)?)),
            KIND_CONNECTION_STATUS => {
                let ConnectionStatusPayload { connected } = serde_json::from_value(value)?;
                Ok(Event::ConnectionStatus { connected })
            }
            other => Err(DecodeError::UnknownKind(other.to_owned())),
        }
    }
}
