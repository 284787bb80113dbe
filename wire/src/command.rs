//! Outbound user commands.
//!
//! Serialised as `{"type": "<kind>", ...}`. Sending is fire-and-forget; the
//! controller never acknowledges a command.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Start,
    Stop,
    /// Free-text message relayed to the rover.
    Message { message: String },
    /// Select a maze from the controller's history.
    MazeId { maze_id: String },
}

impl Command {
    /// Encode as the JSON text frame sent on the stream.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors; none occur for these string-only shapes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Message { .. } => "message",
            Self::MazeId { .. } => "maze_id",
        }
    }
}
