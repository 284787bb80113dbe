//! REST payloads used to seed a session before the stream opens.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use serde::{Deserialize, Serialize};

use crate::event::LogEntry;

/// `GET /logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

/// `GET /connection_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatusResponse {
    pub connected: bool,
}
