//! Wire model for the rover controller's streaming and REST endpoints.
//!
//! This crate owns the JSON shapes exchanged with the remote controller:
//! inbound stream events (decoded into [`Event`]), outbound user commands
//! ([`Command`]), and the REST payloads used to seed a session. It performs
//! no I/O.

pub mod command;
pub mod event;
pub mod rest;

pub use command::Command;
pub use event::{DecodeError, Decoder, Event, LogEntry};
pub use rest::{ConnectionStatusResponse, LogsResponse};
