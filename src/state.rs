//! Session state store.
//!
//! DESIGN
//! ======
//! Three independent pieces of live state: the rover's connection flag, the
//! rolling log, and the current maze snapshot. [`SessionStore::apply`] is
//! the only way events reach them, and the dashboard task is the only
//! caller, which keeps a single writer without locks.
//!
//! The maze is held behind an `Arc` so a surface can keep rendering a
//! published snapshot while the next one is decoded. Snapshots are replaced
//! wholesale, never patched.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::VecDeque;
use std::sync::Arc;

use maze::{MazeSnapshot, MazeVariant};
use wire::{Event, LogEntry};

use crate::api::LogsCleared;

/// Default rolling-window size for the log.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

// =============================================================================
// CONNECTION STATE
// =============================================================================

/// Rover link status as reported by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    #[must_use]
    pub fn from_flag(connected: bool) -> Self {
        if connected { Self::Connected } else { Self::Disconnected }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

// =============================================================================
// CHANGE
// =============================================================================

/// Which piece of state an applied event touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// `changed` is false when the event repeated the current value.
    Connection { changed: bool },
    /// One entry appended; `evicted` counts entries dropped off the front.
    Log { evicted: usize },
    Maze,
}

// =============================================================================
// SESSION STORE
// =============================================================================

#[derive(Debug)]
pub struct SessionStore {
    connection: ConnectionState,
    log: VecDeque<LogEntry>,
    log_capacity: usize,
    maze: Arc<MazeSnapshot>,
}

impl SessionStore {
    /// Fresh session: disconnected, empty log, placeholder maze.
    ///
    /// `log_capacity` is clamped to at least 1.
    #[must_use]
    pub fn new(variant: MazeVariant, log_capacity: usize) -> Self {
        Self {
            connection: ConnectionState::default(),
            log: VecDeque::new(),
            log_capacity: log_capacity.max(1),
            maze: Arc::new(MazeSnapshot::placeholder(variant)),
        }
    }

    /// Apply one decoded event to the piece of state its kind names.
    pub fn apply(&mut self, event: Event) -> Change {
        match event {
            Event::Log(entry) => {
                self.log.push_back(entry);
                let mut evicted = 0;
                while self.log.len() > self.log_capacity {
                    self.log.pop_front();
                    evicted += 1;
                }
                Change::Log { evicted }
            }
            Event::Maze(snapshot) => {
                self.maze = Arc::new(snapshot);
                Change::Maze
            }
            Event::ConnectionStatus { connected } => {
                let next = ConnectionState::from_flag(connected);
                let changed = next != self.connection;
                self.connection = next;
                Change::Connection { changed }
            }
        }
    }

    /// Clear the log. Requires proof that the controller cleared its copy.
    pub fn reset_log(&mut self, _cleared: LogsCleared) {
        self.log.clear();
    }

    #[must_use]
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Log entries, oldest first.
    pub fn log(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.log.iter()
    }

    #[must_use]
    pub fn latest_log(&self) -> Option<&LogEntry> {
        self.log.back()
    }

    #[must_use]
    pub fn log_capacity(&self) -> usize {
        self.log_capacity
    }

    /// Currently published maze snapshot.
    #[must_use]
    pub fn maze(&self) -> Arc<MazeSnapshot> {
        Arc::clone(&self.maze)
    }
}
