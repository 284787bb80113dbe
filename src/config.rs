//! Dashboard configuration.
//!
//! Every knob is a CLI flag with an environment fallback (`ROVER_*`), parsed
//! by clap into [`ConfigArgs`] and then validated into a [`DashboardConfig`].
//! Validation happens once at startup so the runtime never sees a bad value.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use maze::{MazeVariant, consts::DEFAULT_CELL_SIZE};

use crate::state::DEFAULT_LOG_CAPACITY;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const STREAM_PATH: &str = "/ws/frontend";
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

const RECONNECT_INITIAL: Duration = Duration::from_secs(1);
const RECONNECT_MAX: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid base URL `{0}`: expected http:// or https://")]
    InvalidBaseUrl(String),
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),
    #[error("log capacity must be at least 1")]
    ZeroLogCapacity,
    #[error("HTTP timeout must be at least 1 second")]
    ZeroHttpTimeout,
}

// =============================================================================
// RECONNECT POLICY
// =============================================================================

/// Bounded exponential backoff between connection instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub attempts: u32,
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    #[must_use]
    pub fn new(attempts: u32) -> Self {
        Self { attempts, initial: RECONNECT_INITIAL, max: RECONNECT_MAX }
    }

    /// Delay before retry number `retry` (0-based), or `None` once the
    /// budget is spent.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Option<Duration> {
        if retry >= self.attempts {
            return None;
        }
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        Some(self.initial.saturating_mul(factor).min(self.max))
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_ATTEMPTS)
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    pub base_url: String,
    pub ws_url: String,
    pub variant: MazeVariant,
    pub cell_size: f64,
    pub log_capacity: usize,
    pub reconnect: ReconnectPolicy,
    pub http_timeout: Duration,
}

#[derive(clap::Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Controller base URL (http or https).
    #[arg(long, global = true, env = "ROVER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maze representation pushed by this deployment: grid or graph.
    #[arg(long, global = true, env = "ROVER_MAZE_VARIANT", default_value = "grid")]
    pub maze_variant: MazeVariant,

    /// Side length of one grid cell in drawing units.
    #[arg(long, global = true, env = "ROVER_CELL_SIZE", default_value_t = DEFAULT_CELL_SIZE)]
    pub cell_size: f64,

    /// Log entries kept before the oldest are dropped.
    #[arg(long, global = true, env = "ROVER_LOG_CAPACITY", default_value_t = DEFAULT_LOG_CAPACITY)]
    pub log_capacity: usize,

    /// New connection instances tried after the stream closes; 0 disables.
    #[arg(long, global = true, env = "ROVER_RECONNECT_ATTEMPTS", default_value_t = DEFAULT_RECONNECT_ATTEMPTS)]
    pub reconnect_attempts: u32,

    /// Seconds allowed for each REST call and for the stream handshake.
    #[arg(long, global = true, env = "ROVER_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

impl ConfigArgs {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a non-http(s) base URL, a cell size that
    /// is not positive and finite, a zero log capacity, or a zero timeout.
    pub fn resolve(self) -> Result<DashboardConfig, ConfigError> {
        let base_url = self.base_url.trim_end_matches('/').to_owned();
        let ws_url = ws_url(&base_url)?;
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::ZeroHttpTimeout);
        }
        Ok(DashboardConfig {
            base_url,
            ws_url,
            variant: self.maze_variant,
            cell_size: self.cell_size,
            log_capacity: self.log_capacity,
            reconnect: ReconnectPolicy::new(self.reconnect_attempts),
            http_timeout: Duration::from_secs(self.http_timeout_secs),
        })
    }
}

/// Streaming endpoint for a controller base URL.
///
/// # Errors
///
/// [`ConfigError::InvalidBaseUrl`] unless the URL starts with `http://` or
/// `https://` and names a host.
pub fn ws_url(base_url: &str) -> Result<String, ConfigError> {
    let base = base_url.trim_end_matches('/');
    let (scheme, rest) = if let Some(rest) = base.strip_prefix("http://") {
        ("ws", rest)
    } else if let Some(rest) = base.strip_prefix("https://") {
        ("wss", rest)
    } else {
        return Err(ConfigError::InvalidBaseUrl(base_url.to_owned()));
    };
    if rest.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(base_url.to_owned()));
    }
    Ok(format!("{scheme}://{rest}{STREAM_PATH}"))
}
