//! REST collaborators on the rover controller.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. The dashboard treats any error
//! as a transport failure: it logs it, shows the rover as disconnected and
//! carries on. Nothing here retries; retry is a user action.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use wire::{ConnectionStatusResponse, LogEntry, LogsResponse};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{method} {path} returned HTTP {status}")]
    Status { method: &'static str, path: &'static str, status: u16 },
}

/// Proof that the controller accepted a log reset.
///
/// Only [`ApiClient::reset_logs`] hands these out, so the local log can only
/// be cleared after the server confirmed.
#[derive(Debug)]
pub struct LogsCleared {
    _private: (),
}

impl LogsCleared {
    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        Self { _private: () }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /logs`: log history, oldest first.
    ///
    /// # Errors
    ///
    /// Transport failure, non-2xx status, or an unexpected body.
    pub async fn fetch_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        let body: LogsResponse = self.get_json("/logs").await?;
        Ok(body.logs)
    }

    /// `GET /connection_status`: whether the rover is linked to the controller.
    ///
    /// # Errors
    ///
    /// Transport failure, non-2xx status, or an unexpected body.
    pub async fn fetch_connection_status(&self) -> Result<bool, ApiError> {
        let body: ConnectionStatusResponse = self.get_json("/connection_status").await?;
        Ok(body.connected)
    }

    /// `GET /mazehistory/id`: identifiers of previously explored mazes.
    ///
    /// # Errors
    ///
    /// Transport failure, non-2xx status, or an unexpected body.
    pub async fn fetch_maze_history(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/mazehistory/id").await
    }

    /// `POST /logs`: ask the controller to clear its log.
    ///
    /// # Errors
    ///
    /// Transport failure or non-2xx status. The local log must then be kept.
    pub async fn reset_logs(&self) -> Result<LogsCleared, ApiError> {
        const PATH: &str = "/logs";
        let response = self.http.post(self.url(PATH)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { method: "POST", path: PATH, status: status.as_u16() });
        }
        tracing::info!("api: controller cleared logs");
        Ok(LogsCleared { _private: () })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &'static str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { method: "GET", path, status: status.as_u16() });
        }
        Ok(response.json::<T>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
