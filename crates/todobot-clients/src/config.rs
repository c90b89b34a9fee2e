//! Client configuration.
//!
//! Endpoints and the request timeout come from environment variables with
//! local-development defaults, mirroring how the deployed services are wired
//! together.

use std::env;
use std::time::Duration;

use todobot_core::{BotError, Result};

const DEFAULT_TASK_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_COMMENT_SERVICE_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoints and transport settings for the collaborator clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the task/category store
    pub task_service_url: String,
    /// Base URL of the comment store
    pub comment_service_url: String,
    /// Bounded per-request timeout; a timeout surfaces as a remote failure
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            task_service_url: DEFAULT_TASK_SERVICE_URL.to_string(),
            comment_service_url: DEFAULT_COMMENT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Recognized variables: `TASK_SERVICE_URL`, `COMMENT_SERVICE_URL`,
    /// `REQUEST_TIMEOUT_SECS`. Missing variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a config error if `REQUEST_TIMEOUT_SECS` is set but not a
    /// positive integer.
    pub fn try_from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("TASK_SERVICE_URL") {
            config.task_service_url = url;
        }
        if let Ok(url) = env::var("COMMENT_SERVICE_URL") {
            config.comment_service_url = url;
        }
        if let Ok(raw) = env::var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                BotError::config(format!("REQUEST_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            if secs == 0 {
                return Err(BotError::config("REQUEST_TIMEOUT_SECS must be positive"));
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Builds the shared HTTP client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns a config error if the underlying client cannot be constructed.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|err| BotError::config(format!("failed to build HTTP client: {err}")))
    }
}
