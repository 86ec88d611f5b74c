//! HTTP client for the local enhancement service
//!
//! One blocking exchange per activation, no retries; the user re-triggers
//! the hotkey to retry manually.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

/// Request body for `POST /api/enhance`
#[derive(Debug, Serialize)]
pub struct EnhanceRequest<'a> {
    pub text: &'a str,
}

/// Response body from `POST /api/enhance`
#[derive(Debug, Deserialize)]
pub struct EnhanceResponse {
    pub enhanced: String,
}

/// Errors from the enhancement exchange
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("failed to construct http client")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection refused, timeout, DNS failure, or a non-2xx status
    #[error("enhancement request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("enhancement response is missing the `enhanced` field")]
    MalformedResponse,
}

/// Client for the enhancement service's HTTP API.
#[derive(Debug, Clone)]
pub struct EnhanceClient {
    http: reqwest::Client,
    base_url: String,
    enhance_timeout: Duration,
    liveness_timeout: Duration,
}

impl EnhanceClient {
    pub fn new(config: &Config) -> Result<Self, EnhanceError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(EnhanceError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            enhance_timeout: config.enhance_timeout,
            liveness_timeout: config.liveness_timeout,
        })
    }

    /// Send `text` for enhancement and return the enhanced replacement.
    pub async fn enhance(&self, text: &str) -> Result<String, EnhanceError> {
        let url = format!("{}/api/enhance", self.base_url);

        let response = self
            .http
            .post(&url)
            .timeout(self.enhance_timeout)
            .json(&EnhanceRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let parsed: EnhanceResponse =
            serde_json::from_str(&body).map_err(|_| EnhanceError::MalformedResponse)?;

        Ok(parsed.enhanced)
    }

    /// Probe the service before entering the event loop.
    ///
    /// Any 2xx on the prompts listing counts as alive; every failure mode
    /// collapses to `false`.
    pub async fn check_liveness(&self) -> bool {
        let url = format!("{}/api/prompts", self.base_url);

        match self
            .http
            .get(&url)
            .timeout(self.liveness_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(?err, "liveness probe failed");
                false
            }
        }
    }
}
