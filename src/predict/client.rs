//! HTTP client for the remote prediction backend
//!
//! # Wire contract
//!
//! ```text
//! POST {base_url}/predict        multipart/form-data, field "file"
//!    ↓
//! 200 {"message": .., "hsc_predictions": [{"class", "probability"}],
//!      "lineage_predictions": [...]}
//! non-200 → arbitrary error body
//! ```
//!
//! Each submission is sent at most once. There is no retry.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use super::PredictionResult;
use crate::config::DashboardConfig;
use crate::experiment::UploadedArtifact;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("osiris-core/", env!("CARGO_PKG_VERSION"));

/// Client for `POST {base_url}/predict`.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    endpoint: String,
    http: reqwest::Client,
}

impl PredictionClient {
    /// Create a client for `base_url`. A timeout surfaces as
    /// [`Error::Network`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the URL is blank, and
    /// [`Error::Network`] if the HTTP client cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::InvalidConfig(
                "backend URL must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: format!("{base_url}/predict"),
            http,
        })
    }

    /// Create a client from the dashboard configuration.
    ///
    /// # Errors
    ///
    /// See [`PredictionClient::new`].
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.backend_url(), config.request_timeout())
    }

    /// Full URL submissions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `artifact` and parse the backend's predictions.
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] on connection failure or timeout
    /// - [`Error::Server`] on any non-200 status, with the raw body
    /// - [`Error::MalformedResponse`] if a 200 body lacks a required key
    #[instrument(
        name = "predict",
        skip_all,
        fields(file = artifact.file_name(), bytes = artifact.size_bytes())
    )]
    pub async fn submit(&self, artifact: &UploadedArtifact) -> Result<PredictionResult> {
        let part = Part::bytes(artifact.content().to_vec())
            .file_name(artifact.file_name().to_string())
            .mime_str(artifact.kind().mime_type())?;
        let form = Form::new().part("file", part);

        info!(endpoint = %self.endpoint, "submitting artifact for prediction");
        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .inspect_err(|err| warn!(error = %err, "prediction backend unreachable"))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(error = %err, "could not read error body");
                    String::new()
                }
            };
            warn!(status = status.as_u16(), "prediction backend returned an error");
            return Err(Error::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let result = PredictionResult::from_json(&body)
            .inspect_err(|err| warn!(error = %err, "unexpected prediction response"))?;
        info!(
            hsc = result.hsc_predictions.len(),
            lineage = result.lineage_predictions.len(),
            "prediction received"
        );
        Ok(result)
    }
}
