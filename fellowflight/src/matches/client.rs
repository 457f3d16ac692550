//! Authenticated access to the remote match service

use std::time::Duration;

use derivative::Derivative;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::wire::RawMatchPayload;
use crate::onboarding::ValidatedForm;

/// Failure talking to the match service
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Match service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Match service responded with {status}")]
    Status { status: StatusCode },
    #[error("Malformed match service response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Match service connection settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root, without the `/api/v1` prefix
    #[derivative(Default(value = "\"https://api.fellowflightmatch.abdullah.buzz\".to_owned()"))]
    pub base_url: String,

    /// Upper bound for a single request; unbounded if not set
    pub timeout_secs: Option<u64>,
}

/// Client of the match service
#[derive(Debug, Clone)]
pub struct MatchClient {
    http: reqwest::Client,
    base_url: String,
}

impl MatchClient {
    /// Creates a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, NetworkError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(NetworkError::Transport)?;

        Ok(Self::with_http_client(http, &config.base_url))
    }

    /// Uses a preconfigured HTTP client
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    /// Sign-in entry point of the service (Slack OAuth)
    pub fn login_url(&self) -> String {
        self.endpoint("auth/slack")
    }

    /// Fetches matches for the caller's flight
    #[instrument(skip(self, access_token))]
    pub async fn fetch_matches(
        &self,
        flight_id: i64,
        access_token: &str,
    ) -> Result<RawMatchPayload, NetworkError> {
        let response = self
            .http
            .get(self.endpoint("matches"))
            .query(&[("flight_id", flight_id)])
            .bearer_auth(access_token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(NetworkError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status { status });
        }

        let payload: RawMatchPayload = response.json().await.map_err(NetworkError::Decode)?;
        debug!(
            same_flight = payload.same_flight().len(),
            time_overlap = payload.time_overlap().len(),
            "Matches fetched"
        );
        Ok(payload)
    }

    /// Fetches matches, presenting any failure as "no matches yet"
    pub async fn fetch_matches_or_empty(
        &self,
        flight_id: i64,
        access_token: &str,
    ) -> RawMatchPayload {
        self.fetch_matches(flight_id, access_token)
            .await
            .unwrap_or_else(|err| no_matches(&err, flight_id))
    }

    /// Submits the onboarding form
    #[instrument(skip_all, fields(flight_number = %form.flight_number()))]
    pub async fn submit_onboarding(
        &self,
        form: &ValidatedForm,
        access_token: &str,
    ) -> Result<(), NetworkError> {
        let response = self
            .http
            .post(self.endpoint("formHandler"))
            .bearer_auth(access_token)
            .form(&form.fields())
            .send()
            .await
            .map_err(NetworkError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status { status });
        }

        debug!("Onboarding submitted");
        Ok(())
    }
}

/// Stand-in payload for a failed fetch
pub(super) fn no_matches(err: &NetworkError, flight_id: i64) -> RawMatchPayload {
    warn!(%err, flight_id, "Cannot fetch matches, showing none");
    RawMatchPayload::empty()
}
