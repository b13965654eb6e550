//! HTTP client for the assessment Recommendation Service.
//!
//! This crate provides the seam between the search controller and the
//! remote ranking backend. It handles:
//! - Building the JSON body for `POST /recommend`
//! - Mapping transport failures, HTTP error statuses and undecodable bodies
//!   onto [`ClientError`]
//! - Probing `GET /health`
//!
//! No retries and no client-side timeout: a request waits for whatever the
//! transport itself decides.

use std::future::Future;

use assessments::{RecommendRequest, RecommendResponse};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur when talking to the Recommendation Service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Failed to reach recommendation service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Recommendation service answered with HTTP {status}")]
    Status { status: u16 },

    #[error("Invalid response from recommendation service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Recommendation service reported status {0:?}")]
    Unhealthy(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ClientError>;

/// Anything that can answer a recommendation request.
///
/// The HTTP client is the production implementation; tests substitute
/// in-memory services.
pub trait RecommendationService {
    fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> impl Future<Output = Result<RecommendResponse>> + Send;
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// Client for the Recommendation Service over HTTP + JSON.
#[derive(Debug, Clone)]
pub struct HttpRecommendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecommendClient {
    /// Create a client for the service rooted at `base_url`
    /// (e.g., "http://127.0.0.1:8000"). Trailing slashes are ignored.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .user_agent(concat!("assess-recs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        info!("Using recommendation service at {}", base_url);
        Ok(Self { client, base_url })
    }

    /// Base URL this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Probe `GET /health`; succeeds only on a 2xx `{"status": "ok"}`.
    pub async fn health(&self) -> Result<()> {
        let url = self.endpoint("health");
        debug!("Probing {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: HealthBody = serde_json::from_slice(&bytes)?;
        if body.status != "ok" {
            return Err(ClientError::Unhealthy(body.status));
        }
        Ok(())
    }

    async fn post_recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse> {
        let url = self.endpoint("recommend");
        debug!(
            "POST {} (k={}, remote={:?}, adaptive={:?}, test_type={:?})",
            url,
            request.k,
            request.remote_preferred,
            request.adaptive_preferred,
            request.test_type_preference
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .inspect_err(|e| error!("Transport error calling {}: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            error!("Recommendation service returned {}", status);
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: RecommendResponse = serde_json::from_slice(&bytes)
            .inspect_err(|e| error!("Undecodable recommendation payload: {}", e))?;

        debug!("Received {} results", parsed.results.len());
        Ok(parsed)
    }
}

impl RecommendationService for HttpRecommendClient {
    fn recommend(
        &self,
        request: &RecommendRequest,
    ) -> impl Future<Output = Result<RecommendResponse>> + Send {
        self.post_recommend(request)
    }
}
