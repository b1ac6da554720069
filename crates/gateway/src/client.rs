use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

use crate::normalize::ExternalProduct;

const RETRYABLE_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

const MAX_IDLE_CONNECTIONS_PER_HOST: usize = 8;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http client could not be built: {0}")]
    Build(#[source] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(StatusCode),
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream body could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(status) => RETRYABLE_STATUSES.contains(status),
            Self::Transport(_) => true,
            Self::Decode(source) => source.is_timeout(),
            Self::Build(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    fn allows_retry_after(&self, attempts_made: u32) -> bool {
        attempts_made <= self.max_retries
    }
}

/// One pooled client per upstream endpoint.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS_PER_HOST)
            .build()
            .map_err(GatewayError::Build)?;

        Ok(Self { http, url: url.into(), retry })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_records(&self) -> Result<Vec<ExternalProduct>, GatewayError> {
        let mut attempts_made = 0u32;
        loop {
            attempts_made += 1;
            match self.attempt().await {
                Ok(records) => return Ok(records),
                Err(error)
                    if error.is_retryable() && self.retry.allows_retry_after(attempts_made) =>
                {
                    warn!(
                        event_name = "gateway.fetch.retry",
                        attempt = attempts_made,
                        max_retries = self.retry.max_retries,
                        error = %error,
                        "upstream attempt failed, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt(&self) -> Result<Vec<ExternalProduct>, GatewayError> {
        let response = self.http.get(&self.url).send().await.map_err(GatewayError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GatewayError::Status(status));
        }

        response.json::<Vec<ExternalProduct>>().await.map_err(GatewayError::Decode)
    }
}
