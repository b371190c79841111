//! HTTP probe execution.
//!
//! # Responsibilities
//! - Send one GET to the target with the monitor's User-Agent
//! - Stream the body to separate time-to-first-byte from total latency
//! - Convert every transport error into a failure outcome

use std::error::Error as _;
use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;

use crate::config::TargetConfig;
use crate::probe::outcome::{elapsed_ms, ProbeFailure, ProbeOutcome, ProbeResponse};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Performs probes against a target URL.
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    client: Client,
}

impl ProbeExecutor {
    pub fn new(config: &TargetConfig) -> Result<Self, ProbeError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Probe `url` once. `timeout` bounds the whole exchange, body included.
    pub async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let start = Instant::now();

        match self.fetch(url, timeout, start).await {
            Ok(response) => {
                tracing::debug!(
                    url = %url,
                    status = response.status_code,
                    ttfb_ms = response.ttfb_ms,
                    latency_ms = response.latency_ms,
                    size_bytes = response.size_bytes,
                    "Probe completed"
                );
                ProbeOutcome::Response(response)
            }
            Err(e) => {
                let failure = ProbeFailure {
                    latency_ms: elapsed_ms(start),
                    error: describe_error(&e, timeout),
                };
                tracing::debug!(url = %url, error = %failure.error, "Probe failed");
                ProbeOutcome::Failed(failure)
            }
        }
    }

    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        start: Instant,
    ) -> Result<ProbeResponse, reqwest::Error> {
        let mut response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status();

        let mut size_bytes = 0u64;
        let mut ttfb_ms = None;
        while let Some(chunk) = response.chunk().await? {
            if chunk.is_empty() {
                continue;
            }
            if ttfb_ms.is_none() {
                ttfb_ms = Some(elapsed_ms(start));
            }
            size_bytes += chunk.len() as u64;
        }
        let latency_ms = elapsed_ms(start);

        Ok(ProbeResponse {
            status_code: status.as_u16(),
            ok: !(status.is_client_error() || status.is_server_error()),
            // An empty body has its first (and last) byte when it completes.
            ttfb_ms: ttfb_ms.unwrap_or(latency_ms),
            latency_ms,
            size_bytes,
        })
    }
}

/// Human-readable description including the error's source chain.
fn describe_error(err: &reqwest::Error, timeout: Duration) -> String {
    let kind = if err.is_timeout() {
        format!("timed out after {:?}", timeout)
    } else if err.is_connect() {
        "connection failed".to_string()
    } else if err.is_body() || err.is_decode() {
        "failed reading response body".to_string()
    } else if err.is_builder() {
        "invalid request".to_string()
    } else {
        "request failed".to_string()
    };

    let mut message = format!("{}: {}", kind, err);
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
