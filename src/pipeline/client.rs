//! Transport-level client for the construction service
//!
//! One POST per named endpoint under a configured base URL. The client does
//! not interpret request or response payloads and performs no retries or
//! caching; the pipeline owns all sequencing and policy.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::PipelineError;

/// The nine logical pipeline steps.
///
/// All but `Sign` map 1:1 to a construction endpoint; both parse variants
/// share the `parse` path and differ only in the `signed` flag the pipeline
/// sets in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionStep {
    Preprocess,
    Metadata,
    Payloads,
    ParseUnsigned,
    Sign,
    Combine,
    ParseSigned,
    Hash,
    Submit,
}

impl ConstructionStep {
    /// Endpoint path under the base URL, `None` for the offline sign step
    pub fn endpoint_path(&self) -> Option<&'static str> {
        match self {
            Self::Preprocess => Some("preprocess"),
            Self::Metadata => Some("metadata"),
            Self::Payloads => Some("payloads"),
            Self::ParseUnsigned | Self::ParseSigned => Some("parse"),
            Self::Combine => Some("combine"),
            Self::Hash => Some("hash"),
            Self::Submit => Some("submit"),
            Self::Sign => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Metadata => "metadata",
            Self::Payloads => "payloads",
            Self::ParseUnsigned => "parse_unsigned",
            Self::Sign => "sign",
            Self::Combine => "combine",
            Self::ParseSigned => "parse_signed",
            Self::Hash => "hash",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for ConstructionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP client bound to one construction service base URL
#[derive(Debug, Clone)]
pub struct ConstructionClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ConstructionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Full URL for a service-backed step
    pub fn endpoint_url(&self, step: ConstructionStep) -> Option<String> {
        step.endpoint_path()
            .map(|path| format!("{}/{}", self.base_url, path))
    }

    /// POST `body` to the step's endpoint and return the response JSON.
    ///
    /// Non-2xx responses fail with the verbatim body text; a request that
    /// exceeds the configured timeout fails with a timeout error.
    pub async fn call(&self, step: ConstructionStep, body: &Value) -> Result<Value, PipelineError> {
        let url = self
            .endpoint_url(step)
            .ok_or_else(|| PipelineError::invariant(step, "step has no service endpoint"))?;

        debug!(step = %step, url = %url, "construction request");

        let response = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Timeout { step }
                } else {
                    PipelineError::Transport {
                        step,
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| PipelineError::Transport {
            step,
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(PipelineError::Remote {
                step,
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            PipelineError::invariant(step, format!("response is not valid JSON: {e}"))
        })
    }
}
