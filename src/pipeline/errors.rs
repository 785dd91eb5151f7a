//! Error taxonomy for the construction pipeline
//!
//! Every step failure aborts the run and is surfaced with its step name and
//! the raw cause. The pipeline never retries; `is_retryable` only says
//! whether re-invoking a *fresh* run (new nonce, new fee) could plausibly
//! succeed.

use thiserror::Error;

use super::ConstructionStep;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Non-success response from a construction service call
    ///
    /// `body` is the verbatim response text, surfaced unmodified.
    #[error("construction /{step} failed with status {status}: {body}")]
    Remote {
        step: ConstructionStep,
        status: u16,
        body: String,
    },

    /// Transport-level failure before any response status was obtained
    #[error("construction /{step} request failed: {reason}")]
    Transport {
        step: ConstructionStep,
        reason: String,
    },

    /// The external signer failed or produced empty output
    #[error("signing failed: {0}")]
    Signing(String),

    /// A response is missing a field the pipeline requires, or an
    /// operation-list invariant was violated
    #[error("protocol invariant violated at {step}: {reason}")]
    ProtocolInvariant {
        step: ConstructionStep,
        reason: String,
    },

    /// A step exceeded its allotted wait
    #[error("{step} timed out")]
    Timeout { step: ConstructionStep },

    /// Configuration could not be loaded or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn invariant(step: ConstructionStep, reason: impl Into<String>) -> Self {
        Self::ProtocolInvariant {
            step,
            reason: reason.into(),
        }
    }

    /// Step this error is attributed to, when it has one
    pub fn step(&self) -> Option<ConstructionStep> {
        match self {
            Self::Remote { step, .. }
            | Self::Transport { step, .. }
            | Self::ProtocolInvariant { step, .. }
            | Self::Timeout { step } => Some(*step),
            Self::Signing(_) | Self::Config(_) => None,
        }
    }

    /// Error category for log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Transport { .. } => "transport",
            Self::Signing(_) => "signing",
            Self::ProtocolInvariant { .. } => "invariant",
            Self::Timeout { .. } => "timeout",
            Self::Config(_) => "config",
        }
    }

    /// Whether re-running the whole pipeline from scratch might succeed.
    ///
    /// Mid-pipeline resume is never valid: intermediate blobs go stale with
    /// the nonce and fee, so "retryable" always means a fresh run.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { status, .. } => *status >= 500,
            Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Signing(_) | Self::ProtocolInvariant { .. } | Self::Config(_) => false,
        }
    }
}
