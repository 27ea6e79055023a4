use serde::Serialize;
use shared::{ProcessingPhase, ProcessorResponse};

/// JSON body sent to `{base}/process`.
#[derive(Debug, Serialize)]
pub struct ProcessRequest<'a> {
    pub image_path: &'a str,
    pub phase: ProcessingPhase,
}

/// How a processing request was satisfied.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /// The external processor answered; its body is passed on untouched.
    Relayed(ProcessorResponse),
    /// The processor was unavailable and the input was copied locally.
    FallbackApplied(ProcessorResponse),
}

impl RelayOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RelayOutcome::FallbackApplied(_))
    }

    pub fn into_response(self) -> ProcessorResponse {
        match self {
            RelayOutcome::Relayed(r) | RelayOutcome::FallbackApplied(r) => r,
        }
    }
}

/// Anything that keeps the external processor from producing a usable answer.
/// Never leaves the relay: it always turns into a fallback.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Invalid processor URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to processor failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Processor answered with status {0}")]
    Status(u16),
    #[error("Malformed processor response: {0}")]
    Malformed(String),
    #[error("Processor rejected the image: {0}")]
    Rejected(String),
    #[error("Could not resolve stored image: {0}")]
    Resolve(String),
}
