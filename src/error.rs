use thiserror::Error;

/// Failure modes of one call to a completion service.
///
/// Callers must be able to tell credential problems apart from rate limits
/// and plain network faults, so each gets its own variant. None of these is
/// retried by the deriver; only an unchanged title triggers another attempt.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion provider configured; set RETITLE_PROVIDER or a provider API key")]
    NotConfigured,
    #[error("completion service rejected credentials: {0}")]
    Auth(String),
    #[error("completion service rate limited the request: {0}")]
    RateLimited(String),
    #[error("network failure calling completion service: {0}")]
    Network(String),
    #[error("completion service call failed: {0}")]
    Service(String),
    #[error("completion service returned no usable text")]
    EmptyResponse,
    #[error("completion service returned an unexpected payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Network(err.to_string())
    }
}
