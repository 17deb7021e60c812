//! Model-backend failures.
//!
//! Defined in core so the scoring client can downcast an `anyhow::Error` and
//! decide whether to retry without matching on message text.

use thiserror::Error;

/// Seconds to wait after a 429 that carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model does not exist for this account.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Any other non-success HTTP response, or an unreadable body.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request exceeded the client timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Connection-level failure.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP response.
    ///
    /// `retry_after_secs` is the parsed `retry-after` header, if any.
    pub fn from_status(
        status: u16,
        model: &str,
        body: String,
        retry_after_secs: Option<u64>,
    ) -> Self {
        match status {
            401 | 403 => ProviderError::AuthenticationFailed(body),
            404 => ProviderError::ModelNotFound(model.to_string()),
            429 => ProviderError::RateLimited {
                retry_after_ms: retry_after_secs
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
                    .saturating_mul(1000),
            },
            _ => ProviderError::ApiError {
                status,
                message: body,
            },
        }
    }

    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Server-requested delay before the next attempt, for rate limits.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}
