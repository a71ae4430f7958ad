//! Error types for the resolver.

use thiserror::Error;

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving a resource.
///
/// Per-provider failures (`AuthFailure` through `Network`) never surface to
/// the caller on their own; the resolver logs them and moves to the next
/// provider. Only `AllProvidersExhausted` is terminal.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input rejected before any network call
    #[error(transparent)]
    Core(#[from] aria_core::CoreError),

    /// Provider rejected the request key (code 403)
    #[error("{provider}: authentication failed")]
    AuthFailure {
        /// Provider display name
        provider: String,
    },

    /// Provider could not process the parameters (code 422)
    #[error("{provider}: unprocessable request parameters")]
    BadRequest {
        /// Provider display name
        provider: String,
    },

    /// Provider rate-limited us (code 429)
    #[error("{provider}: rate limited")]
    RateLimited {
        /// Provider display name
        provider: String,
    },

    /// Provider failure (code 500 or unrecognized)
    #[error("{provider}: provider error {code}: {message}")]
    ProviderFailure {
        /// Provider display name
        provider: String,
        /// Raw provider status code
        code: i64,
        /// Provider message passthrough
        message: String,
    },

    /// Response body did not match the provider contract
    #[error("{provider}: malformed response: {detail}")]
    InvalidBody {
        /// Provider display name
        provider: String,
        /// What was wrong with the body
        detail: String,
    },

    /// Success status but nothing usable in the payload
    ///
    /// Kept distinct from `InvalidBody`: the body was schema-valid, the
    /// provider just had no value for us.
    #[error("{provider}: success response with empty payload")]
    EmptyPayload {
        /// Provider display name
        provider: String,
    },

    /// Request deadline exceeded
    #[error("network timeout: {0}")]
    Timeout(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// In-flight request cancelled because a competitor won the race
    #[error("request cancelled")]
    Cancelled,

    /// Remote configuration document rejected
    #[error("remote config rejected: {0}")]
    Config(String),

    /// Every prioritized provider and every fallback aggregator failed
    #[error("all providers exhausted: {summary}")]
    AllProvidersExhausted {
        /// Aggregated per-provider failure reasons
        summary: String,
    },
}

impl ResolveError {
    /// Map a transport error onto the taxonomy.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Build the terminal exhaustion error from the per-provider failures
    /// collected along the way.
    pub fn exhausted(failures: &[(String, String)]) -> Self {
        let summary = if failures.is_empty() {
            "no providers configured".to_string()
        } else {
            failures
                .iter()
                .map(|(provider, reason)| format!("{provider}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self::AllProvidersExhausted { summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_aggregates_reasons() {
        let err = ResolveError::exhausted(&[
            ("source-a".to_string(), "authentication failed".to_string()),
            ("source-b".to_string(), "network timeout".to_string()),
        ]);
        let text = err.to_string();
        assert!(text.contains("source-a: authentication failed"));
        assert!(text.contains("source-b: network timeout"));
    }

    #[test]
    fn exhausted_with_no_attempts() {
        let err = ResolveError::exhausted(&[]);
        assert!(err.to_string().contains("no providers configured"));
    }
}
