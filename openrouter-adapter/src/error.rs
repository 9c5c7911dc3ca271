use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenRouterError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Rate limit exceeded{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Completion response contained no choices")]
    EmptyResponse,

    #[error("Failed to decode completion response: {0}")]
    Decode(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl OpenRouterError {
    /// Whether a retry against the same or another model may succeed.
    ///
    /// Only configuration problems are permanent; every failure observed on
    /// the wire is worth another attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_))
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after.map_or_else(String::new, |d| format!(" (retry after {}s)", d.as_secs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_permanent() {
        assert!(OpenRouterError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(OpenRouterError::Connection("reset".into()).is_transient());
        assert!(OpenRouterError::RateLimited { retry_after: None }.is_transient());
        assert!(OpenRouterError::Api {
            status: 401,
            message: "bad key".into()
        }
        .is_transient());
        assert!(OpenRouterError::EmptyResponse.is_transient());
        assert!(OpenRouterError::Decode("eof".into()).is_transient());
        assert!(!OpenRouterError::InvalidConfig("bad header".into()).is_transient());
    }

    #[test]
    fn test_rate_limit_display_includes_retry_after() {
        let err = OpenRouterError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(err.to_string(), "Rate limit exceeded (retry after 7s)");

        let err = OpenRouterError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }
}
