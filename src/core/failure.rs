//! Failure taxonomy for proposal generation.
//!
//! Every way a generation call can go wrong collapses into exactly one
//! [`FailureCategory`], and each category carries a fixed HTTP status.

use crate::domain::ports::ProviderError;
use axum::http::StatusCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const QUOTA_EXCEEDED_MESSAGE: &str = "OpenAI API quota exceeded. Please check your OpenAI account billing and add credits to continue using the service.";
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again in a few moments.";
pub const INVALID_KEY_MESSAGE: &str =
    "Invalid OpenAI API key. Please check your API key configuration.";
pub const MISSING_KEY_MESSAGE: &str =
    "OpenAI API key is not configured. Set OPENAI_API_KEY to enable proposal generation.";
pub const FORBIDDEN_MESSAGE: &str =
    "OpenAI API access forbidden. Please check your API key permissions.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "No response from AI service";
pub const FALLBACK_MESSAGE: &str = "Failed to generate proposal. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    QuotaExceeded,
    RateLimited,
    AuthInvalid,
    Forbidden,
    UpstreamError,
    EmptyResponse,
    Unknown,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "quota_exceeded",
            Self::RateLimited => "rate_limited",
            Self::AuthInvalid => "auth_invalid",
            Self::Forbidden => "forbidden",
            Self::UpstreamError => "upstream_error",
            Self::EmptyResponse => "empty_response",
            Self::Unknown => "unknown",
        }
    }

    pub fn suggested_status(&self) -> u16 {
        match self {
            Self::QuotaExceeded | Self::RateLimited => 429,
            Self::AuthInvalid => 401,
            Self::Forbidden => 403,
            Self::UpstreamError => 502,
            Self::EmptyResponse | Self::Unknown => 500,
        }
    }

    /// Classifies a provider failure from its HTTP status (if any) and message text.
    ///
    /// A status outside 401/403/429 means the provider answered with an error
    /// response; no status at all means the request never got a response.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        match status {
            Some(429) if mentions_quota(message) => Self::QuotaExceeded,
            Some(429) => Self::RateLimited,
            Some(401) => Self::AuthInvalid,
            Some(403) => Self::Forbidden,
            Some(_) => Self::UpstreamError,
            None => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn mentions_quota(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("quota") || lowered.contains("billing")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationFailure {
    pub category: FailureCategory,
    pub message: String,
}

impl GenerationFailure {
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    pub fn missing_credential() -> Self {
        Self::new(FailureCategory::AuthInvalid, MISSING_KEY_MESSAGE)
    }

    pub fn empty_response() -> Self {
        Self::new(FailureCategory::EmptyResponse, EMPTY_RESPONSE_MESSAGE)
    }

    pub fn malformed_payload(reason: impl fmt::Display) -> Self {
        Self::new(
            FailureCategory::Unknown,
            format!("AI Service Error: failed to parse generated proposal: {}", reason),
        )
    }

    /// Maps a provider error onto the taxonomy with the message shown to the caller.
    pub fn from_provider(error: ProviderError) -> Self {
        match error {
            ProviderError::Status { status, message } => {
                let text = message.unwrap_or_default();
                let category = FailureCategory::classify(Some(status), &text);
                let message = match category {
                    FailureCategory::QuotaExceeded => QUOTA_EXCEEDED_MESSAGE.to_string(),
                    FailureCategory::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
                    FailureCategory::AuthInvalid => INVALID_KEY_MESSAGE.to_string(),
                    FailureCategory::Forbidden => FORBIDDEN_MESSAGE.to_string(),
                    _ if text.trim().is_empty() => "OpenAI API Error: Unknown error".to_string(),
                    _ => format!("OpenAI API Error: {}", text),
                };
                Self::new(category, message)
            }
            ProviderError::Transport(text) if text.trim().is_empty() => {
                Self::new(FailureCategory::Unknown, FALLBACK_MESSAGE)
            }
            ProviderError::Transport(text) => {
                Self::new(FailureCategory::Unknown, format!("AI Service Error: {}", text))
            }
        }
    }

    pub fn suggested_status(&self) -> u16 {
        self.category.suggested_status()
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.suggested_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_status_table() {
        let table = [
            (FailureCategory::QuotaExceeded, 429),
            (FailureCategory::RateLimited, 429),
            (FailureCategory::AuthInvalid, 401),
            (FailureCategory::Forbidden, 403),
            (FailureCategory::UpstreamError, 502),
            (FailureCategory::EmptyResponse, 500),
            (FailureCategory::Unknown, 500),
        ];
        for (category, status) in table {
            assert_eq!(category.suggested_status(), status, "{}", category);
        }
    }

    #[test]
    fn test_classify_429_quota_vs_rate_limit() {
        assert_eq!(
            FailureCategory::classify(Some(429), "You exceeded your current quota"),
            FailureCategory::QuotaExceeded
        );
        assert_eq!(
            FailureCategory::classify(Some(429), "Check your Billing details"),
            FailureCategory::QuotaExceeded
        );
        assert_eq!(
            FailureCategory::classify(Some(429), "Rate limit reached for requests"),
            FailureCategory::RateLimited
        );
        assert_eq!(
            FailureCategory::classify(Some(429), ""),
            FailureCategory::RateLimited
        );
    }

    #[test]
    fn test_classify_other_statuses() {
        assert_eq!(
            FailureCategory::classify(Some(401), "quota"),
            FailureCategory::AuthInvalid
        );
        assert_eq!(
            FailureCategory::classify(Some(403), ""),
            FailureCategory::Forbidden
        );
        assert_eq!(
            FailureCategory::classify(Some(500), "The server had an error"),
            FailureCategory::UpstreamError
        );
        assert_eq!(
            FailureCategory::classify(Some(400), "Invalid model"),
            FailureCategory::UpstreamError
        );
        assert_eq!(
            FailureCategory::classify(None, "connection refused"),
            FailureCategory::Unknown
        );
    }

    #[test]
    fn test_quota_and_rate_limit_messages_differ() {
        let quota = GenerationFailure::from_provider(ProviderError::Status {
            status: 429,
            message: Some("insufficient_quota".to_string()),
        });
        let rate = GenerationFailure::from_provider(ProviderError::Status {
            status: 429,
            message: Some("slow down".to_string()),
        });

        assert_eq!(quota.category, FailureCategory::QuotaExceeded);
        assert_eq!(rate.category, FailureCategory::RateLimited);
        assert_eq!(quota.suggested_status(), 429);
        assert_eq!(rate.suggested_status(), 429);
        assert_ne!(quota.message, rate.message);
    }

    #[test]
    fn test_upstream_error_includes_provider_text() {
        let failure = GenerationFailure::from_provider(ProviderError::Status {
            status: 400,
            message: Some("The model `gpt-9` does not exist".to_string()),
        });
        assert_eq!(failure.category, FailureCategory::UpstreamError);
        assert_eq!(failure.status_code(), StatusCode::BAD_GATEWAY);
        assert!(failure.message.contains("The model `gpt-9` does not exist"));

        let bare = GenerationFailure::from_provider(ProviderError::Status {
            status: 503,
            message: None,
        });
        assert_eq!(bare.message, "OpenAI API Error: Unknown error");
    }

    #[test]
    fn test_transport_error_is_unknown() {
        let failure =
            GenerationFailure::from_provider(ProviderError::Transport("dns failure".to_string()));
        assert_eq!(failure.category, FailureCategory::Unknown);
        assert_eq!(failure.message, "AI Service Error: dns failure");

        let empty = GenerationFailure::from_provider(ProviderError::Transport(String::new()));
        assert_eq!(empty.message, FALLBACK_MESSAGE);
    }

    #[test]
    fn test_every_failure_has_message() {
        let failures = [
            GenerationFailure::missing_credential(),
            GenerationFailure::empty_response(),
            GenerationFailure::malformed_payload("expected value at line 1"),
        ];
        for failure in failures {
            assert!(!failure.message.is_empty());
        }
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&FailureCategory::UpstreamError).unwrap();
        assert_eq!(json, "\"upstream_error\"");
    }
}
