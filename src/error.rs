// src/error.rs
// Standardized error types for quizgen

use crate::llm::Provider;
use thiserror::Error;

/// Maximum number of characters of an error body kept for diagnostics
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// Main error type for the quizgen library
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Convenience type alias for Result using QuizError
pub type Result<T> = std::result::Result<T, QuizError>;

/// What went wrong while talking to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// No credential was supplied; no request was sent
    MissingCredential,
    /// Model warming up or rate limited (503/429)
    Unavailable,
    /// Any other non-success HTTP status
    Status(u16),
    /// Connection, timeout or body read failure
    Transport,
    /// Success status but nothing usable in the payload
    EmptyResponse,
    /// Payload could not be decoded
    InvalidResponse,
}

/// Error raised by any backend client, tagged with the provider it came from
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} backend error: {cause}")]
pub struct BackendError {
    pub provider: Provider,
    pub kind: BackendErrorKind,
    pub cause: String,
}

impl BackendError {
    pub fn new(provider: Provider, kind: BackendErrorKind, cause: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            cause: cause.into(),
        }
    }

    pub fn missing_credential(provider: Provider) -> Self {
        Self::new(provider, BackendErrorKind::MissingCredential, "missing credential")
    }

    pub fn empty_response(provider: Provider) -> Self {
        Self::new(provider, BackendErrorKind::EmptyResponse, "empty response")
    }

    /// Non-success status with the response body truncated for diagnostics
    pub fn status(provider: Provider, status: u16, body: &str) -> Self {
        Self::new(
            provider,
            BackendErrorKind::Status(status),
            format!("API error {}: {}", status, truncate_chars(body, MAX_ERROR_BODY_CHARS)),
        )
    }

    /// Only transient unavailability is worth another attempt
    pub fn is_retryable(&self) -> bool {
        self.kind == BackendErrorKind::Unavailable
    }

    /// Text suitable for showing to the end user
    pub fn to_user_string(&self) -> String {
        match self.kind {
            BackendErrorKind::MissingCredential => format!(
                "No credential configured for {}. Set {} and try again.",
                self.provider,
                self.provider.api_key_env_var()
            ),
            _ => self.to_string(),
        }
    }
}

impl QuizError {
    /// Convert to user-facing string for the interactive host
    pub fn to_user_string(&self) -> String {
        match self {
            QuizError::Backend(e) => e.to_user_string(),
            other => other.to_string(),
        }
    }
}

/// Truncate on a char boundary, keeping at most `max` characters
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_error() {
        let err = BackendError::missing_credential(Provider::HuggingFace);
        assert_eq!(err.kind, BackendErrorKind::MissingCredential);
        assert!(err.to_string().contains("missing credential"));
        assert!(err.to_string().contains("hf"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_missing_credential_user_string_names_env_var() {
        let err = BackendError::missing_credential(Provider::Gemini);
        assert!(err.to_user_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(2000);
        let err = BackendError::status(Provider::HuggingFace, 500, &body);
        assert_eq!(err.kind, BackendErrorKind::Status(500));
        assert!(err.cause.starts_with("API error 500: "));
        assert_eq!(err.cause.len(), "API error 500: ".len() + MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        let err = BackendError::new(Provider::Gemini, BackendErrorKind::Unavailable, "503");
        assert!(err.is_retryable());
        assert!(!BackendError::empty_response(Provider::Gemini).is_retryable());
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_backend_error_converts_to_quiz_error() {
        let err: QuizError = BackendError::empty_response(Provider::HuggingFace).into();
        assert!(matches!(err, QuizError::Backend(_)));
        assert!(err.to_user_string().contains("empty response"));
    }

    #[test]
    fn test_config_error() {
        let err = QuizError::Config("unknown provider".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("unknown provider"));
    }
}
