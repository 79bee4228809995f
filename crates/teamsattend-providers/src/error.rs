//! Error types for calendar service operations.
//!
//! Every stage of the pipeline reports failures as a [`ProviderError`]. The
//! [`ProviderErrorCode`] tells callers whether a failure is worth prompting
//! the user again for ([`ProviderErrorCode::NotFound`]) or ends the run.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credential acquisition failed.
    AuthenticationFailed,
    /// A remote call did not succeed: a non-success status, or the request
    /// never completed (connection failure, timeout).
    RemoteFetch,
    /// The requested event does not exist.
    NotFound,
    /// A successful response lacks a field the contract guarantees.
    MalformedResponse,
    /// Configuration error - missing or invalid config.
    ConfigurationError,
    /// Internal provider error - unexpected state, bug.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns true if the caller can recover by asking for different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::RemoteFetch => "remote_fetch",
            Self::NotFound => "not_found",
            Self::MalformedResponse => "malformed_response",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the calendar service.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// HTTP status of the failed response, when there was one.
    status: Option<u16>,
    /// Body of the failed response, kept for diagnostics.
    body: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates an error for a response with a non-success status.
    pub fn remote_fetch(status: u16, body: impl Into<String>) -> Self {
        let mut err = Self::new(
            ProviderErrorCode::RemoteFetch,
            format!("remote service returned status {}", status),
        );
        err.status = Some(status);
        err.body = Some(body.into());
        err
    }

    /// Creates an error for a request that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RemoteFetch, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MalformedResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the response body, if the error came from a response.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns true if the caller can recover by asking for different input.
    pub fn is_recoverable(&self) -> bool {
        self.code.is_recoverable()
    }

    /// Returns true if the service answered that the addressed item does not
    /// exist.
    ///
    /// Graph answers 404 for unknown ids and 400 `ErrorInvalidIdMalformed`
    /// for strings that cannot be an id at all.
    pub fn signals_missing_item(&self) -> bool {
        if self.code != ProviderErrorCode::RemoteFetch {
            return false;
        }
        match self.status {
            Some(404) => true,
            Some(400) => self
                .body
                .as_deref()
                .is_some_and(|b| b.contains("ErrorInvalidIdMalformed")),
            _ => false,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(body) = self.body.as_deref().filter(|b| !b.trim().is_empty()) {
            write!(f, ": {}", body.trim())?;
        }
        Ok(())
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_recoverable() {
        assert!(ProviderErrorCode::NotFound.is_recoverable());
        assert!(!ProviderErrorCode::RemoteFetch.is_recoverable());
        assert!(!ProviderErrorCode::MalformedResponse.is_recoverable());
        assert!(!ProviderErrorCode::AuthenticationFailed.is_recoverable());
    }

    #[test]
    fn error_code_display() {
        assert_eq!(
            ProviderErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(
            ProviderErrorCode::MalformedResponse.to_string(),
            "malformed_response"
        );
    }

    #[test]
    fn remote_fetch_carries_status_and_body() {
        let err = ProviderError::remote_fetch(503, "{\"error\":\"busy\"}");
        assert_eq!(err.code(), ProviderErrorCode::RemoteFetch);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.body(), Some("{\"error\":\"busy\"}"));

        let display = err.to_string();
        assert!(display.contains("remote_fetch"));
        assert!(display.contains("503"));
        assert!(display.contains("busy"));
    }

    #[test]
    fn transport_has_no_status() {
        let err = ProviderError::transport("request timeout");
        assert_eq!(err.code(), ProviderErrorCode::RemoteFetch);
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "remote_fetch: request timeout");
    }

    #[test]
    fn missing_item_detection() {
        assert!(ProviderError::remote_fetch(404, "").signals_missing_item());
        assert!(
            ProviderError::remote_fetch(400, r#"{"error":{"code":"ErrorInvalidIdMalformed"}}"#)
                .signals_missing_item()
        );
        assert!(!ProviderError::remote_fetch(400, "bad filter").signals_missing_item());
        assert!(!ProviderError::remote_fetch(500, "").signals_missing_item());
        assert!(!ProviderError::not_found("gone").signals_missing_item());
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("socket closed");
        let err = ProviderError::transport("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
