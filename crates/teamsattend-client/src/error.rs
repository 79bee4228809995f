//! Client error types.

use std::fmt;

use teamsattend_core::FilterError;
use teamsattend_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Filter input could not be parsed.
    Validation(FilterError),
    /// A pipeline stage or credential provider failed.
    Provider(ProviderError),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Validation(err) => write!(f, "invalid filter: {}", err),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FilterError> for ClientError {
    fn from(err: FilterError) -> Self {
        Self::Validation(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        let err = ClientError::Config("tenant_id is required".to_string());
        assert_eq!(err.to_string(), "configuration error: tenant_id is required");

        let err: ClientError = FilterError::InvalidStartDate("2024-13-01".to_string()).into();
        assert!(err.to_string().starts_with("invalid filter:"));
        assert!(err.to_string().contains("2024-13-01"));

        let err: ClientError = ProviderError::remote_fetch(500, "oops").into();
        assert!(err.to_string().contains("remote_fetch"));
    }

    #[test]
    fn provider_error_is_source() {
        use std::error::Error;
        let err: ClientError = ProviderError::not_found("gone").into();
        assert!(err.source().is_some());
    }
}
