//! Bearer credentials.
//!
//! A [`CredentialProvider`] produces the [`BearerToken`] every remote call is
//! authorized with. The token is acquired once per run and reused.

use std::fmt;

use crate::error::{ProviderError, ProviderResult};
use crate::service::BoxFuture;

/// An OAuth access token for the calendar service.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps an access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Something that can produce an access token.
pub trait CredentialProvider: Send + Sync {
    /// Acquires a token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthenticationFailed`](crate::ProviderErrorCode::AuthenticationFailed)
    /// error when no token can be obtained.
    fn acquire(&self) -> BoxFuture<'_, ProviderResult<BearerToken>>;
}

/// A token supplied up front, e.g. from `TEAMSATTEND_ACCESS_TOKEN`.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Creates a provider returning the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

impl CredentialProvider for StaticToken {
    fn acquire(&self) -> BoxFuture<'_, ProviderResult<BearerToken>> {
        Box::pin(async move {
            let token = self.token.trim();
            if token.is_empty() {
                return Err(ProviderError::authentication("access token is empty"));
            }
            Ok(BearerToken::new(token))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn token_debug_is_redacted() {
        let token = BearerToken::new("eyJ0eXAiOiJKV1Qi");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ0"));
        assert_eq!(token.secret(), "eyJ0eXAiOiJKV1Qi");

        let provider = StaticToken::new("eyJ0eXAiOiJKV1Qi");
        assert!(!format!("{:?}", provider).contains("eyJ0"));
    }

    #[tokio::test]
    async fn static_token_acquire() {
        let token = StaticToken::new(" abc \n").acquire().await.unwrap();
        assert_eq!(token.secret(), "abc");
    }

    #[tokio::test]
    async fn empty_static_token_fails() {
        let err = StaticToken::new("  ").acquire().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    }
}
