//! Microsoft Graph provider configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Configuration for the Graph client and device-code sign-in.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Azure AD tenant (directory) id.
    pub tenant_id: String,

    /// Application (client) id of the app registration.
    pub client_id: String,

    /// Graph API root, without trailing slash.
    ///
    /// Defaults to `https://graph.microsoft.com/v1.0`.
    pub base_url: String,

    /// Identity platform root, without trailing slash.
    ///
    /// Defaults to `https://login.microsoftonline.com`.
    pub authority: String,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://graph.microsoft.com/.default"]`.
    pub scopes: Vec<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Whether to open the verification page in a browser during sign-in.
    pub open_browser: bool,
}

impl GraphConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default Graph API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://graph.microsoft.com/v1.0";

    /// Default identity platform root.
    pub const DEFAULT_AUTHORITY: &'static str = "https://login.microsoftonline.com";

    /// Default scope: the app's statically configured Graph permissions.
    pub const DEFAULT_SCOPE: &'static str = "https://graph.microsoft.com/.default";

    /// Creates a configuration for the given tenant and application.
    pub fn new(tenant_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            authority: Self::DEFAULT_AUTHORITY.to_string(),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("teamsattend/{}", env!("CARGO_PKG_VERSION")),
            open_browser: false,
        }
    }

    /// Sets the Graph API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the identity platform root.
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets whether sign-in opens a browser.
    pub fn with_open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    /// Returns the device authorization endpoint.
    pub fn device_code_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/devicecode",
            self.authority, self.tenant_id
        )
    }

    /// Returns the token endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Returns the scopes as the space-separated `scope` parameter.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }

    /// Checks that the configuration can be used.
    ///
    /// Tenant and client ids are only needed for sign-in, so pass
    /// `require_identity = false` when a static token is used.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`](crate::ProviderErrorCode::ConfigurationError)
    /// naming the offending setting.
    pub fn validate(&self, require_identity: bool) -> ProviderResult<()> {
        if require_identity {
            if self.tenant_id.trim().is_empty() {
                return Err(ProviderError::configuration("tenant_id is required"));
            }
            if self.client_id.trim().is_empty() {
                return Err(ProviderError::configuration("client_id is required"));
            }
            if self.scopes.is_empty() {
                return Err(ProviderError::configuration(
                    "at least one scope is required",
                ));
            }
            check_http_url("authority", &self.authority)?;
        }
        check_http_url("base_url", &self.base_url)?;
        if self.timeout.is_zero() {
            return Err(ProviderError::configuration(
                "timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn check_http_url(name: &str, value: &str) -> ProviderResult<()> {
    let url = Url::parse(value).map_err(|e| {
        ProviderError::configuration(format!("{} is not a valid URL: {}", name, e))
            .with_source(e)
    })?;
    match url.scheme() {
        "https" | "http" => Ok(()),
        other => Err(ProviderError::configuration(format!(
            "{} must use http or https, not {}",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn defaults() {
        let config = GraphConfig::new("tenant-1", "client-1");
        assert_eq!(config.base_url, "https://graph.microsoft.com/v1.0");
        assert_eq!(config.scopes, vec!["https://graph.microsoft.com/.default"]);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("teamsattend/"));
        assert!(!config.open_browser);
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn endpoints() {
        let config = GraphConfig::new("contoso.onmicrosoft.com", "client-1")
            .with_authority("https://login.example.test/");
        assert_eq!(
            config.device_code_url(),
            "https://login.example.test/contoso.onmicrosoft.com/oauth2/v2.0/devicecode"
        );
        assert_eq!(
            config.token_url(),
            "https://login.example.test/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = GraphConfig::new("t", "c").with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn scope_param_joins_with_spaces() {
        let config = GraphConfig::new("t", "c").with_scopes(vec![
            "Calendars.Read".to_string(),
            "OnlineMeetings.Read".to_string(),
        ]);
        assert_eq!(config.scope_param(), "Calendars.Read OnlineMeetings.Read");
    }

    #[test]
    fn validate_rejects_missing_identity() {
        let config = GraphConfig::new("", "client-1");
        let err = config.validate(true).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert_eq!(err.message(), "tenant_id is required");
        assert!(config.validate(false).is_ok());

        let config = GraphConfig::new("tenant-1", " ");
        assert_eq!(
            config.validate(true).unwrap_err().message(),
            "client_id is required"
        );
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let config = GraphConfig::new("t", "c").with_base_url("not a url");
        let err = config.validate(false).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert!(err.message().starts_with("base_url is not a valid URL"));
        assert!(std::error::Error::source(&err).is_some());

        let config = GraphConfig::new("t", "c").with_authority("ftp://login.example.test");
        let err = config.validate(true).unwrap_err();
        assert!(err.message().contains("http or https"));
        assert_eq!(
            err.to_string(),
            "configuration_error: authority must use http or https, not ftp"
        );
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = GraphConfig::new("t", "c").with_timeout(Duration::ZERO);
        assert_eq!(
            config.validate(false).unwrap_err().code(),
            ProviderErrorCode::ConfigurationError
        );
    }
}
