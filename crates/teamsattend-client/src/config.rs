//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/teamsattend/config.toml` by default.
//!
//! Identity values (`tenant_id`, `client_id`) support secret references:
//! - `pass::path/in/store` - resolved via `pass show`
//! - `env::VAR_NAME` - resolved from the environment
//! - plain text - used as-is

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use teamsattend_core::{FormatOptions, OutputFormat};
use teamsattend_providers::GraphConfig;

/// Configuration for the teamsattend client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Microsoft Graph settings.
    pub graph: GraphSettings,

    /// Output settings.
    pub output: OutputSettings,
}

/// Microsoft Graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Azure AD tenant id (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Application (client) id (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Graph API root.
    pub base_url: String,

    /// Identity platform root.
    pub authority: String,

    /// OAuth scopes to request.
    pub scopes: Vec<String>,

    /// Request timeout in seconds.
    pub timeout: u64,

    /// Open the sign-in page in a browser.
    pub open_browser: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            base_url: GraphConfig::DEFAULT_BASE_URL.to_string(),
            authority: GraphConfig::DEFAULT_AUTHORITY.to_string(),
            scopes: vec![GraphConfig::DEFAULT_SCOPE.to_string()],
            timeout: GraphConfig::DEFAULT_TIMEOUT_SECS,
            open_browser: false,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format.
    pub format: OutputFormat,

    /// Maximum subject length in the event list (truncated with ellipsis).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_subject_length: Option<usize>,
}

impl OutputSettings {
    /// Returns the formatting options, with a CLI override for the subject length.
    pub fn format_options(&self, max_subject_length: Option<usize>) -> FormatOptions {
        FormatOptions {
            max_subject_length: max_subject_length.or(self.max_subject_length),
            ..FormatOptions::default()
        }
    }
}

/// Tenant and client id given outside the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityOverrides<'a> {
    /// Tenant id from `--tenant-id` / `TEAMSATTEND_TENANT_ID`.
    pub tenant_id: Option<&'a str>,
    /// Client id from `--client-id` / `TEAMSATTEND_CLIENT_ID`.
    pub client_id: Option<&'a str>,
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("teamsattend")
    }
}

impl GraphSettings {
    /// Converts to provider configuration.
    ///
    /// Overrides win over file values; file values are passed through
    /// `secret::resolve()`. With `require_identity`, a missing tenant or
    /// client id is an error.
    pub fn to_provider_config(
        &self,
        overrides: IdentityOverrides<'_>,
        require_identity: bool,
    ) -> Result<GraphConfig, String> {
        let tenant_id = resolve_identity("tenant_id", overrides.tenant_id, &self.tenant_id)?;
        let client_id = resolve_identity("client_id", overrides.client_id, &self.client_id)?;

        if require_identity && (tenant_id.is_none() || client_id.is_none()) {
            return Err(format!(
                "Graph identity not found. Add to {}:\n  \
                 [graph]\n  \
                 tenant_id = \"YOUR_TENANT_ID\"\n  \
                 client_id = \"YOUR_APP_CLIENT_ID\"\n\n  \
                 Or pass --tenant-id and --client-id",
                ClientConfig::default_path().display()
            ));
        }

        let config = GraphConfig::new(
            tenant_id.unwrap_or_default(),
            client_id.unwrap_or_default(),
        )
        .with_base_url(&self.base_url)
        .with_authority(&self.authority)
        .with_scopes(self.scopes.clone())
        .with_timeout(Duration::from_secs(self.timeout))
        .with_open_browser(self.open_browser);

        config
            .validate(require_identity)
            .map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn resolve_identity(
    name: &str,
    override_value: Option<&str>,
    configured: &Option<String>,
) -> Result<Option<String>, String> {
    if let Some(value) = override_value.filter(|v| !v.trim().is_empty()) {
        return Ok(Some(value.trim().to_string()));
    }
    match configured.as_deref() {
        Some(raw) => crate::secret::resolve(raw)
            .map(|v| Some(v).filter(|v| !v.is_empty()))
            .map_err(|e| format!("failed to resolve {}: {}", name, e)),
        None => Ok(None),
    }
}
