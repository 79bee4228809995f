//! Configuration commands.

use std::path::Path;

use crate::config::{ClientConfig, IdentityOverrides};
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// Secret references are resolved, so a missing variable or `pass` entry
/// shows up here.
pub fn validate(config: &ClientConfig, overrides: IdentityOverrides<'_>) -> ClientResult<()> {
    let graph = config
        .graph
        .to_provider_config(overrides, true)
        .map_err(ClientError::Config)?;
    println!("Graph identity resolved (tenant {}).", graph.tenant_id);
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphSettings;

    #[test]
    fn validate_reports_missing_identity() {
        let err = validate(&ClientConfig::default(), IdentityOverrides::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(ref msg) if msg.contains("identity not found")));
    }

    #[test]
    fn validate_accepts_complete_config() {
        let config = ClientConfig {
            graph: GraphSettings {
                tenant_id: Some("contoso".to_string()),
                client_id: Some("app-1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate(&config, IdentityOverrides::default()).is_ok());
    }

    #[test]
    fn validate_surfaces_unresolvable_reference() {
        let config = ClientConfig {
            graph: GraphSettings {
                tenant_id: Some("env::_TEAMSATTEND_UNSET_TENANT_98765".to_string()),
                client_id: Some("app-1".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate(&config, IdentityOverrides::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(ref msg) if msg.contains("tenant_id")));
    }
}
