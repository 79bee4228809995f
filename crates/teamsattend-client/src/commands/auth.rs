//! Authentication command.

use std::path::Path;

use teamsattend_providers::{CredentialProvider, DeviceCodeFlow};
use tracing::info;

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Runs the device code flow once and reports the outcome.
///
/// With `save`, identity values given on the command line are persisted to
/// `config.toml` under `[graph]`. Values that came from the file are left
/// alone so secret references are never replaced by what they resolve to.
pub async fn run(cli: &Cli, config: &ClientConfig, save: bool) -> ClientResult<()> {
    let mut graph_config = config
        .graph
        .to_provider_config(cli.identity_overrides(), true)
        .map_err(ClientError::Config)?;
    if cli.open_browser {
        graph_config = graph_config.with_open_browser(true);
    }

    println!("Starting Microsoft Graph sign-in...");
    DeviceCodeFlow::new(graph_config)?.acquire().await?;

    info!("device code sign-in successful");
    println!("Authentication successful!");

    if save {
        let path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
        let overrides = cli.identity_overrides();
        let entries: Vec<(&str, &str)> = [
            ("tenant_id", overrides.tenant_id),
            ("client_id", overrides.client_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (key, v)))
        .collect();

        if entries.is_empty() {
            println!("Nothing to save: pass --tenant-id or --client-id.");
        } else {
            save_identity_to_config(&path, &entries)?;
            println!("Identity saved to {}", path.display());
        }
    }

    Ok(())
}

/// Writes `[graph]` keys to a TOML file, keeping everything else as is.
fn save_identity_to_config(path: &Path, entries: &[(&str, &str)]) -> ClientResult<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        ClientError::Config(format!("could not parse {} for writing: {}", path.display(), e))
    })?;

    if !doc.contains_key("graph") {
        doc["graph"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let graph = doc["graph"].as_table_mut().ok_or_else(|| {
        ClientError::Config(format!("`graph` in {} is not a table", path.display()))
    })?;
    for (key, value) in entries {
        graph[*key] = toml_edit::value(*value);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_string())?;
    info!("identity saved to {}", path.display());
    Ok(())
}
