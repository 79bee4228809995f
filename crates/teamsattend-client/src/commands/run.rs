//! The default command: list, select, inspect.

use std::io;

use teamsattend_core::{FilterCriteria, OutputFormat, OutputFormatter};
use teamsattend_providers::{
    CredentialProvider, DeviceCodeFlow, GraphClient, GraphConfig, StaticToken,
};
use tokio::io::BufReader;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::pipeline::{JsonCollector, Pipeline, TextReporter};
use crate::prompt::{PromptSelector, Prompter};

/// Runs the attendance pipeline.
///
/// The filter is settled before any network activity, so a bad date never
/// triggers a sign-in.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let mut prompter = Prompter::new(BufReader::new(tokio::io::stdin()), io::stderr());
    let criteria: FilterCriteria = match cli.filter_criteria()? {
        Some(criteria) => criteria,
        None => prompter.ask_filter().await?,
    };
    debug!(?criteria, "filter settled");

    let graph_config = graph_config(cli, config)?;
    let credentials = credential_provider(cli, &graph_config)?;
    let token = credentials.acquire().await?;
    info!("access token acquired");

    let client = GraphClient::new(&graph_config)?;
    let mut selector = PromptSelector::new(prompter).with_preset(cli.event_id.clone());
    let mut pipeline = Pipeline::new(&client, &token, criteria);

    match cli.output_format(config.output.format) {
        OutputFormat::Text => {
            let formatter =
                OutputFormatter::new(config.output.format_options(cli.max_subject_length));
            let mut reporter = TextReporter::new(formatter, io::stdout());
            pipeline.run(&mut selector, &mut reporter).await
        }
        OutputFormat::Json => {
            let mut collector = JsonCollector::new();
            let result = pipeline.run(&mut selector, &mut collector).await;
            collector.write_to(io::stdout())?;
            result
        }
    }
}

/// Builds the Graph configuration; identity is only required without a token.
fn graph_config(cli: &Cli, config: &ClientConfig) -> ClientResult<GraphConfig> {
    let require_identity = cli.access_token.is_none();
    let graph_config = config
        .graph
        .to_provider_config(cli.identity_overrides(), require_identity)
        .map_err(ClientError::Config)?;
    Ok(if cli.open_browser {
        graph_config.with_open_browser(true)
    } else {
        graph_config
    })
}

fn credential_provider(
    cli: &Cli,
    graph_config: &GraphConfig,
) -> ClientResult<Box<dyn CredentialProvider>> {
    match cli.access_token {
        Some(ref token) => {
            debug!("using access token from the command line or environment");
            Ok(Box::new(StaticToken::new(token.clone())))
        }
        None => Ok(Box::new(DeviceCodeFlow::new(graph_config.clone())?)),
    }
}
