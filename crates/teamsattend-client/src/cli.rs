//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use teamsattend_core::{FilterCriteria, FilterError, LogFormat, OutputFormat};

use crate::config::IdentityOverrides;

/// teamsattend - Look up Teams meeting attendance from your calendar
#[derive(Debug, Parser)]
#[command(name = "teamsattend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "TEAMSATTEND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format on stderr: compact, pretty or json
    #[arg(long, env = "TEAMSATTEND_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    // --- Identity flags ---
    /// Azure AD tenant id (overrides config)
    #[arg(long, env = "TEAMSATTEND_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Application (client) id (overrides config)
    #[arg(long, env = "TEAMSATTEND_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Pre-acquired access token; skips interactive sign-in
    #[arg(long, env = "TEAMSATTEND_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Open the sign-in page in a browser
    #[arg(long)]
    pub open_browser: bool,

    // --- Filter flags ---
    /// Only list events with exactly this subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Only list events starting on or after this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<String>,

    /// Only list events ending on or before this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<String>,

    /// List all events without asking for a filter
    #[arg(long, conflicts_with_all = ["subject", "start", "end"])]
    pub no_filter: bool,

    // --- Selection ---
    /// Event to inspect; asked for interactively when omitted or not found
    #[arg(long)]
    pub event_id: Option<String>,

    // --- Output format flags ---
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Maximum subject length in the event list (truncated with ellipsis)
    #[arg(long)]
    pub max_subject_length: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format, falling back to the configured one.
    pub fn output_format(&self, configured: OutputFormat) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            configured
        }
    }

    /// Returns the tenant and client id given on the command line.
    pub fn identity_overrides(&self) -> IdentityOverrides<'_> {
        IdentityOverrides {
            tenant_id: self.tenant_id.as_deref(),
            client_id: self.client_id.as_deref(),
        }
    }

    /// Returns whether any filter flag was given.
    pub fn has_filter_flags(&self) -> bool {
        self.subject.is_some() || self.start.is_some() || self.end.is_some()
    }

    /// Returns the filter given on the command line, if it decides one.
    ///
    /// `None` means the user should be asked.
    pub fn filter_criteria(&self) -> Result<Option<FilterCriteria>, FilterError> {
        if self.no_filter {
            return Ok(Some(FilterCriteria::none()));
        }
        if !self.has_filter_flags() {
            return Ok(None);
        }
        FilterCriteria::from_input(
            self.subject.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )
        .map(Some)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with the device code flow
    Auth {
        /// Save --tenant-id and --client-id to the configuration file
        #[arg(long)]
        save: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("teamsattend").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_means_ask() {
        let cli = parse(&[]);
        assert!(!cli.has_filter_flags());
        assert_eq!(cli.filter_criteria().unwrap(), None);
        assert!(cli.command.is_none());
    }

    #[test]
    fn filter_flags_build_criteria() {
        let cli = parse(&["--subject", "Sprint Review", "--start", "2024-01-01"]);
        let criteria = cli.filter_criteria().unwrap().unwrap();
        assert_eq!(criteria.subject(), Some("Sprint Review"));
        assert!(criteria.start().is_some());
        assert!(criteria.end().is_none());
    }

    #[test]
    fn bad_date_flag_is_validation_error() {
        let cli = parse(&["--end", "31/01/2024"]);
        assert_eq!(
            cli.filter_criteria().unwrap_err(),
            FilterError::InvalidEndDate("31/01/2024".to_string())
        );
    }

    #[test]
    fn no_filter_conflicts_with_filter_flags() {
        let result = Cli::try_parse_from(["teamsattend", "--no-filter", "--subject", "x"]);
        assert!(result.is_err());

        let cli = parse(&["--no-filter"]);
        assert!(cli.filter_criteria().unwrap().unwrap().is_empty());
    }

    #[test]
    fn json_flag_overrides_config() {
        assert_eq!(parse(&["--json"]).output_format(OutputFormat::Text), OutputFormat::Json);
        assert_eq!(parse(&[]).output_format(OutputFormat::Json), OutputFormat::Json);
        assert_eq!(parse(&[]).output_format(OutputFormat::Text), OutputFormat::Text);
    }

    #[test]
    fn log_format_flag() {
        assert_eq!(parse(&["--log-format", "json"]).log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["teamsattend", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn subcommands() {
        assert!(matches!(
            parse(&["auth", "--save"]).command,
            Some(Command::Auth { save: true })
        ));
        assert!(matches!(
            parse(&["config", "path"]).command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
