//! CLI, configuration, prompts, and the pipeline orchestrator
//!
//! This crate provides the `teamsattend` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use pipeline::{EventSelector, Pipeline, PipelineObserver, PipelineState, Progress};
