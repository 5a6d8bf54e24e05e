//! CLI command definitions and dispatch.

pub mod inspect;
pub mod ls;
pub mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use contrail_common::config::ContrailConfig;

/// contrail — reconcile container lifecycle notifications into canonical events.
#[derive(Parser, Debug)]
#[command(name = "contrail", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to a JSON configuration file.
    #[arg(long, global = true, env = contrail_common::constants::CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Root of the Docker daemon's state directory.
    #[arg(long, global = true)]
    pub docker_root: Option<PathBuf>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile a JSON-lines notification stream into envelopes on stdout.
    Replay(replay::ReplayArgs),
    /// Show cached metadata for one container.
    Inspect(inspect::InspectArgs),
    /// List the containers the metadata cache is seeded with.
    Ls(ls::LsArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if configuration loading or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Replay(args) => replay::execute(args, config),
        Command::Inspect(args) => inspect::execute(&args, &config),
        Command::Ls(args) => ls::execute(&args, &config),
    }
}

/// Loads the configuration file, if any, and applies flag overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<ContrailConfig> {
    let mut config = match &cli.config {
        Some(path) => ContrailConfig::load(path)?,
        None => ContrailConfig::default(),
    };
    if let Some(root) = &cli.docker_root {
        config.docker_root.clone_from(root);
    }
    config.validate()?;
    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}
