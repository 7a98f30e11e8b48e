//! CLI for healthgate.

mod commands;
pub mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use healthgate_core::config;
use std::process::ExitCode;

use commands::{run_check, run_completions, run_config, CheckArgs};

/// Top-level CLI for healthgate.
#[derive(Debug, Parser)]
#[command(name = "healthgate")]
#[command(about = "healthgate: block until an HTTP endpoint reports healthy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Poll a URL until it answers as expected or the attempts run out.
    ///
    /// Exits 0 when healthy, 1 when all attempts failed, 2 on invalid
    /// input and 130 when interrupted.
    Check(CheckArgs),

    /// Show the defaults file location and its effective values.
    Config,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<ExitCode> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Check(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_check(&cfg, args).await
            }
            CliCommand::Config => {
                run_config()?;
                Ok(ExitCode::SUCCESS)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests;
