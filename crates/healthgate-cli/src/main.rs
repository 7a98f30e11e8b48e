use std::process::ExitCode;

use healthgate_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging as early as possible; stdout carries the report.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("healthgate error: {:#}", err);
            ExitCode::from(cli::report::EXIT_ERROR)
        }
    }
}
