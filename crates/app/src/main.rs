//! Repricer command-line client

use std::process::ExitCode;

use repricer_app::observability;
use tracing::error;

use crate::cli::Cli;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(parse_error) => {
            _ = parse_error.print();

            return if parse_error.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(init_error) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(command_error) => {
            error!(%command_error, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "the failure is reported to the operator as well as logged"
            )]
            {
                eprintln!("{command_error}");
            }

            ExitCode::FAILURE
        }
    }
}
