use std::io::Write;

use clap::Args;
use repricer_app::context::AppContext;

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct AskArgs {
    /// Question about the catalogue and competitor prices
    #[arg(required = true, num_args = 1..)]
    pub(crate) question: Vec<String>,
}

pub(crate) async fn run(
    args: AskArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let response = context.analytics.ask(args.question.join(" ")).await?;

    if response.answer.is_none() {
        return Err(CliError::Failed(response.reply()));
    }

    writeln!(out, "{}", response.reply())?;

    Ok(())
}
