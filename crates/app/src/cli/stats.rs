use std::io::Write;

use repricer_app::{context::AppContext, render::write_stats};

use crate::cli::CliError;

pub(crate) async fn run(context: &AppContext, out: &mut impl Write) -> Result<(), CliError> {
    let stats = context.analytics.dashboard_stats().await?;

    write_stats(out, &stats)?;

    Ok(())
}
