use std::io::Write;

use clap::Args;
use repricer_app::{context::AppContext, render::write_settings};
use rust_decimal::Decimal;
use tracing::info;

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct SettingsArgs {
    /// Lowest match score counted as high confidence (0 to 1)
    #[arg(long)]
    pub(crate) confidence_high: Option<Decimal>,

    /// Lowest match score counted as medium confidence (0 to 1)
    #[arg(long)]
    pub(crate) confidence_medium: Option<Decimal>,

    /// Price index from which a product is flagged as overpriced (1 to 2)
    #[arg(long)]
    pub(crate) overprice_threshold: Option<Decimal>,
}

impl SettingsArgs {
    fn changes_anything(&self) -> bool {
        self.confidence_high.is_some()
            || self.confidence_medium.is_some()
            || self.overprice_threshold.is_some()
    }
}

pub(crate) async fn run(
    args: SettingsArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut settings = context.analytics.settings().await?;

    if args.changes_anything() {
        settings.confidence_high = args.confidence_high.unwrap_or(settings.confidence_high);
        settings.confidence_medium = args.confidence_medium.unwrap_or(settings.confidence_medium);
        settings.overprice_threshold = args
            .overprice_threshold
            .unwrap_or(settings.overprice_threshold);

        settings.validate()?;
        settings = context.analytics.save_settings(settings).await?;

        info!(
            confidence_high = %settings.confidence_high,
            confidence_medium = %settings.confidence_medium,
            overprice_threshold = %settings.overprice_threshold,
            "settings saved"
        );
        writeln!(out, "Settings saved")?;
    }

    write_settings(out, &settings)?;

    Ok(())
}
