use std::io::{self, Write};

use clap::{Parser, Subcommand, ValueEnum};
use repricer::{listing::ActionTab, products::PriceStatus, settings::SettingsError};
use repricer_app::{
    backend::BackendError,
    board::ActionBoardError,
    config::{ClientConfig, LoggingConfig},
    context::{AppContext, AppInitError},
    render::RenderError,
    views::{Notice, ViewError},
};
use thiserror::Error;

mod ask;
mod board;
mod competitors;
mod products;
mod quote;
mod reprice;
mod settings;
mod stats;

#[derive(Debug, Parser)]
#[command(name = "repricer", about = "Repricing dashboard client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    client: ClientConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show or change the Action Board
    Board(board::BoardArgs),

    /// Show the analytics product listing and queue products for review
    Products(products::ProductsArgs),

    /// Show the competitor overview
    Competitors(competitors::CompetitorsArgs),

    /// Preview a strategy for one pending product
    Quote(quote::QuoteArgs),

    /// Queue a strategy for pending products and submit it
    Reprice(reprice::RepriceArgs),

    /// Show dashboard counts and recent price changes
    Stats,

    /// Show the pricing thresholds, or change them with the flags given
    Settings(settings::SettingsArgs),

    /// Ask the analytics assistant a question
    Ask(ask::AskArgs),
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Board(#[from] ActionBoardError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Failed(String),

    #[error("product {0} is not on this page of the Action Board")]
    NotOnPage(String),
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        Self::Render(RenderError::Io(error))
    }
}

/// Board tab argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TabArg {
    Pending,
    Completed,
}

impl From<TabArg> for ActionTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Pending => ActionTab::Pending,
            TabArg::Completed => ActionTab::Completed,
        }
    }
}

/// Review status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StatusArg {
    Immediate,
    Attention,
    Good,
}

impl From<StatusArg> for PriceStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Immediate => PriceStatus::ImmediateAction,
            StatusArg::Attention => PriceStatus::AttentionNeeded,
            StatusArg::Good => PriceStatus::NoAction,
        }
    }
}

impl Cli {
    /// Parse arguments after loading `.env`.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), CliError> {
        let context = AppContext::from_config(self.client)?;
        let mut out = io::stdout();

        match self.command {
            Commands::Board(args) => board::run(args, &context, &mut out).await,
            Commands::Products(args) => products::run(args, &context, &mut out).await,
            Commands::Competitors(args) => competitors::run(args, &context, &mut out).await,
            Commands::Quote(args) => quote::run(args, &context, &mut out).await,
            Commands::Reprice(args) => reprice::run(args, &context, &mut out).await,
            Commands::Stats => stats::run(&context, &mut out).await,
            Commands::Settings(args) => settings::run(args, &context, &mut out).await,
            Commands::Ask(args) => ask::run(args, &context, &mut out).await,
        }
    }
}

/// Print a success notice; an error notice fails the command.
fn report(out: &mut impl Write, notice: Notice) -> Result<(), CliError> {
    if notice.is_error() {
        return Err(CliError::Failed(notice.message));
    }

    writeln!(out, "{notice}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use repricer::pricing::PricingStrategy;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reprice_takes_strategy_value_and_ids() -> TestResult {
        let cli = Cli::try_parse_from([
            "repricer",
            "--api-url",
            "http://pricing.test/api",
            "reprice",
            "undercut",
            "--value",
            "5",
            "rice-5kg",
            "oats-1kg",
        ])?;

        let Commands::Reprice(args) = cli.command else {
            return Err("expected the reprice command".into());
        };

        assert_eq!(args.strategy, PricingStrategy::Undercut);
        assert_eq!(args.value.as_deref(), Some("5"));
        assert_eq!(args.ids, ["rice-5kg", "oats-1kg"]);

        Ok(())
    }

    #[test]
    fn settings_flags_parse_as_decimals() -> TestResult {
        let cli = Cli::try_parse_from([
            "repricer",
            "settings",
            "--overprice-threshold",
            "1.25",
            "--confidence-medium",
            "0.7",
        ])?;

        let Commands::Settings(args) = cli.command else {
            return Err("expected the settings command".into());
        };

        assert_eq!(args.overprice_threshold, Some(Decimal::new(125, 2)));
        assert_eq!(args.confidence_medium, Some(Decimal::new(7, 1)));
        assert_eq!(args.confidence_high, None);

        Ok(())
    }

    #[test]
    fn ask_joins_the_question_words() -> TestResult {
        let cli = Cli::try_parse_from(["repricer", "ask", "who", "undercuts", "us?"])?;

        let Commands::Ask(args) = cli.command else {
            return Err("expected the ask command".into());
        };

        assert_eq!(args.question.join(" "), "who undercuts us?");
        assert!(Cli::try_parse_from(["repricer", "ask"]).is_err());

        Ok(())
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["repricer", "quote", "rice-5kg", "discount"]).is_err());
    }

    #[test]
    fn status_arguments_map_to_review_statuses() {
        assert_eq!(
            PriceStatus::from(StatusArg::Attention),
            PriceStatus::AttentionNeeded
        );
        assert_eq!(ActionTab::from(TabArg::Completed), ActionTab::Completed);
    }

    #[test]
    fn error_notices_fail_the_command() {
        let mut out = Vec::new();

        assert!(matches!(
            report(&mut out, Notice::error("Failed to add items")),
            Err(CliError::Failed(message)) if message == "Failed to add items"
        ));
        assert!(out.is_empty());
    }
}
