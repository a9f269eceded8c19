use std::io::Write;

use clap::Args;
use repricer::listing::CompetitorPager;
use repricer_app::{
    context::AppContext,
    render::{write_competitors, write_products},
    views::AnalyticsTab,
};

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct CompetitorsArgs {
    /// Page of the competitor table to show
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Show the products matched against this competitor instead
    #[arg(long)]
    drill_down: Option<String>,
}

pub(crate) async fn run(
    args: CompetitorsArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut view = context.analytics_view()?;

    if let Some(competitor) = &args.drill_down {
        context.board.load().await?;
        view.drill_down(competitor).await?;

        write_products(out, view.products(), view.page())?;

        return Ok(());
    }

    view.switch_tab(AnalyticsTab::Competitors).await?;
    view.set_competitor_page(args.page);

    write_competitors(
        out,
        view.competitor_rows(),
        view.competitor_page(),
        CompetitorPager::total_pages(view.competitors().competitors.len()),
    )?;

    if let Some(cheapest) = &view.competitors().summary.cheapest_competitor {
        writeln!(
            out,
            "Cheapest most often: {} ({} products)",
            cheapest.name, cheapest.count
        )?;
    }

    Ok(())
}
