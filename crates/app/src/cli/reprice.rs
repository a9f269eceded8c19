use std::io::Write;

use clap::Args;
use repricer::{pricing::PricingStrategy, products::ProductId};
use repricer_app::{context::AppContext, render::write_action_products};

use crate::cli::{CliError, report};

#[derive(Debug, Args)]
pub(crate) struct RepriceArgs {
    /// match, undercut, reduce or manual
    pub(crate) strategy: PricingStrategy,

    /// Percentage for undercut and reduce, display price for manual
    #[arg(long)]
    pub(crate) value: Option<String>,

    /// Products to reprice; every product on the page when omitted
    pub(crate) ids: Vec<String>,

    /// Page of the pending tab to work on
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Show the queued prices without submitting them
    #[arg(long)]
    dry_run: bool,
}

pub(crate) async fn run(
    args: RepriceArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut view = context.action_board_view();
    view.reload().await?;

    if args.page > 1 {
        view.set_page(args.page).await?;
    }

    let ids: Vec<ProductId> = args.ids.into_iter().map(ProductId::from).collect();

    if ids.is_empty() {
        view.toggle_page();
    } else {
        for id in &ids {
            view.toggle_item(id);
        }
    }

    let notice = view.apply_bulk(args.strategy, args.value.as_deref().unwrap_or_default());
    report(out, notice)?;

    write_action_products(out, view.products(), view.queue())?;

    if args.dry_run {
        return Ok(());
    }

    report(out, view.submit(&ids).await)
}
