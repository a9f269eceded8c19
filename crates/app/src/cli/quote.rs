use std::{io::Write, slice};

use clap::Args;
use repricer::{pricing::PricingStrategy, products::ProductId};
use repricer_app::{context::AppContext, render::write_action_products};

use crate::cli::CliError;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Product to price
    id: String,

    /// match, undercut, reduce or manual
    strategy: PricingStrategy,

    /// Percentage for undercut and reduce, display price for manual
    value: Option<String>,

    /// Page of the pending tab the product is on
    #[arg(long, default_value_t = 1)]
    page: u32,
}

pub(crate) async fn run(
    args: QuoteArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut view = context.action_board_view();
    view.reload().await?;

    if args.page > 1 {
        view.set_page(args.page).await?;
    }

    let id = ProductId::from(args.id);

    if view
        .set_action(&id, args.strategy, args.value.as_deref().unwrap_or_default())
        .is_none()
    {
        return Err(CliError::NotOnPage(id.to_string()));
    }

    let Some(row) = view.products().iter().find(|row| *row.id() == id) else {
        return Err(CliError::NotOnPage(id.to_string()));
    };

    write_action_products(out, slice::from_ref(row), view.queue())?;

    Ok(())
}
