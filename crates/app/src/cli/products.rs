use std::io::Write;

use clap::Args;
use repricer::{
    filters::FilterField,
    products::{PriceStatus, ProductId},
};
use repricer_app::{
    context::{AppContext, AppInitError},
    render::write_products,
};

use crate::cli::{CliError, StatusArg, report};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Page to show
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Free text search
    #[arg(long)]
    search: Option<String>,

    /// Review status to include (repeatable)
    #[arg(long, value_enum)]
    status: Vec<StatusArg>,

    /// Category to include (repeatable)
    #[arg(long)]
    category: Vec<String>,

    /// Competitor to include (repeatable)
    #[arg(long)]
    competitor: Vec<String>,

    /// Column to sort by; repeating the current column flips the order
    #[arg(long)]
    sort_by: Option<String>,

    /// Put these products on the Action Board
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["add_all", "add_status"])]
    add: Vec<String>,

    /// Put every matching product on the Action Board
    #[arg(long, conflicts_with = "add_status")]
    add_all: bool,

    /// Put every matching product with this review status on the Action Board
    #[arg(long, value_enum)]
    add_status: Option<StatusArg>,

    /// Print an export link for the selection instead of adding it
    #[arg(long, conflicts_with = "add_status")]
    export: bool,
}

pub(crate) async fn run(
    args: ProductsArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut filters = context
        .config
        .saved_filters()
        .map_err(AppInitError::from)?;

    if let Some(search) = args.search {
        filters.search = search;
    }

    for status in args.status {
        filters.toggle_value(FilterField::Status, PriceStatus::from(status).as_str());
    }

    for category in &args.category {
        filters.toggle_value(FilterField::Category, category);
    }

    for competitor in &args.competitor {
        filters.toggle_value(FilterField::Competitor, competitor);
    }

    if let Some(column) = &args.sort_by {
        filters.toggle_sort(column);
    }

    let mut view = context.analytics_view_with(filters);

    context.board.load().await?;
    view.reload_products().await?;

    if args.page > 1 {
        view.set_page(args.page).await?;
    }

    for id in &args.add {
        view.toggle_item(&ProductId::from(id.as_str()));
    }

    if args.add_all {
        view.select_all_matching();
    }

    if args.export {
        writeln!(out, "{}", view.export_url()?)?;

        return Ok(());
    }

    if !args.add.is_empty() || args.add_all {
        let notice = view.add_selection_to_board().await;
        report(out, notice)?;
    }

    if let Some(status) = args.add_status {
        let notice = view.bulk_add_status(status.into()).await;
        report(out, notice)?;
    }

    write_products(out, view.products(), view.page())?;

    Ok(())
}
