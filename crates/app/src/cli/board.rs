use std::io::Write;

use clap::Args;
use repricer::{listing::ActionTab, products::ProductId};
use repricer_app::{
    context::AppContext,
    render::{write_action_products, write_board},
    views::ActionBoardView,
};

use crate::cli::{CliError, TabArg, report};

#[derive(Debug, Args)]
pub(crate) struct BoardArgs {
    /// Show one tab with prices instead of the membership list
    #[arg(long, value_enum)]
    tab: Option<TabArg>,

    /// Page of the tab to show
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Take these products off the board
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["revert", "export"])]
    remove: Vec<String>,

    /// Move these completed products back to pending
    #[arg(long, value_delimiter = ',', conflicts_with = "export")]
    revert: Vec<String>,

    /// Print an export link for these products
    #[arg(long, value_delimiter = ',')]
    export: Vec<String>,
}

fn select(view: &mut ActionBoardView, ids: &[String]) {
    for id in ids {
        view.toggle_item(&ProductId::from(id.as_str()));
    }
}

pub(crate) async fn run(
    args: BoardArgs,
    context: &AppContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut view = context.action_board_view();

    if !args.remove.is_empty() {
        select(&mut view, &args.remove);

        return report(out, view.remove_selected().await);
    }

    if !args.revert.is_empty() {
        view.switch_tab(ActionTab::Completed).await?;
        select(&mut view, &args.revert);

        return report(out, view.revert_selected().await);
    }

    if !args.export.is_empty() {
        select(&mut view, &args.export);
        writeln!(out, "{}", view.export_url()?)?;

        return Ok(());
    }

    let Some(tab) = args.tab else {
        context.board.load().await?;

        write_board(out, &context.board.snapshot().sorted())?;

        return Ok(());
    };

    view.switch_tab(tab.into()).await?;

    if args.page > 1 {
        view.set_page(args.page).await?;
    }

    write_action_products(out, view.products(), view.queue())?;

    let counts = view.counts();

    writeln!(
        out,
        "Page {} of {}, {} pending, {} completed",
        view.page(),
        view.pagination().total_pages.max(1),
        counts.pending,
        counts.completed
    )?;

    Ok(())
}
