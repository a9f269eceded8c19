//! Terminal tables

use std::{io, ops::Range};

use repricer::{
    actions::ActionQueue,
    analytics::{CompetitorStats, DashboardStats, ProductPage},
    listing::ActionProduct,
    pricing::derived_display_price,
    products::{PriceStatus, ProductId},
    settings::Settings,
};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

/// Errors writing a table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output stream rejected the write.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Price cell: two decimal places, `-` when unknown.
pub fn format_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |price| price.round_dp(2).to_string())
}

fn status_color(status: Option<PriceStatus>) -> Option<Color> {
    match status? {
        PriceStatus::ImmediateAction => Some(Color::FG_RED),
        PriceStatus::AttentionNeeded => Some(Color::FG_YELLOW),
        PriceStatus::NoAction => Some(Color::FG_GREEN),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Columns<Range<usize>>,
    colors: Vec<(usize, usize, Color)>,
) -> Result<(), RenderError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(right_aligned, Alignment::right());

    for (row, col, color) in colors {
        table.modify((row, col), color);
    }

    writeln!(out, "{table}")?;

    Ok(())
}

/// Products on the pending Action Board, one per line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_board(out: &mut impl io::Write, ids: &[ProductId]) -> Result<(), RenderError> {
    if ids.is_empty() {
        writeln!(out, "Action Board is empty")?;
        return Ok(());
    }

    for id in ids {
        writeln!(out, "{id}")?;
    }

    writeln!(out, "\n{} products on the Action Board", ids.len())?;

    Ok(())
}

/// One analytics page with its paging footer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_products(
    out: &mut impl io::Write,
    page: &ProductPage,
    page_number: u32,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();
    let mut colors = Vec::new();

    builder.push_record([
        "Product", "Title", "Category", "Price", "Cheapest", "Index", "Status",
    ]);

    for (row, product) in page.products.iter().enumerate() {
        builder.push_record([
            product.product_id.to_string(),
            product.title.clone().unwrap_or_default(),
            product.category.clone().unwrap_or_default(),
            format_price(product.display_price),
            format_price(product.cheapest_match_display_price),
            format_price(product.worse_index),
            product
                .status
                .map(|status| status.to_string())
                .unwrap_or_default(),
        ]);

        if let Some(color) = status_color(product.status) {
            colors.push((row + 1, 6, color));
        }
    }

    write_table(out, builder, Columns::new(3..6), colors)?;

    writeln!(
        out,
        "Page {page_number} of {}, {} matching products",
        page.pagination.total_pages.max(1),
        page.summary.total_products
    )?;

    Ok(())
}

/// One client-side page of the competitor table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_competitors<'a>(
    out: &mut impl io::Write,
    rows: impl IntoIterator<Item = &'a CompetitorStats>,
    page: usize,
    total_pages: usize,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();

    builder.push_record([
        "Competitor",
        "Matches",
        "Wins",
        "Win rate",
        "Cheaper than us",
        "Cheaper %",
    ]);

    for row in rows {
        builder.push_record([
            row.vendor.clone(),
            row.matches.to_string(),
            row.win_count.to_string(),
            format_price(row.win_rate),
            row.cheaper_than_us.to_string(),
            format_price(row.cheaper_than_us_pct),
        ]);
    }

    write_table(out, builder, Columns::new(1..6), Vec::new())?;

    writeln!(out, "Page {page} of {total_pages}")?;

    Ok(())
}

/// Action Board rows with the queued strategy and derived prices.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_action_products(
    out: &mut impl io::Write,
    products: &[ActionProduct],
    queue: &ActionQueue,
) -> Result<(), RenderError> {
    let mut builder = Builder::default();
    let mut colors = Vec::new();

    builder.push_record([
        "Product",
        "Title",
        "Price",
        "Cheapest",
        "Strategy",
        "New price",
        "New display",
    ]);

    for (row, entry) in products.iter().enumerate() {
        let product = &entry.product;
        let action = queue.get(entry.id());
        let new_price = action.and_then(|action| action.new_price);

        builder.push_record([
            product.product_id.to_string(),
            product.title.clone().unwrap_or_default(),
            format_price(product.display_price),
            format_price(product.cheapest_match_display_price),
            action
                .map(|action| action.strategy.to_string())
                .unwrap_or_default(),
            format_price(new_price),
            format_price(derived_display_price(product, new_price)),
        ]);

        if action.is_some() && new_price.is_none() {
            colors.push((row + 1, 5, Color::FG_RED));
        }
    }

    write_table(out, builder, Columns::new(2..7), colors)
}

/// Dashboard counts and the recent price changes.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_stats(out: &mut impl io::Write, stats: &DashboardStats) -> Result<(), RenderError> {
    let status = stats.analytics.status;
    let shares = status.shares();

    let mut builder = Builder::default();

    builder.push_record(["Metric", "Count", "Share"]);
    builder.push_record([
        "Products".to_string(),
        stats.analytics.total_products.to_string(),
        String::new(),
    ]);
    builder.push_record([
        "Immediate action".to_string(),
        status.immediate.to_string(),
        format!("{:.1}%", shares.immediate),
    ]);
    builder.push_record([
        "Attention needed".to_string(),
        status.attention.to_string(),
        format!("{:.1}%", shares.attention),
    ]);
    builder.push_record([
        "No action".to_string(),
        status.good.to_string(),
        format!("{:.1}%", shares.good),
    ]);
    builder.push_record([
        "Pending actions".to_string(),
        stats.actions.pending.to_string(),
        String::new(),
    ]);
    builder.push_record([
        "Completed actions".to_string(),
        stats.actions.completed.to_string(),
        String::new(),
    ]);

    let colors = vec![
        (2, 0, Color::FG_RED),
        (3, 0, Color::FG_YELLOW),
        (4, 0, Color::FG_GREEN),
    ];

    write_table(out, builder, Columns::new(1..3), colors)?;

    if stats.history.is_empty() {
        return Ok(());
    }

    let mut history = Builder::default();

    history.push_record(["Product", "Change", "Old", "New", "When"]);

    for entry in &stats.history {
        history.push_record([
            entry.title().to_string(),
            entry
                .change_type
                .map(|strategy| strategy.to_string())
                .unwrap_or_default(),
            format_price(entry.old_price),
            format_price(entry.new_price),
            entry
                .created_at
                .map(|at| at.to_string())
                .unwrap_or_default(),
        ]);
    }

    write_table(out, history, Columns::new(2..4), Vec::new())
}

/// Thresholds with the confidence range each band covers.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_settings(out: &mut impl io::Write, settings: &Settings) -> Result<(), RenderError> {
    let step = Decimal::new(1, 2);
    let mut builder = Builder::default();

    builder.push_record(["Setting", "Value"]);
    builder.push_record([
        "Overprice threshold".to_string(),
        format!("{:.2}", settings.overprice_threshold),
    ]);
    builder.push_record([
        "Low confidence".to_string(),
        format!(
            "0.00 - {:.2}",
            settings.confidence_medium.saturating_sub(step)
        ),
    ]);
    builder.push_record([
        "Medium confidence".to_string(),
        format!(
            "{:.2} - {:.2}",
            settings.confidence_medium,
            settings.confidence_high.saturating_sub(step)
        ),
    ]);
    builder.push_record([
        "High confidence".to_string(),
        format!("{:.2} - 1.00", settings.confidence_high),
    ]);

    let colors = vec![(1, 0, Color::FG_RED), (4, 0, Color::FG_GREEN)];

    write_table(out, builder, Columns::new(1..2), colors)
}

#[cfg(test)]
mod tests {
    use repricer::{
        analytics::{ActionCounts, DashboardAnalytics, HistoryEntry, StatusCounts},
        pricing::PricingStrategy,
        products::Product,
    };
    use testresult::TestResult;

    use super::*;

    fn rendered(write: impl FnOnce(&mut Vec<u8>) -> Result<(), RenderError>) -> TestResult<String> {
        let mut out = Vec::new();
        write(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn prices_round_to_cents() {
        assert_eq!(format_price(Some(Decimal::new(12_345, 3))), "12.35");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn empty_board_says_so() -> TestResult {
        let text = rendered(|out| write_board(out, &[]))?;

        assert_eq!(text, "Action Board is empty\n");

        Ok(())
    }

    #[test]
    fn board_lists_members_and_count() -> TestResult {
        let ids = [ProductId::from("a"), ProductId::from("b")];
        let text = rendered(|out| write_board(out, &ids))?;

        assert!(text.starts_with("a\nb\n"));
        assert!(text.contains("2 products on the Action Board"));

        Ok(())
    }

    #[test]
    fn product_table_shows_paging_footer() -> TestResult {
        let mut product = Product::new("rice-5kg", Some(Decimal::from(12)), None, None);
        product.title = Some("Rice 5kg".to_string());
        product.status = Some(PriceStatus::AttentionNeeded);

        let mut page = ProductPage::default();
        page.products.push(product);
        page.summary.total_products = 41;
        page.pagination.total_pages = 3;

        let text = rendered(|out| write_products(out, &page, 2))?;

        assert!(text.contains("Rice 5kg"));
        assert!(text.contains("ATTENTION_NEEDED"));
        assert!(text.contains("Page 2 of 3, 41 matching products"));

        Ok(())
    }

    #[test]
    fn action_table_shows_queued_strategy() -> TestResult {
        let product = Product::new(
            "rice-5kg",
            Some(Decimal::from(12)),
            Some(Decimal::from(10)),
            Some(Decimal::from(8)),
        );
        let mut queue = ActionQueue::new();
        queue.set_action(&product, PricingStrategy::Match, "");

        let rows = [ActionProduct {
            product,
            ..ActionProduct::default()
        }];

        let text = rendered(|out| write_action_products(out, &rows, &queue))?;

        assert!(text.contains("MATCH"));
        assert!(text.contains("9.6"));

        Ok(())
    }

    #[test]
    fn competitor_table_lists_vendors() -> TestResult {
        let rows = [CompetitorStats {
            vendor: "Acme".to_string(),
            matches: 12,
            cheaper_than_us: 5,
            ..CompetitorStats::default()
        }];

        let text = rendered(|out| write_competitors(out, &rows, 1, 1))?;

        assert!(text.contains("Acme"));
        assert!(text.contains("Page 1 of 1"));

        Ok(())
    }

    #[test]
    fn stats_include_history() -> TestResult {
        let stats = DashboardStats {
            analytics: DashboardAnalytics {
                total_products: 4,
                status: StatusCounts {
                    immediate: 1,
                    attention: 1,
                    good: 2,
                },
            },
            actions: ActionCounts {
                pending: 3,
                completed: 7,
            },
            history: vec![HistoryEntry {
                change_type: Some(PricingStrategy::Reduce),
                old_price: Some(Decimal::from(10)),
                new_price: Some(Decimal::from(9)),
                ..HistoryEntry::default()
            }],
        };

        let text = rendered(|out| write_stats(out, &stats))?;

        assert!(text.contains("Completed actions"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("Unknown Product"));
        assert!(text.contains("REDUCE"));

        Ok(())
    }

    #[test]
    fn settings_show_confidence_ranges() -> TestResult {
        let text = rendered(|out| write_settings(out, &Settings::default()))?;

        assert!(text.contains("1.10"));
        assert!(text.contains("0.00 - 0.59"));
        assert!(text.contains("0.60 - 0.84"));
        assert!(text.contains("0.85 - 1.00"));

        Ok(())
    }
}
