//! Listings
//!
//! Paging and ordering of the listings shown on the Action Board and the
//! competitor table.

use std::cmp::Ordering;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    actions::ActionQueue,
    filters::SortOrder,
    pricing::PricingStrategy,
    products::{Product, ProductId},
};

/// Competitor rows shown per client-side page.
pub const COMPETITOR_PAGE_SIZE: usize = 20;

/// Server-side pagination block of a listing response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Items matching the query
    pub total: u64,

    /// Number of pages at the current limit
    #[serde(rename = "totalPages")]
    pub total_pages: u32,

    /// Items per page
    pub limit: u32,
}

impl Pagination {
    /// Whether a page after `page` exists.
    pub fn has_next(&self, page: u32) -> bool {
        page < self.total_pages
    }
}

/// A page to request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,

    /// Items per page
    pub limit: u32,
}

impl PageRequest {
    /// First page at `limit` items per page.
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }

    /// The same limit at another page, clamped to at least 1.
    #[must_use]
    pub fn at(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Query parameters for the page.
    pub fn to_query_pairs(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Action Board tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionTab {
    /// Products waiting for a price change
    #[default]
    Pending,

    /// Products whose price change has been applied
    Completed,
}

impl ActionTab {
    /// Wire name used as `tab_status`.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionTab::Pending => "PENDING",
            ActionTab::Completed => "COMPLETED",
        }
    }

    /// Ordering the tab opens with.
    pub fn default_sort(self) -> ActionSort {
        let column = match self {
            ActionTab::Pending => ActionSortColumn::AddedAt,
            ActionTab::Completed => ActionSortColumn::HistoryCreatedAt,
        };

        ActionSort {
            column,
            order: SortOrder::Desc,
        }
    }
}

/// A product on the Action Board with its latest history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionProduct {
    /// The product record
    #[serde(flatten)]
    pub product: Product,

    /// Strategy of the last applied change
    pub history_action_type: Option<PricingStrategy>,

    /// When the last change was applied
    pub history_created_at: Option<Timestamp>,

    /// Standardized price before the last change
    #[serde(with = "rust_decimal::serde::float_option")]
    pub history_old_price: Option<Decimal>,

    /// Standardized price after the last change
    #[serde(with = "rust_decimal::serde::float_option")]
    pub history_new_price: Option<Decimal>,

    /// When the product was put on the board
    pub added_at: Option<Timestamp>,
}

impl ActionProduct {
    /// Identifier of the underlying product.
    pub fn id(&self) -> &ProductId {
        &self.product.product_id
    }
}

/// Columns the Action Board can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSortColumn {
    /// Product title
    Title,

    /// Our display price
    DisplayPrice,

    /// The queued standardized price
    NewPrice,

    /// The cheapest competitor's display price
    CompetitorPrice,

    /// Worse index
    WorseIndex,

    /// Price before the last change
    HistoryOldPrice,

    /// Price after the last change
    HistoryNewPrice,

    /// When the last change was applied
    HistoryCreatedAt,

    /// When the product was added to the board
    AddedAt,
}

/// Current ordering of the Action Board page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSort {
    /// Column
    pub column: ActionSortColumn,

    /// Direction
    pub order: SortOrder,
}

impl ActionSort {
    /// Sort by `column`; the active ascending column flips to descending.
    #[must_use]
    pub fn toggled(self, column: ActionSortColumn) -> Self {
        let order = if self.column == column && self.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };

        Self { column, order }
    }
}

fn decimal_or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or_default()
}

fn compare_by(
    column: ActionSortColumn,
    queue: &ActionQueue,
    a: &ActionProduct,
    b: &ActionProduct,
) -> Ordering {
    match column {
        ActionSortColumn::Title => a
            .product
            .title
            .as_deref()
            .unwrap_or_default()
            .cmp(b.product.title.as_deref().unwrap_or_default()),
        ActionSortColumn::DisplayPrice => a.product.shelf_price().cmp(&b.product.shelf_price()),
        ActionSortColumn::NewPrice => decimal_or_zero(queue.new_price(a.id()))
            .cmp(&decimal_or_zero(queue.new_price(b.id()))),
        ActionSortColumn::CompetitorPrice => {
            decimal_or_zero(a.product.cheapest_match_display_price)
                .cmp(&decimal_or_zero(b.product.cheapest_match_display_price))
        }
        ActionSortColumn::WorseIndex => decimal_or_zero(a.product.worse_index)
            .cmp(&decimal_or_zero(b.product.worse_index)),
        ActionSortColumn::HistoryOldPrice => {
            decimal_or_zero(a.history_old_price).cmp(&decimal_or_zero(b.history_old_price))
        }
        ActionSortColumn::HistoryNewPrice => {
            decimal_or_zero(a.history_new_price).cmp(&decimal_or_zero(b.history_new_price))
        }
        ActionSortColumn::HistoryCreatedAt => a
            .history_created_at
            .unwrap_or(Timestamp::UNIX_EPOCH)
            .cmp(&b.history_created_at.unwrap_or(Timestamp::UNIX_EPOCH)),
        ActionSortColumn::AddedAt => a
            .added_at
            .unwrap_or(Timestamp::UNIX_EPOCH)
            .cmp(&b.added_at.unwrap_or(Timestamp::UNIX_EPOCH)),
    }
}

/// Order a loaded page in place. Missing numbers sort as zero, missing
/// timestamps as the epoch; ties keep their server order.
pub fn sort_action_products(products: &mut [ActionProduct], sort: ActionSort, queue: &ActionQueue) {
    products.sort_by(|a, b| {
        let ordering = compare_by(sort.column, queue, a, b);

        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Client-side paging over a fully loaded competitor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompetitorPager {
    page: usize,
}

impl Default for CompetitorPager {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl CompetitorPager {
    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of pages for `len` rows; at least one.
    pub fn total_pages(len: usize) -> usize {
        len.div_ceil(COMPETITOR_PAGE_SIZE).max(1)
    }

    /// Move to `page`, clamped into range for `len` rows.
    pub fn go_to(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, Self::total_pages(len));
    }

    /// Back to the first page, e.g. after the table was reloaded.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Rows on the current page.
    pub fn rows<'a, T>(&self, rows: &'a [T]) -> impl Iterator<Item = &'a T> {
        rows.iter()
            .skip(self.page.saturating_sub(1).saturating_mul(COMPETITOR_PAGE_SIZE))
            .take(COMPETITOR_PAGE_SIZE)
    }
}
