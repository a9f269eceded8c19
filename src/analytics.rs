//! Analytics responses
//!
//! Typed shapes of the analytics, dashboard and action endpoint responses.
//! Numeric fields are optional or defaulted throughout, since the backend
//! omits them for sparse data.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    listing::{ActionProduct, Pagination},
    pricing::PricingStrategy,
    products::Product,
};

/// Summary block of the products listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSummary {
    /// Products matching the filters
    pub total_products: u64,

    /// Products in the database
    pub total_db_count: u64,

    /// Share of the database matching the filters
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total_pct: Option<Decimal>,

    /// Matching products needing immediate action
    pub immediate_action_count: u64,

    /// Share needing immediate action
    #[serde(with = "rust_decimal::serde::float_option")]
    pub immediate_action_pct: Option<Decimal>,

    /// Matching products needing attention
    pub attention_needed_count: u64,

    /// Share needing attention
    #[serde(with = "rust_decimal::serde::float_option")]
    pub attention_needed_pct: Option<Decimal>,
}

/// `GET /analytics/products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPage {
    /// Products on the page
    pub products: Vec<Product>,

    /// Totals for the whole filtered set
    pub summary: ProductSummary,

    /// Paging information
    pub pagination: Pagination,
}

/// `GET /actions/products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionProductPage {
    /// Products on the page
    pub products: Vec<ActionProduct>,

    /// Paging information
    pub pagination: Pagination,
}

/// One competitor row of the competitors tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorStats {
    /// Competitor name
    pub vendor: String,

    /// Listings matched against our products
    pub matches: u64,

    /// Matches where we are cheaper
    pub win_count: u64,

    /// Share of matches we win
    #[serde(with = "rust_decimal::serde::float_option")]
    pub win_rate: Option<Decimal>,

    /// Matches where the competitor is cheaper
    pub cheaper_than_us: u64,

    /// Share of matches where the competitor is cheaper
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cheaper_than_us_pct: Option<Decimal>,
}

/// The competitor that most often undercuts us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheapestCompetitor {
    /// Competitor name
    pub name: String,

    /// Number of products where it is the cheapest
    pub count: u64,
}

/// Summary block of the competitors listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorSummary {
    /// Competitors in the filtered set
    pub total_competitors: u64,

    /// Most frequent cheapest competitor, if any
    pub cheapest_competitor: Option<CheapestCompetitor>,
}

/// `GET /analytics/competitors`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorsPage {
    /// Competitor rows, already sorted by the backend
    pub competitors: Vec<CompetitorStats>,

    /// Totals
    pub summary: CompetitorSummary,
}

/// `GET /analytics/filters`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Known categories
    pub categories: Vec<String>,

    /// Known segments
    pub segments: Vec<String>,

    /// Known collections
    pub collections: Vec<String>,

    /// Known product types
    pub product_types: Vec<String>,

    /// Known competitor vendors
    pub vendors: Vec<String>,
}

impl FilterOptions {
    /// Sort every option list alphabetically.
    pub fn sort(&mut self) {
        for values in [
            &mut self.categories,
            &mut self.segments,
            &mut self.collections,
            &mut self.product_types,
            &mut self.vendors,
        ] {
            values.sort_unstable_by_key(|value| value.to_lowercase());
        }
    }
}

/// Review status counts on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounts {
    /// Products needing immediate action
    pub immediate: u64,

    /// Products needing attention
    pub attention: u64,

    /// Competitively priced products
    pub good: u64,
}

/// Percentage shares of [`StatusCounts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusShares {
    /// Share needing immediate action
    pub immediate: Decimal,

    /// Share needing attention
    pub attention: Decimal,

    /// Share competitively priced
    pub good: Decimal,
}

impl StatusCounts {
    /// Sum of all buckets.
    pub fn total(&self) -> u64 {
        self.immediate
            .saturating_add(self.attention)
            .saturating_add(self.good)
    }

    /// Each bucket as a percentage of the total; all zero when empty.
    pub fn shares(&self) -> StatusShares {
        let total = Decimal::from(self.total());

        let share = |count: u64| {
            Decimal::from(count)
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|scaled| scaled.checked_div(total))
                .unwrap_or_default()
        };

        StatusShares {
            immediate: share(self.immediate),
            attention: share(self.attention),
            good: share(self.good),
        }
    }
}

/// Analytics block of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardAnalytics {
    /// Products imported
    pub total_products: u64,

    /// Review status counts
    pub status: StatusCounts,
}

/// Action Board counts on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCounts {
    /// Products waiting for a price change
    pub pending: u64,

    /// Products repriced
    pub completed: u64,
}

/// A recent price change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    /// Repriced product, if it still exists
    pub product: Option<Product>,

    /// Strategy that was applied
    pub change_type: Option<PricingStrategy>,

    /// Standardized price before the change
    #[serde(with = "rust_decimal::serde::float_option")]
    pub old_price: Option<Decimal>,

    /// Standardized price after the change
    #[serde(with = "rust_decimal::serde::float_option")]
    pub new_price: Option<Decimal>,

    /// When the change was applied
    pub created_at: Option<Timestamp>,
}

impl HistoryEntry {
    /// Title of the repriced product.
    pub fn title(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|product| product.title.as_deref())
            .unwrap_or("Unknown Product")
    }
}

/// `GET /dashboard/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    /// Product analytics
    pub analytics: DashboardAnalytics,

    /// Action Board counts
    pub actions: ActionCounts,

    /// Recent price changes, newest first
    pub history: Vec<HistoryEntry>,
}

/// Acknowledgement of a write endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitResponse {
    /// Whether the backend applied the write
    pub success: bool,

    /// Number of products affected
    pub count: u64,
}

/// Body of `POST /analytics/ask`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    /// Free text question about the catalogue
    pub question: String,
}

/// Reply of `POST /analytics/ask`: an answer, or the reason there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AskResponse {
    /// Assistant's answer
    pub answer: Option<String>,

    /// Why the backend could not answer
    pub error: Option<String>,
}

impl AskResponse {
    /// Text to show the operator.
    pub fn reply(&self) -> String {
        match (&self.answer, &self.error) {
            (Some(answer), _) => answer.clone(),
            (None, Some(error)) => format!("Error: {error}"),
            (None, None) => "No answer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn shares_are_percentages_of_the_total() {
        let counts = StatusCounts {
            immediate: 1,
            attention: 1,
            good: 2,
        };

        let shares = counts.shares();

        assert_eq!(shares.immediate, Decimal::from(25));
        assert_eq!(shares.attention, Decimal::from(25));
        assert_eq!(shares.good, Decimal::from(50));
    }

    #[test]
    fn empty_counts_have_zero_shares() {
        assert_eq!(StatusCounts::default().shares(), StatusShares::default());
    }

    #[test]
    fn dashboard_tolerates_missing_blocks() -> TestResult {
        let stats: DashboardStats = serde_json::from_str(
            r#"{
                "analytics": { "total_products": 12 },
                "history": [{
                    "change_type": "UNDERCUT",
                    "old_price": 10.5,
                    "new_price": 9.45,
                    "created_at": "2025-01-02T03:04:05Z"
                }]
            }"#,
        )?;

        assert_eq!(stats.analytics.total_products, 12);
        assert_eq!(stats.actions, ActionCounts::default());

        let entry = stats.history.first().ok_or("missing history entry")?;

        assert_eq!(entry.title(), "Unknown Product");
        assert_eq!(entry.change_type, Some(PricingStrategy::Undercut));
        assert_eq!(entry.old_price, Some(Decimal::new(105, 1)));

        Ok(())
    }

    #[test]
    fn product_page_reads_pagination_names() -> TestResult {
        let page: ProductPage = serde_json::from_str(
            r#"{
                "products": [{ "product_id": "a" }],
                "summary": { "total_products": 40, "total_db_count": 80, "total_pct": 50 },
                "pagination": { "total": 40, "totalPages": 2, "limit": 20 }
            }"#,
        )?;

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.summary.total_pct, Some(Decimal::from(50)));
        assert_eq!(page.pagination.total_pages, 2);

        Ok(())
    }

    #[test]
    fn ask_reply_prefers_answer_then_error() -> TestResult {
        let answered: AskResponse = serde_json::from_str(r#"{ "answer": "42 products" }"#)?;
        let failed: AskResponse = serde_json::from_str(r#"{ "error": "model offline" }"#)?;

        assert_eq!(answered.reply(), "42 products");
        assert_eq!(failed.reply(), "Error: model offline");
        assert_eq!(AskResponse::default().reply(), "No answer");

        Ok(())
    }

    #[test]
    fn filter_options_sort_case_insensitively() {
        let mut options = FilterOptions {
            vendors: vec!["beta".to_string(), "Alpha".to_string()],
            ..FilterOptions::default()
        };

        options.sort();

        assert_eq!(options.vendors, ["Alpha", "beta"]);
    }
}
