//! Products

use std::fmt::{self, Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend product identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Read an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Presentation bucket for the worse index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorseIndexStatus {
    /// Clearly overpriced.
    Red,

    /// Somewhat overpriced.
    Orange,

    /// Competitive.
    Green,

    /// Anything the backend sends that we do not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Review status the backend assigns to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceStatus {
    /// The product needs a price change now.
    ImmediateAction,

    /// The product should be reviewed.
    AttentionNeeded,

    /// The product is priced competitively.
    NoAction,
}

impl PriceStatus {
    /// Wire name used in query strings and request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceStatus::ImmediateAction => "IMMEDIATE_ACTION",
            PriceStatus::AttentionNeeded => "ATTENTION_NEEDED",
            PriceStatus::NoAction => "NO_ACTION",
        }
    }
}

impl Display for PriceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-product counts of competitor listings in each worse index bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingStats {
    /// Listings that make us look overpriced.
    #[serde(deserialize_with = "null_as_default")]
    pub red: u32,

    /// Listings slightly cheaper than us.
    #[serde(deserialize_with = "null_as_default")]
    pub orange: u32,

    /// Listings we beat.
    #[serde(deserialize_with = "null_as_default")]
    pub green: u32,
}

/// A matched competitor listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorListing {
    /// Competitor name
    pub vendor: Option<String>,

    /// Competitor's title for the listing
    pub competitor_title: Option<String>,

    /// Link to the competitor listing
    pub competitor_link: Option<String>,

    /// Competitor listing image
    pub competitor_image_url: Option<String>,

    /// Competitor display price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub display_price: Option<Decimal>,

    /// Competitor standardized price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub normalized_price: Option<Decimal>,

    /// Ratio of our price against this listing
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_index: Option<Decimal>,

    /// Match confidence reported by the importer
    pub confidence_level: Option<String>,

    /// Raw match status reported by the importer
    pub raw_status: Option<String>,
}

/// Product as served by the analytics and action endpoints.
///
/// Every numeric field may be missing in a response; callers must go through the
/// accessors (or [`crate::pricing`]) which treat a missing value as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Product identifier
    pub product_id: ProductId,

    /// Product title
    pub title: Option<String>,

    /// Product image
    pub image_url: Option<String>,

    /// Link to our listing
    pub product_link: Option<String>,

    /// Product category
    pub category: Option<String>,

    /// Customer-facing price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub display_price: Option<Decimal>,

    /// Standardized (per canonical unit) price
    #[serde(with = "rust_decimal::serde::float_option")]
    pub normalized_price: Option<Decimal>,

    /// Lowest standardized price among matched competitor listings
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cheapest_match_price: Option<Decimal>,

    /// Display price of the cheapest matched listing
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cheapest_match_display_price: Option<Decimal>,

    /// How much more expensive we are than the competitor anchor
    #[serde(with = "rust_decimal::serde::float_option")]
    pub worse_index: Option<Decimal>,

    /// Presentation bucket for `worse_index`
    #[serde(deserialize_with = "null_as_default")]
    pub worse_index_status: WorseIndexStatus,

    /// Review status
    pub status: Option<PriceStatus>,

    /// Number of matched competitor listings
    pub listings_count: Option<u32>,

    /// Listing counts per worse index bucket
    #[serde(deserialize_with = "null_as_default")]
    pub stats: ListingStats,

    /// Matched competitor listings
    #[serde(deserialize_with = "null_as_default")]
    pub listings: Vec<CompetitorListing>,
}

impl Product {
    /// Create a product with the three prices the calculator depends on.
    pub fn new(
        product_id: impl Into<ProductId>,
        display_price: Option<Decimal>,
        normalized_price: Option<Decimal>,
        cheapest_match_price: Option<Decimal>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            display_price,
            normalized_price,
            cheapest_match_price,
            ..Self::default()
        }
    }

    /// Standardized price, zero when absent.
    pub fn standard_price(&self) -> Decimal {
        self.normalized_price.unwrap_or_default()
    }

    /// Display price, zero when absent.
    pub fn shelf_price(&self) -> Decimal {
        self.display_price.unwrap_or_default()
    }

    /// The competitor anchor, or `None` when there is no usable (non-zero) anchor.
    pub fn competitor_anchor(&self) -> Option<Decimal> {
        self.cheapest_match_price.filter(|price| !price.is_zero())
    }

    /// Display markup over the standardized price.
    ///
    /// `display_price / normalized_price` when the standardized price is positive,
    /// otherwise `1`.
    pub fn ratio(&self) -> Decimal {
        let standard = self.standard_price();

        if standard > Decimal::ZERO {
            self.shelf_price()
                .checked_div(standard)
                .unwrap_or(Decimal::ONE)
        } else {
            Decimal::ONE
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ratio_divides_display_by_standard() {
        let product = Product::new(
            "p1",
            Some(Decimal::new(60, 0)),
            Some(Decimal::new(50, 0)),
            None,
        );

        assert_eq!(product.ratio(), Decimal::new(12, 1));
    }

    #[test]
    fn ratio_defaults_to_one_without_standard_price() {
        let missing = Product::new("p1", Some(Decimal::new(60, 0)), None, None);
        let zero = Product::new("p2", Some(Decimal::new(60, 0)), Some(Decimal::ZERO), None);

        assert_eq!(missing.ratio(), Decimal::ONE);
        assert_eq!(zero.ratio(), Decimal::ONE);
    }

    #[test]
    fn zero_anchor_is_treated_as_missing() {
        let product = Product::new("p1", None, None, Some(Decimal::ZERO));

        assert_eq!(product.competitor_anchor(), None);
    }

    #[test]
    fn deserializes_sparse_backend_record() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "product_id": "sku-1",
                "display_price": 12.5,
                "worse_index_status": "PURPLE",
                "status": "ATTENTION_NEEDED"
            }"#,
        )?;

        assert_eq!(product.product_id.as_str(), "sku-1");
        assert_eq!(product.display_price, Some(Decimal::new(125, 1)));
        assert_eq!(product.normalized_price, None);
        assert_eq!(product.worse_index_status, WorseIndexStatus::Unknown);
        assert_eq!(product.status, Some(PriceStatus::AttentionNeeded));
        assert!(product.listings.is_empty());

        Ok(())
    }

    #[test]
    fn explicit_nulls_read_as_defaults() -> TestResult {
        let product: Product = serde_json::from_str(
            r#"{
                "product_id": "sku-2",
                "worse_index": null,
                "worse_index_status": null,
                "stats": { "red": null, "orange": 2, "green": null },
                "listings": null
            }"#,
        )?;

        assert_eq!(product.worse_index_status, WorseIndexStatus::Unknown);
        assert_eq!(
            product.stats,
            ListingStats {
                red: 0,
                orange: 2,
                green: 0
            }
        );
        assert!(product.listings.is_empty());

        let bare: Product = serde_json::from_str(r#"{ "product_id": "sku-3", "stats": null }"#)?;

        assert_eq!(bare.stats, ListingStats::default());

        Ok(())
    }

    #[test]
    fn deserializes_listing_with_null_prices() -> TestResult {
        let listing: CompetitorListing = serde_json::from_str(
            r#"{ "vendor": "Acme", "display_price": null, "normalized_price": 3 }"#,
        )?;

        assert_eq!(listing.vendor.as_deref(), Some("Acme"));
        assert_eq!(listing.display_price, None);
        assert_eq!(listing.normalized_price, Some(Decimal::new(3, 0)));

        Ok(())
    }
}
