//! Filters
//!
//! The analytics filter set, and its rendering as query parameters and request
//! bodies.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::products::PriceStatus;

/// Default product sort column.
pub const DEFAULT_PRODUCT_SORT: &str = "default";

/// Default competitor sort column.
pub const DEFAULT_COMPETITOR_SORT: &str = "cheapest_anchor";

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// Review status
    Status,

    /// Match confidence
    Confidence,

    /// Product category
    Category,

    /// Customer segment
    Segment,

    /// Collection
    Collection,

    /// Product type
    ProductType,

    /// Competitor vendor
    Competitor,
}

impl FilterField {
    /// Every multi-valued field, in query parameter order.
    pub const ALL: [FilterField; 7] = [
        FilterField::Status,
        FilterField::Confidence,
        FilterField::Category,
        FilterField::Segment,
        FilterField::Collection,
        FilterField::ProductType,
        FilterField::Competitor,
    ];

    /// Query parameter name.
    pub fn key(self) -> &'static str {
        match self {
            FilterField::Status => "status",
            FilterField::Confidence => "confidence",
            FilterField::Category => "category",
            FilterField::Segment => "segment",
            FilterField::Collection => "collection",
            FilterField::ProductType => "product_type",
            FilterField::Competitor => "competitor",
        }
    }
}

/// Analytics filter criteria.
///
/// Doubles as the scope descriptor of a global selection, so it is cloned into
/// the selection when "all matching" is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Free text search
    pub search: String,

    /// Review status values
    pub status: Vec<String>,

    /// Match confidence values
    pub confidence: Vec<String>,

    /// Category values
    pub category: Vec<String>,

    /// Segment values
    pub segment: Vec<String>,

    /// Collection values
    pub collection: Vec<String>,

    /// Product type values
    pub product_type: Vec<String>,

    /// Competitor vendor values
    pub competitor: Vec<String>,

    /// Sort column
    #[serde(rename = "sortBy")]
    pub sort_by: String,

    /// Sort direction
    pub order: SortOrder,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::for_products()
    }
}

impl FilterCriteria {
    /// Empty filters sorted the way the products tab expects.
    pub fn for_products() -> Self {
        Self {
            search: String::new(),
            status: Vec::new(),
            confidence: Vec::new(),
            category: Vec::new(),
            segment: Vec::new(),
            collection: Vec::new(),
            product_type: Vec::new(),
            competitor: Vec::new(),
            sort_by: DEFAULT_PRODUCT_SORT.to_string(),
            order: SortOrder::Desc,
        }
    }

    /// Empty filters sorted the way the competitors tab expects.
    pub fn for_competitors() -> Self {
        Self {
            sort_by: DEFAULT_COMPETITOR_SORT.to_string(),
            ..Self::for_products()
        }
    }

    /// Product filters narrowed to a single competitor (drill down from the
    /// competitors tab).
    pub fn drill_down(competitor: impl Into<String>) -> Self {
        Self {
            competitor: vec![competitor.into()],
            ..Self::for_products()
        }
    }

    /// Values selected for `field`.
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Status => &self.status,
            FilterField::Confidence => &self.confidence,
            FilterField::Category => &self.category,
            FilterField::Segment => &self.segment,
            FilterField::Collection => &self.collection,
            FilterField::ProductType => &self.product_type,
            FilterField::Competitor => &self.competitor,
        }
    }

    fn values_mut(&mut self, field: FilterField) -> &mut Vec<String> {
        match field {
            FilterField::Status => &mut self.status,
            FilterField::Confidence => &mut self.confidence,
            FilterField::Category => &mut self.category,
            FilterField::Segment => &mut self.segment,
            FilterField::Collection => &mut self.collection,
            FilterField::ProductType => &mut self.product_type,
            FilterField::Competitor => &mut self.competitor,
        }
    }

    /// Add `value` to `field`, or remove it if already present.
    pub fn toggle_value(&mut self, field: FilterField, value: &str) {
        let values = self.values_mut(field);

        if values.iter().any(|existing| existing == value) {
            values.retain(|existing| existing != value);
        } else {
            values.push(value.to_string());
        }
    }

    /// Remove `value` from `field`.
    pub fn remove_value(&mut self, field: FilterField, value: &str) {
        self.values_mut(field).retain(|existing| existing != value);
    }

    /// Sort by `column`; clicking the active ascending column flips it to
    /// descending, anything else sorts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        self.order = if self.sort_by == column && self.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.sort_by = column.to_string();
    }

    /// Whether any narrowing filter is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && FilterField::ALL.iter().all(|f| self.values(*f).is_empty())
    }

    /// Query parameters describing the filtered set, without sorting.
    pub fn scope_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }

        for field in FilterField::ALL {
            pairs.extend(
                self.values(field)
                    .iter()
                    .map(|value| (field.key(), value.clone())),
            );
        }

        pairs
    }

    /// Query parameters for a listing request: the scope followed by sorting.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.scope_pairs();

        pairs.push(("sortBy", self.sort_by.clone()));
        pairs.push(("order", self.order.as_str().to_string()));

        pairs
    }
}

/// Body of a bulk add: the active filters with the status list overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAddRequest {
    /// Filters scoping the products to add
    #[serde(flatten)]
    pub filters: FilterCriteria,
}

impl BulkAddRequest {
    /// Every product matching `filters`.
    pub fn matching(filters: &FilterCriteria) -> Self {
        Self {
            filters: filters.clone(),
        }
    }

    /// Products matching `filters` with exactly the given review status.
    pub fn with_status(filters: &FilterCriteria, status: PriceStatus) -> Self {
        let mut filters = filters.clone();
        filters.status = vec![status.as_str().to_string()];

        Self { filters }
    }
}
