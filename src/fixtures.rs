//! Fixtures

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::products::{PriceStatus, Product, ProductId};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// A product as written in a fixture file, keyed by its identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ProductFixture {
    title: Option<String>,
    category: Option<String>,
    status: Option<PriceStatus>,
    display_price: Option<Decimal>,
    normalized_price: Option<Decimal>,
    cheapest_match_price: Option<Decimal>,
    cheapest_match_display_price: Option<Decimal>,
    worse_index: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct ProductsFixture {
    products: FxHashMap<String, ProductFixture>,
}

impl ProductFixture {
    fn into_product(self, id: &str) -> Product {
        Product {
            title: self.title,
            category: self.category,
            status: self.status,
            cheapest_match_display_price: self.cheapest_match_display_price,
            worse_index: self.worse_index,
            ..Product::new(
                id,
                self.display_price,
                self.normalized_price,
                self.cheapest_match_price,
            )
        }
    }
}

/// Products loaded from YAML, as the backend would serve them.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
    products: FxHashMap<ProductId, Product>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
        }
    }

    /// Load products from `products/{name}.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (id, product) in fixture.products {
            let product = product.into_product(&id);

            self.products.insert(product.product_id.clone(), product);
        }

        Ok(self)
    }

    /// Load a named fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?;

        Ok(fixture)
    }

    /// Get a product by its identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(&ProductId::from(id))
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Every loaded product, ordered by identifier.
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        products
    }

    /// Identifiers of every loaded product, ordered.
    pub fn ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.products.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn loads_product_set() -> TestResult {
        let fixture = Fixture::from_set("catalog")?;
        let rice = fixture.product("rice-5kg")?;

        assert_eq!(rice.normalized_price, Some(Decimal::from(50)));
        assert_eq!(rice.ratio(), Decimal::new(12, 1));
        assert_eq!(rice.status, Some(PriceStatus::ImmediateAction));

        Ok(())
    }

    #[test]
    fn missing_product_is_reported() -> TestResult {
        let fixture = Fixture::from_set("catalog")?;

        assert!(matches!(
            fixture.product("nope"),
            Err(FixtureError::ProductNotFound(id)) if id == "nope"
        ));

        Ok(())
    }

    #[test]
    fn missing_set_is_an_io_error() {
        assert!(matches!(
            Fixture::from_set("does-not-exist"),
            Err(FixtureError::Io(_))
        ));
    }
}
