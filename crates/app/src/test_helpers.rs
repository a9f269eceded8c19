//! Test helpers.

use repricer::{
    analytics::{ActionProductPage, ProductPage, ProductSummary},
    listing::{ActionProduct, ActionTab, Pagination},
    products::{Product, ProductId},
};
use rust_decimal::Decimal;

use crate::backend::{BackendError, MockActionsBackend};

pub(crate) fn ids(ids: &[&str]) -> Vec<ProductId> {
    ids.iter().copied().map(ProductId::from).collect()
}

pub(crate) fn failure() -> BackendError {
    BackendError::UnexpectedResponse("service unavailable".to_string())
}

fn pagination(total: u64, limit: u32) -> Pagination {
    Pagination {
        total,
        total_pages: u32::try_from(total.div_ceil(u64::from(limit.max(1)))).unwrap_or(u32::MAX),
        limit,
    }
}

pub(crate) fn product_page(ids: &[&str], total: u64) -> ProductPage {
    ProductPage {
        products: ids
            .iter()
            .map(|id| Product::new(*id, Some(Decimal::from(10)), Some(Decimal::from(10)), None))
            .collect(),
        summary: ProductSummary {
            total_products: total,
            total_db_count: total,
            ..ProductSummary::default()
        },
        pagination: pagination(total, 20),
    }
}

pub(crate) fn action_product(
    id: &str,
    title: &str,
    display: i64,
    standard: i64,
    anchor: Option<i64>,
    added_at: &str,
) -> ActionProduct {
    let mut product = Product::new(
        id,
        Some(Decimal::from(display)),
        Some(Decimal::from(standard)),
        anchor.map(Decimal::from),
    );
    product.title = Some(title.to_string());

    ActionProduct {
        product,
        added_at: added_at.parse().ok(),
        ..ActionProduct::default()
    }
}

pub(crate) fn action_page(products: Vec<ActionProduct>, total: u64) -> ActionProductPage {
    ActionProductPage {
        products,
        pagination: pagination(total, 20),
    }
}

pub(crate) fn expect_action_page(
    backend: &mut MockActionsBackend,
    tab: ActionTab,
    limit: u32,
    page: ActionProductPage,
    times: usize,
) {
    backend
        .expect_action_products()
        .withf(move |t, p| *t == tab && p.limit == limit)
        .times(times)
        .returning(move |_, _| Ok(page.clone()));
}

/// Expect the `limit=1` requests used to count both board tabs.
pub(crate) fn expect_counts(
    backend: &mut MockActionsBackend,
    pending: u64,
    completed: u64,
    times: usize,
) {
    for (tab, total) in [(ActionTab::Pending, pending), (ActionTab::Completed, completed)] {
        backend
            .expect_action_products()
            .withf(move |t, p| *t == tab && p.limit == 1)
            .times(times)
            .returning(move |_, _| Ok(action_page(Vec::new(), total)));
    }
}
