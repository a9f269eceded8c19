//! Backend seams.
//!
//! Stores and views only see these traits, so they can be driven by mocks in
//! tests and by [`super::HttpBackend`] at runtime.

use async_trait::async_trait;
use mockall::automock;
use repricer::{
    actions::SubmitRequest,
    analytics::{
        ActionProductPage, AskResponse, CompetitorsPage, DashboardStats, FilterOptions,
        ProductPage, SubmitResponse,
    },
    filters::{BulkAddRequest, FilterCriteria},
    listing::{ActionTab, PageRequest},
    products::ProductId,
    settings::Settings,
};

use crate::backend::BackendError;

/// Action Board endpoints.
#[automock]
#[async_trait]
pub trait ActionsBackend: Send + Sync {
    /// Identifiers of every product on the board (`GET /actions/items`).
    async fn board_items(&self) -> Result<Vec<ProductId>, BackendError>;

    /// Put products on the board (`POST /actions/add`).
    async fn add_items(&self, ids: Vec<ProductId>) -> Result<(), BackendError>;

    /// Take products off the board (`POST /actions/remove`).
    async fn remove_items(&self, ids: Vec<ProductId>) -> Result<(), BackendError>;

    /// Put every product matching a filter scope on the board
    /// (`POST /actions/bulk-add`).
    async fn bulk_add(&self, request: BulkAddRequest) -> Result<(), BackendError>;

    /// One page of a board tab (`GET /actions/products`).
    async fn action_products(
        &self,
        tab: ActionTab,
        page: PageRequest,
    ) -> Result<ActionProductPage, BackendError>;

    /// Apply price changes (`POST /actions/submit`).
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResponse, BackendError>;

    /// Move completed products back to pending (`POST /actions/revert`).
    async fn revert(&self, ids: Vec<ProductId>) -> Result<(), BackendError>;
}

/// Analytics and dashboard endpoints.
#[automock]
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// One page of filtered products (`GET /analytics/products`).
    async fn products(
        &self,
        filters: FilterCriteria,
        page: PageRequest,
    ) -> Result<ProductPage, BackendError>;

    /// Every competitor matching the filters (`GET /analytics/competitors`).
    async fn competitors(&self, filters: FilterCriteria) -> Result<CompetitorsPage, BackendError>;

    /// Values the filter panel offers (`GET /analytics/filters`).
    async fn filter_options(&self) -> Result<FilterOptions, BackendError>;

    /// Dashboard counters and recent history (`GET /dashboard/stats`).
    async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError>;

    /// Pricing and confidence thresholds (`GET /settings`).
    async fn settings(&self) -> Result<Settings, BackendError>;

    /// Store new thresholds; the backend answers with what it kept
    /// (`POST /settings`).
    async fn save_settings(&self, settings: Settings) -> Result<Settings, BackendError>;

    /// Ask the analytics assistant a question (`POST /analytics/ask`).
    async fn ask(&self, question: String) -> Result<AskResponse, BackendError>;
}
