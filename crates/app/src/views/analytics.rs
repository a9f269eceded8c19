//! Analytics view.

use std::{fmt, sync::Arc};

use repricer::{
    analytics::{CompetitorStats, CompetitorsPage, FilterOptions, ProductPage},
    filters::{
        DEFAULT_COMPETITOR_SORT, DEFAULT_PRODUCT_SORT, FilterCriteria, FilterField, SortOrder,
    },
    generation::{Generation, Generations},
    listing::{CompetitorPager, PageRequest},
    products::{PriceStatus, ProductId},
    selection::{GlobalTogglePolicy, SelectionSnapshot, SelectionStore},
};
use reqwest::Url;
use tracing::{error, warn};

use crate::{
    backend::{AnalyticsBackend, BackendError, export_url},
    board::ActionBoardStore,
    views::{Notice, SELECT_FIRST, ViewError},
};

const ADD_FAILED: &str = "Failed to add items";

/// Analytics tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyticsTab {
    /// Paged, filtered product listing
    #[default]
    Products,

    /// Competitor overview
    Competitors,
}

/// Filtered product and competitor listings with a selection that can span
/// every matching product.
///
/// The backend leaves products that are on the Action Board out of the
/// product listing, so the listing is reloaded whenever board membership
/// changes.
pub struct AnalyticsView {
    backend: Arc<dyn AnalyticsBackend>,
    board: Arc<ActionBoardStore>,
    export_base: Url,
    limit: u32,
    tab: AnalyticsTab,
    filters: FilterCriteria,
    page: u32,
    products: ProductPage,
    competitors: CompetitorsPage,
    pager: CompetitorPager,
    options: FilterOptions,
    selection: SelectionStore,
    product_generations: Generations,
    competitor_generations: Generations,
    board_revision: Option<u64>,
}

impl fmt::Debug for AnalyticsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyticsView")
            .field("tab", &self.tab)
            .field("filters", &self.filters)
            .field("page", &self.page)
            .field("products", &self.products.products.len())
            .field("competitors", &self.competitors.competitors.len())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl AnalyticsView {
    /// Create a view on the products tab with `filters` restored from a
    /// previous session.
    pub fn new(
        backend: Arc<dyn AnalyticsBackend>,
        board: Arc<ActionBoardStore>,
        export_base: Url,
        limit: u32,
        policy: GlobalTogglePolicy,
        filters: FilterCriteria,
    ) -> Self {
        Self {
            backend,
            board,
            export_base,
            limit,
            tab: AnalyticsTab::Products,
            filters,
            page: 1,
            products: ProductPage::default(),
            competitors: CompetitorsPage::default(),
            pager: CompetitorPager::default(),
            options: FilterOptions::default(),
            selection: SelectionStore::new(policy),
            product_generations: Generations::default(),
            competitor_generations: Generations::default(),
            board_revision: None,
        }
    }

    /// Active tab.
    pub fn tab(&self) -> AnalyticsTab {
        self.tab
    }

    /// Active filters.
    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Current product page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Loaded product page.
    pub fn products(&self) -> &ProductPage {
        &self.products
    }

    /// Loaded competitor table.
    pub fn competitors(&self) -> &CompetitorsPage {
        &self.competitors
    }

    /// Competitor rows on the current client-side page.
    pub fn competitor_rows(&self) -> impl Iterator<Item = &CompetitorStats> {
        self.pager.rows(&self.competitors.competitors)
    }

    /// Current competitor page number.
    pub fn competitor_page(&self) -> usize {
        self.pager.page()
    }

    /// Values offered by the filter panel.
    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Product selection.
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    fn page_ids(&self) -> Vec<ProductId> {
        self.products
            .products
            .iter()
            .map(|p| p.product_id.clone())
            .collect()
    }

    /// Start a product fetch: the ticket plus what to request.
    pub fn begin_products_reload(&mut self) -> (Generation, FilterCriteria, PageRequest) {
        (
            self.product_generations.begin(),
            self.filters.clone(),
            PageRequest::first(self.limit).at(self.page),
        )
    }

    /// Apply a fetched product page if `ticket` is still the newest fetch.
    pub fn apply_products(&mut self, ticket: Generation, page: ProductPage) -> bool {
        if !self.product_generations.is_current(ticket) {
            warn!(generation = ticket.sequence(), "discarding stale products");
            return false;
        }

        self.products = page;

        true
    }

    /// Fetch the current product page.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; the loaded page is kept.
    pub async fn reload_products(&mut self) -> Result<bool, ViewError> {
        let revision = self.board.revision();
        let (ticket, filters, request) = self.begin_products_reload();

        let page = self
            .backend
            .products(filters, request)
            .await
            .inspect_err(|source| error!(%source, "failed to load products"))?;

        let applied = self.apply_products(ticket, page);

        if applied {
            self.board_revision = Some(revision);
        }

        Ok(applied)
    }

    /// Start a competitor fetch: the ticket plus the filters to send.
    pub fn begin_competitors_reload(&mut self) -> (Generation, FilterCriteria) {
        (self.competitor_generations.begin(), self.filters.clone())
    }

    /// Apply a fetched competitor table if `ticket` is still the newest fetch.
    pub fn apply_competitors(&mut self, ticket: Generation, page: CompetitorsPage) -> bool {
        if !self.competitor_generations.is_current(ticket) {
            warn!(generation = ticket.sequence(), "discarding stale competitors");
            return false;
        }

        self.competitors = page;
        self.pager
            .go_to(self.pager.page(), self.competitors.competitors.len());

        true
    }

    /// Fetch the competitor table.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; the loaded table is kept.
    pub async fn reload_competitors(&mut self) -> Result<bool, ViewError> {
        let (ticket, filters) = self.begin_competitors_reload();

        let page = self
            .backend
            .competitors(filters)
            .await
            .inspect_err(|source| error!(%source, "failed to load competitors"))?;

        Ok(self.apply_competitors(ticket, page))
    }

    /// Fetch the listing of the active tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn reload(&mut self) -> Result<bool, ViewError> {
        match self.tab {
            AnalyticsTab::Products => self.reload_products().await,
            AnalyticsTab::Competitors => self.reload_competitors().await,
        }
    }

    /// Reload the product listing if board membership changed since it was
    /// fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn sync_with_board(&mut self) -> Result<bool, ViewError> {
        if self.tab != AnalyticsTab::Products || self.board_revision == Some(self.board.revision())
        {
            return Ok(false);
        }

        self.reload_products().await
    }

    /// Fetch the values offered by the filter panel, sorted alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn load_filter_options(&mut self) -> Result<(), ViewError> {
        let mut options = self.backend.filter_options().await?;
        options.sort();

        self.options = options;

        Ok(())
    }

    fn reset_pages(&mut self) {
        self.page = 1;
        self.pager.reset();
    }

    /// Switch tab, resetting paging and the tab's default ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn switch_tab(&mut self, tab: AnalyticsTab) -> Result<bool, ViewError> {
        self.tab = tab;
        self.reset_pages();
        self.filters.sort_by = match tab {
            AnalyticsTab::Products => DEFAULT_PRODUCT_SORT,
            AnalyticsTab::Competitors => DEFAULT_COMPETITOR_SORT,
        }
        .to_string();
        self.filters.order = SortOrder::Desc;

        self.reload().await
    }

    /// Toggle one filter value and go back to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn toggle_filter(
        &mut self,
        field: FilterField,
        value: &str,
    ) -> Result<bool, ViewError> {
        self.filters.toggle_value(field, value);
        self.reset_pages();

        self.reload().await
    }

    /// Drop one filter value.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn remove_filter(
        &mut self,
        field: FilterField,
        value: &str,
    ) -> Result<bool, ViewError> {
        self.filters.remove_value(field, value);

        self.reload().await
    }

    /// Replace the search text and go back to the first page.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn set_search(&mut self, search: &str) -> Result<bool, ViewError> {
        search.clone_into(&mut self.filters.search);
        self.reset_pages();

        self.reload().await
    }

    /// Sort by `column`, server side.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn toggle_sort(&mut self, column: &str) -> Result<bool, ViewError> {
        self.filters.toggle_sort(column);

        self.reload().await
    }

    /// Go to product page `page`, clamped to the known page range.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn set_page(&mut self, page: u32) -> Result<bool, ViewError> {
        self.page = page.clamp(1, self.products.pagination.total_pages.max(1));

        self.reload_products().await
    }

    /// Go to competitor page `page`.
    pub fn set_competitor_page(&mut self, page: usize) {
        self.pager.go_to(page, self.competitors.competitors.len());
    }

    /// Show the products of one competitor.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn drill_down(&mut self, competitor: &str) -> Result<bool, ViewError> {
        self.tab = AnalyticsTab::Products;
        self.filters = FilterCriteria::drill_down(competitor);
        self.reset_pages();

        self.reload_products().await
    }

    /// Flip selection of one product.
    pub fn toggle_item(&mut self, id: &ProductId) {
        self.selection.toggle_item(id);
    }

    /// Select or deselect every product on the page.
    pub fn toggle_page(&mut self) {
        let page_ids = self.page_ids();

        self.selection.toggle_select_all_page(&page_ids);
    }

    /// Select every product matching the active filters.
    pub fn select_all_matching(&mut self) {
        self.selection.set_select_all_global(true, &self.filters);
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    /// Number of selected products; in global mode the backend's matching
    /// total less any exclusions.
    pub fn selection_count(&self) -> u64 {
        match self.selection.snapshot() {
            SelectionSnapshot::Finite(ids) => ids.len() as u64,
            SelectionSnapshot::AllMatching { excluded, .. } => self
                .products
                .summary
                .total_products
                .saturating_sub(excluded.len() as u64),
        }
    }

    async fn after_board_change(&mut self) {
        if let Err(source) = self.sync_with_board().await {
            warn!(%source, "failed to reload products after board change");
        }
    }

    /// Put the selection on the Action Board.
    ///
    /// A finite selection is added by identifier. A global selection is added
    /// through its filter scope; excluded products that were not already on
    /// the board are taken off again afterwards.
    pub async fn add_selection_to_board(&mut self) -> Notice {
        let notice = match self.selection.snapshot() {
            SelectionSnapshot::Finite(ids) if ids.is_empty() => return Notice::error(SELECT_FIRST),
            SelectionSnapshot::Finite(ids) => match self.board.add(&ids).await {
                Ok(_) => {
                    self.selection.clear_selection();

                    Notice::success(format!("{} items added to Action Board", ids.len()))
                }
                Err(source) => {
                    error!(%source, "failed to add selection to action board");

                    Notice::error(ADD_FAILED)
                }
            },
            SelectionSnapshot::AllMatching { filters, excluded } => {
                self.add_all_matching(&filters, &excluded).await
            }
        };

        self.after_board_change().await;

        notice
    }

    async fn add_all_matching(
        &mut self,
        filters: &FilterCriteria,
        excluded: &[ProductId],
    ) -> Notice {
        let before = self.board.snapshot();

        if let Err(source) = self.board.bulk_add(filters, None).await {
            error!(%source, "failed to add matching products to action board");

            return Notice::error(ADD_FAILED);
        }

        let added_by_scope: Vec<ProductId> = excluded
            .iter()
            .filter(|id| !before.contains(id))
            .cloned()
            .collect();

        if let Err(source) = self.board.remove(&added_by_scope).await {
            error!(%source, "failed to take excluded products off the action board");

            return Notice::error("Failed to leave out excluded items");
        }

        self.selection.clear_selection();

        Notice::success("All matching items added to Action Board")
    }

    /// Put every product matching the active filters with review `status`
    /// on the Action Board.
    pub async fn bulk_add_status(&mut self, status: PriceStatus) -> Notice {
        let notice = match self.board.bulk_add(&self.filters, Some(status)).await {
            Ok(()) => Notice::success(format!(
                "Added all '{}' products to Action Board",
                status.as_str().replacen('_', " ", 1).to_lowercase()
            )),
            Err(source) => {
                error!(%source, %status, "bulk add by status failed");

                Notice::error(ADD_FAILED)
            }
        };

        self.after_board_change().await;

        notice
    }

    /// Export link for the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the export URL cannot be built.
    pub fn export_url(&self) -> Result<Url, BackendError> {
        export_url(&self.export_base, &self.selection.snapshot())
    }
}
