//! Action Board view.

use std::{fmt, sync::Arc};

use repricer::{
    actions::{ActionQueue, PricingAction, SubmissionError},
    analytics::{ActionCounts, ActionProductPage},
    generation::{Generation, Generations},
    listing::{
        ActionProduct, ActionSort, ActionSortColumn, ActionTab, PageRequest, Pagination,
        sort_action_products,
    },
    pricing::PricingStrategy,
    products::ProductId,
    selection::{SelectionSnapshot, SelectionStore},
};
use reqwest::Url;
use tracing::{error, warn};

use crate::{
    backend::{ActionsBackend, BackendError, export_url},
    board::ActionBoardStore,
    views::{Notice, SELECT_FIRST, ViewError},
};

/// Pending and completed price changes, one server page at a time.
///
/// The page is sorted locally. Queued actions only live as long as their
/// product stays on the loaded page.
pub struct ActionBoardView {
    backend: Arc<dyn ActionsBackend>,
    board: Arc<ActionBoardStore>,
    export_base: Url,
    limit: u32,
    tab: ActionTab,
    page: u32,
    sort: ActionSort,
    products: Vec<ActionProduct>,
    pagination: Pagination,
    counts: ActionCounts,
    selection: SelectionStore,
    queue: ActionQueue,
    generations: Generations,
}

impl fmt::Debug for ActionBoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBoardView")
            .field("tab", &self.tab)
            .field("page", &self.page)
            .field("sort", &self.sort)
            .field("products", &self.products.len())
            .field("counts", &self.counts)
            .field("queue", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl ActionBoardView {
    /// Create a view on the pending tab; call [`ActionBoardView::reload`] to
    /// fetch the first page.
    pub fn new(
        backend: Arc<dyn ActionsBackend>,
        board: Arc<ActionBoardStore>,
        export_base: Url,
        limit: u32,
    ) -> Self {
        let tab = ActionTab::default();

        Self {
            backend,
            board,
            export_base,
            limit,
            tab,
            page: 1,
            sort: tab.default_sort(),
            products: Vec::new(),
            pagination: Pagination::default(),
            counts: ActionCounts::default(),
            selection: SelectionStore::default(),
            queue: ActionQueue::new(),
            generations: Generations::default(),
        }
    }

    /// Active tab.
    pub fn tab(&self) -> ActionTab {
        self.tab
    }

    /// Current 1-based page.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current ordering.
    pub fn sort(&self) -> ActionSort {
        self.sort
    }

    /// Loaded products, in display order.
    pub fn products(&self) -> &[ActionProduct] {
        &self.products
    }

    /// Paging of the active tab.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Pending and completed totals.
    pub fn counts(&self) -> ActionCounts {
        self.counts
    }

    /// Row selection.
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Queued pricing actions.
    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    fn page_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id().clone()).collect()
    }

    fn selected_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.selection.selected_items().iter().cloned().collect();
        ids.sort();
        ids
    }

    fn resort(&mut self) {
        sort_action_products(&mut self.products, self.sort, &self.queue);
    }

    /// Start a page fetch: the ticket plus what to request.
    pub fn begin_reload(&mut self) -> (Generation, ActionTab, PageRequest) {
        (
            self.generations.begin(),
            self.tab,
            PageRequest::first(self.limit).at(self.page),
        )
    }

    /// Apply a fetched page if `ticket` is still the newest fetch.
    ///
    /// Applying clears the selection, drops queued actions for products that
    /// are no longer loaded and re-sorts the page.
    pub fn apply_reload(&mut self, ticket: Generation, page: ActionProductPage) -> bool {
        if !self.generations.is_current(ticket) {
            warn!(
                generation = ticket.sequence(),
                "discarding stale action products"
            );
            return false;
        }

        self.products = page.products;
        self.pagination = page.pagination;
        self.selection.clear_selection();

        let loaded = self.page_ids();
        self.queue.retain_loaded(&loaded);
        self.resort();

        true
    }

    async fn fetch_counts(&self) -> Result<ActionCounts, BackendError> {
        let pending = self
            .backend
            .action_products(ActionTab::Pending, PageRequest::first(1))
            .await?;
        let completed = self
            .backend
            .action_products(ActionTab::Completed, PageRequest::first(1))
            .await?;

        Ok(ActionCounts {
            pending: pending.pagination.total,
            completed: completed.pagination.total,
        })
    }

    /// Fetch the current page and the tab counts.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend call fails; the loaded page is kept.
    pub async fn reload(&mut self) -> Result<bool, ViewError> {
        let (ticket, tab, request) = self.begin_reload();

        let page = self
            .backend
            .action_products(tab, request)
            .await
            .inspect_err(|source| error!(%source, "failed to load action products"))?;

        self.counts = self.fetch_counts().await?;

        Ok(self.apply_reload(ticket, page))
    }

    /// Switch tab, back to the first page and the tab's default ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn switch_tab(&mut self, tab: ActionTab) -> Result<bool, ViewError> {
        self.tab = tab;
        self.page = 1;
        self.sort = tab.default_sort();

        self.reload().await
    }

    /// Go to `page`, clamped to the known page range.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    pub async fn set_page(&mut self, page: u32) -> Result<bool, ViewError> {
        self.page = page.clamp(1, self.pagination.total_pages.max(1));

        self.reload().await
    }

    /// Sort the loaded page by `column`.
    pub fn toggle_sort(&mut self, column: ActionSortColumn) {
        self.sort = self.sort.toggled(column);
        self.resort();
    }

    /// Flip selection of one row.
    pub fn toggle_item(&mut self, id: &ProductId) {
        self.selection.toggle_item(id);
    }

    /// Select or deselect every row on the page.
    pub fn toggle_page(&mut self) {
        let page_ids = self.page_ids();

        self.selection.toggle_select_all_page(&page_ids);
    }

    /// Queue `strategy` for one loaded product. Returns `None` if the product
    /// is not on the loaded page.
    pub fn set_action(
        &mut self,
        id: &ProductId,
        strategy: PricingStrategy,
        value: &str,
    ) -> Option<&PricingAction> {
        let product = self.products.iter().find(|p| p.id() == id)?;

        self.queue.set_action(&product.product, strategy, value);
        self.resort();

        self.queue.get(id)
    }

    /// Queue `strategy` for every selected row whose price can be computed.
    pub fn apply_bulk(&mut self, strategy: PricingStrategy, value: &str) -> Notice {
        let ids = self.selected_ids();

        if ids.is_empty() {
            return Notice::error(SELECT_FIRST);
        }

        let applied = self.queue.apply_bulk(
            self.products.iter().map(|p| &p.product),
            &ids,
            strategy,
            value,
        );
        self.resort();

        Notice::success(format!(
            "{strategy} queued for {applied} of {} selected items",
            ids.len()
        ))
    }

    /// Discard queued actions of the selected rows.
    pub fn reset_selected(&mut self) -> Notice {
        let ids = self.selected_ids();

        if ids.is_empty() {
            return Notice::error(SELECT_FIRST);
        }

        self.queue.reset_actions(&ids);
        self.resort();

        Notice::success("Actions reset for selected items")
    }

    async fn refresh_after_write(&mut self) {
        if let Err(source) = self.reload().await {
            warn!(%source, "failed to reload action products after write");
        }

        if let Err(source) = self.board.refresh().await {
            warn!(%source, "failed to refresh action board after write");
        }
    }

    /// Submit queued actions for `ids`, or for every queued product on the
    /// loaded page when `ids` is empty.
    pub async fn submit(&mut self, ids: &[ProductId]) -> Notice {
        let request = match self
            .queue
            .build_submission(ids, self.products.iter().map(|p| &p.product))
        {
            Ok(request) => request,
            Err(SubmissionError::NothingToSubmit) => {
                return Notice::error("No actions pending to submit");
            }
        };

        let targets = request.product_ids();

        match self.backend.submit(request).await {
            Ok(response) if response.success => {
                self.queue.complete(&targets);
                self.selection.deselect(&targets);
                self.refresh_after_write().await;

                Notice::success(format!(
                    "Successfully processed {} updates",
                    response.count
                ))
            }
            Ok(_) | Err(BackendError::Rejected(_) | BackendError::UnexpectedResponse(_)) => {
                warn!(count = targets.len(), "submission rejected");

                Notice::error("Submission failed")
            }
            Err(source) => {
                error!(%source, "failed to submit price changes");

                Notice::error("Submission encountered an error")
            }
        }
    }

    /// Take the selected rows off the Action Board.
    pub async fn remove_selected(&mut self) -> Notice {
        let ids = self.selected_ids();

        if ids.is_empty() {
            return Notice::error(SELECT_FIRST);
        }

        match self.board.remove(&ids).await {
            Ok(_) => {
                self.selection.clear_selection();
                self.queue.reset_actions(&ids);

                if let Err(source) = self.reload().await {
                    warn!(%source, "failed to reload action products after remove");
                }

                Notice::success(format!("{} items removed from Action Board", ids.len()))
            }
            Err(source) => {
                error!(%source, "failed to remove items from action board");

                Notice::error("Failed to remove items")
            }
        }
    }

    /// Move the selected completed rows back to pending.
    pub async fn revert_selected(&mut self) -> Notice {
        let ids = self.selected_ids();

        if ids.is_empty() {
            return Notice::error(SELECT_FIRST);
        }

        match self.backend.revert(ids).await {
            Ok(()) => {
                self.selection.clear_selection();
                self.refresh_after_write().await;

                Notice::success("Items reverted to Pending")
            }
            Err(source @ (BackendError::UnexpectedResponse(_) | BackendError::Rejected(_))) => {
                warn!(%source, "revert rejected");

                Notice::error("Failed to revert")
            }
            Err(source) => {
                error!(%source, "failed to revert items");

                Notice::error("Error Reverting")
            }
        }
    }

    /// Export link for the selected rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the export URL cannot be built.
    pub fn export_url(&self) -> Result<Url, BackendError> {
        export_url(
            &self.export_base,
            &SelectionSnapshot::Finite(self.selected_ids()),
        )
    }
}
