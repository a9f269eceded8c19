//! HTTP implementation of the backend seams.

use async_trait::async_trait;
use repricer::{
    actions::SubmitRequest,
    analytics::{
        ActionProductPage, AskRequest, AskResponse, CompetitorsPage, DashboardStats,
        FilterOptions, ProductPage, SubmitResponse,
    },
    filters::{BulkAddRequest, FilterCriteria},
    listing::{ActionTab, PageRequest},
    products::ProductId,
    selection::SelectionSnapshot,
    settings::Settings,
};
use reqwest::{Client, Request, Response, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    backend::{ActionsBackend, AnalyticsBackend, BackendError},
    config::ClientConfig,
};

#[derive(Debug, Serialize)]
struct IdsRequest<'a> {
    ids: &'a [ProductId],
}

/// Parse the configured API base URL.
///
/// # Errors
///
/// Returns [`BackendError::InvalidUrl`] if the URL does not parse or cannot
/// carry path segments.
pub fn parse_base(url: &str) -> Result<Url, BackendError> {
    let base =
        Url::parse(url).map_err(|error| BackendError::InvalidUrl(format!("{url}: {error}")))?;

    if base.cannot_be_a_base() {
        return Err(BackendError::InvalidUrl(url.to_string()));
    }

    Ok(base)
}

/// Append `segments` and `query` to the API base.
///
/// # Errors
///
/// Returns [`BackendError::InvalidUrl`] if the base cannot carry path segments.
pub fn endpoint(
    base: &Url,
    segments: &[&str],
    query: &[(&'static str, String)],
) -> Result<Url, BackendError> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|()| BackendError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
}

/// Download link for the products in `selection`.
///
/// A finite selection is sent as a comma separated `ids` list. A global
/// selection is sent as `global_select=true` with its filter scope; products
/// excluded while in global mode cannot be expressed and are still exported.
///
/// # Errors
///
/// Returns [`BackendError::InvalidUrl`] if the base cannot carry path segments.
pub fn export_url(base: &Url, selection: &SelectionSnapshot) -> Result<Url, BackendError> {
    let query = match selection {
        SelectionSnapshot::Finite(ids) => {
            let ids: Vec<&str> = ids.iter().map(ProductId::as_str).collect();

            vec![("ids", ids.join(","))]
        }
        SelectionSnapshot::AllMatching { filters, .. } => {
            let mut pairs = vec![("global_select", "true".to_string())];
            pairs.extend(filters.scope_pairs());
            pairs
        }
    };

    endpoint(base, &["actions", "export"], &query)
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    let text = response.text().await.unwrap_or_default();

    Err(BackendError::UnexpectedResponse(format!(
        "{url} failed with status {status}: {text}"
    )))
}

/// Pricing backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let base = parse_base(&config.api_url)?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { base, http })
    }

    /// API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn get_request(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Request, BackendError> {
        Ok(self.http.get(endpoint(&self.base, segments, query)?).build()?)
    }

    fn post_request<B>(&self, segments: &[&str], body: &B) -> Result<Request, BackendError>
    where
        B: Serialize + ?Sized,
    {
        Ok(self
            .http
            .post(endpoint(&self.base, segments, &[])?)
            .json(body)
            .build()?)
    }

    fn board_items_request(&self) -> Result<Request, BackendError> {
        self.get_request(&["actions", "items"], &[])
    }

    fn ids_request(&self, action: &str, ids: &[ProductId]) -> Result<Request, BackendError> {
        self.post_request(&["actions", action], &IdsRequest { ids })
    }

    fn bulk_add_request(&self, request: &BulkAddRequest) -> Result<Request, BackendError> {
        self.post_request(&["actions", "bulk-add"], request)
    }

    fn action_products_request(
        &self,
        tab: ActionTab,
        page: PageRequest,
    ) -> Result<Request, BackendError> {
        let mut query = vec![("tab_status", tab.as_str().to_string())];
        query.extend(page.to_query_pairs());

        self.get_request(&["actions", "products"], &query)
    }

    fn submit_request(&self, request: &SubmitRequest) -> Result<Request, BackendError> {
        self.post_request(&["actions", "submit"], request)
    }

    fn products_request(
        &self,
        filters: &FilterCriteria,
        page: PageRequest,
    ) -> Result<Request, BackendError> {
        let mut query = filters.to_query_pairs();
        query.extend(page.to_query_pairs());

        self.get_request(&["analytics", "products"], &query)
    }

    fn competitors_request(&self, filters: &FilterCriteria) -> Result<Request, BackendError> {
        self.get_request(&["analytics", "competitors"], &filters.to_query_pairs())
    }

    fn settings_request(&self) -> Result<Request, BackendError> {
        self.get_request(&["settings"], &[])
    }

    fn save_settings_request(&self, settings: &Settings) -> Result<Request, BackendError> {
        self.post_request(&["settings"], settings)
    }

    fn ask_request(&self, request: &AskRequest) -> Result<Request, BackendError> {
        self.post_request(&["analytics", "ask"], request)
    }

    async fn execute(&self, request: Request) -> Result<Response, BackendError> {
        debug!(method = %request.method(), url = %request.url(), "backend request");

        let response = self.http.execute(request).await?;

        ensure_success(response).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, BackendError> {
        Ok(self.execute(request).await?.json().await?)
    }
}

#[async_trait]
impl ActionsBackend for HttpBackend {
    async fn board_items(&self) -> Result<Vec<ProductId>, BackendError> {
        self.fetch(self.board_items_request()?).await
    }

    async fn add_items(&self, ids: Vec<ProductId>) -> Result<(), BackendError> {
        self.execute(self.ids_request("add", &ids)?).await?;

        Ok(())
    }

    async fn remove_items(&self, ids: Vec<ProductId>) -> Result<(), BackendError> {
        self.execute(self.ids_request("remove", &ids)?).await?;

        Ok(())
    }

    async fn bulk_add(&self, request: BulkAddRequest) -> Result<(), BackendError> {
        self.execute(self.bulk_add_request(&request)?).await?;

        Ok(())
    }

    async fn action_products(
        &self,
        tab: ActionTab,
        page: PageRequest,
    ) -> Result<ActionProductPage, BackendError> {
        self.fetch(self.action_products_request(tab, page)?).await
    }

    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let response: SubmitResponse = self.fetch(self.submit_request(&request)?).await?;

        if !response.success {
            return Err(BackendError::Rejected(format!(
                "submission of {} actions was not applied",
                request.actions.len()
            )));
        }

        Ok(response)
    }

    async fn revert(&self, ids: Vec<ProductId>) -> Result<(), BackendError> {
        self.execute(self.ids_request("revert", &ids)?).await?;

        Ok(())
    }
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn products(
        &self,
        filters: FilterCriteria,
        page: PageRequest,
    ) -> Result<ProductPage, BackendError> {
        self.fetch(self.products_request(&filters, page)?).await
    }

    async fn competitors(&self, filters: FilterCriteria) -> Result<CompetitorsPage, BackendError> {
        self.fetch(self.competitors_request(&filters)?).await
    }

    async fn filter_options(&self) -> Result<FilterOptions, BackendError> {
        self.fetch(self.get_request(&["analytics", "filters"], &[])?)
            .await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        self.fetch(self.get_request(&["dashboard", "stats"], &[])?)
            .await
    }

    async fn settings(&self) -> Result<Settings, BackendError> {
        self.fetch(self.settings_request()?).await
    }

    async fn save_settings(&self, settings: Settings) -> Result<Settings, BackendError> {
        self.fetch(self.save_settings_request(&settings)?).await
    }

    async fn ask(&self, question: String) -> Result<AskResponse, BackendError> {
        self.fetch(self.ask_request(&AskRequest { question })?).await
    }
}
