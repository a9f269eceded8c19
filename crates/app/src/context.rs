//! App Context

use std::{fmt, sync::Arc};

use repricer::filters::FilterCriteria;
use reqwest::Url;
use thiserror::Error;

use crate::{
    backend::{ActionsBackend, AnalyticsBackend, BackendError, HttpBackend},
    board::ActionBoardStore,
    config::{ClientConfig, ConfigError},
    views::{ActionBoardView, AnalyticsView},
};

/// Errors building the [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The backend client could not be created.
    #[error("failed to create backend client: {0}")]
    Backend(#[from] BackendError),

    /// A configuration value could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Shared backends and stores for one session.
#[derive(Clone)]
pub struct AppContext {
    /// Client settings
    pub config: ClientConfig,

    /// Action Board endpoints
    pub actions: Arc<dyn ActionsBackend>,

    /// Analytics endpoints
    pub analytics: Arc<dyn AnalyticsBackend>,

    /// Board membership shared by both views
    pub board: Arc<ActionBoardStore>,

    /// Base URL export links are built from
    pub export_base: Url,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("board", &self.board)
            .field("export_base", &self.export_base.as_str())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build a context talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the API URL is invalid or the client cannot be
    /// built.
    pub fn from_config(config: ClientConfig) -> Result<Self, AppInitError> {
        let http = Arc::new(HttpBackend::new(&config)?);
        let export_base = http.base_url().clone();

        Ok(Self::with_backends(
            config,
            Arc::clone(&http) as Arc<dyn ActionsBackend>,
            http,
            export_base,
        ))
    }

    /// Build a context over explicit backends.
    pub fn with_backends(
        config: ClientConfig,
        actions: Arc<dyn ActionsBackend>,
        analytics: Arc<dyn AnalyticsBackend>,
        export_base: Url,
    ) -> Self {
        let board = Arc::new(ActionBoardStore::new(Arc::clone(&actions)));

        Self {
            config,
            actions,
            analytics,
            board,
            export_base,
        }
    }

    /// A fresh Action Board view.
    pub fn action_board_view(&self) -> ActionBoardView {
        ActionBoardView::new(
            Arc::clone(&self.actions),
            Arc::clone(&self.board),
            self.export_base.clone(),
            self.config.page_limit,
        )
    }

    /// A fresh analytics view with the saved filters restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved filters cannot be parsed.
    pub fn analytics_view(&self) -> Result<AnalyticsView, AppInitError> {
        Ok(self.analytics_view_with(self.config.saved_filters()?))
    }

    /// A fresh analytics view starting from `filters`.
    pub fn analytics_view_with(&self, filters: FilterCriteria) -> AnalyticsView {
        AnalyticsView::new(
            Arc::clone(&self.analytics),
            Arc::clone(&self.board),
            self.export_base.clone(),
            self.config.page_limit,
            self.config.toggle_policy(),
            filters,
        )
    }
}

#[cfg(test)]
mod tests {
    use repricer::selection::GlobalTogglePolicy;
    use testresult::TestResult;

    use super::*;
    use crate::{
        backend::{MockActionsBackend, MockAnalyticsBackend, parse_base},
        config::GlobalToggle,
    };

    fn config(api_url: &str, filters: Option<&str>) -> ClientConfig {
        ClientConfig {
            api_url: api_url.to_string(),
            timeout_secs: 5,
            page_limit: 50,
            global_toggle: GlobalToggle::Exclude,
            filters: filters.map(str::to_string),
        }
    }

    fn mocked(filters: Option<&str>) -> Result<AppContext, BackendError> {
        Ok(AppContext::with_backends(
            config("http://pricing.test/api", filters),
            Arc::new(MockActionsBackend::new()),
            Arc::new(MockAnalyticsBackend::new()),
            parse_base("http://pricing.test/api")?,
        ))
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        assert!(matches!(
            AppContext::from_config(config("not a url", None)),
            Err(AppInitError::Backend(BackendError::InvalidUrl(_)))
        ));
    }

    #[test]
    fn http_context_exports_from_api_base() -> TestResult {
        let context = AppContext::from_config(config("http://pricing.test/api", None))?;

        assert_eq!(context.export_base.as_str(), "http://pricing.test/api");

        Ok(())
    }

    #[test]
    fn views_share_config() -> TestResult {
        let context = mocked(Some(r#"{"search":"rice","category":["Pantry"]}"#))?;
        let analytics = context.analytics_view()?;

        assert_eq!(analytics.filters().search, "rice");
        assert_eq!(
            analytics.selection().policy(),
            GlobalTogglePolicy::TrackExclusions
        );
        assert_eq!(context.action_board_view().page(), 1);

        Ok(())
    }

    #[test]
    fn broken_saved_filters_fail_analytics_view() -> TestResult {
        let context = mocked(Some("{"))?;

        assert!(matches!(
            context.analytics_view(),
            Err(AppInitError::Config(ConfigError::Filters(_)))
        ));

        Ok(())
    }
}
