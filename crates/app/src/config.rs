//! Client configuration

use std::time::Duration;

use clap::Args;
use repricer::{filters::FilterCriteria, selection::GlobalTogglePolicy};
use thiserror::Error;

/// Errors turning configuration values into runtime settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Saved filters are not valid JSON filter criteria.
    #[error("invalid saved filters: {0}")]
    Filters(#[from] serde_json::Error),
}

/// What toggling a row does while "all matching" is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GlobalToggle {
    /// Fall back to the explicit selection.
    #[default]
    Exit,

    /// Keep the global selection and exclude the row.
    Exclude,
}

impl From<GlobalToggle> for GlobalTogglePolicy {
    fn from(toggle: GlobalToggle) -> Self {
        match toggle {
            GlobalToggle::Exit => GlobalTogglePolicy::ExitGlobal,
            GlobalToggle::Exclude => GlobalTogglePolicy::TrackExclusions,
        }
    }
}

/// Backend connection and session settings.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the pricing backend API
    #[arg(
        long,
        env = "REPRICER_API_URL",
        default_value = "http://localhost:5000/api"
    )]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "REPRICER_TIMEOUT_SECS", default_value_t = 30u64)]
    pub timeout_secs: u64,

    /// Rows requested per listing page
    #[arg(long, env = "REPRICER_PAGE_LIMIT", default_value_t = 20u32)]
    pub page_limit: u32,

    /// Row toggle behaviour while all matching products are selected
    #[arg(
        long,
        env = "REPRICER_GLOBAL_TOGGLE",
        value_enum,
        default_value_t = GlobalToggle::Exit
    )]
    pub global_toggle: GlobalToggle,

    /// Saved analytics filters, as JSON
    #[arg(long, env = "REPRICER_FILTERS")]
    pub filters: Option<String>,
}

impl ClientConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Selection policy for row toggles in global mode.
    pub fn toggle_policy(&self) -> GlobalTogglePolicy {
        self.global_toggle.into()
    }

    /// Filters restored from the saved session, or the products default.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved filters cannot be parsed.
    pub fn saved_filters(&self) -> Result<FilterCriteria, ConfigError> {
        match self.filters.as_deref().map(str::trim) {
            None | Some("") => Ok(FilterCriteria::for_products()),
            Some(json) => Ok(serde_json::from_str(json)?),
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "REPRICER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
