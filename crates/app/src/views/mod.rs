//! View controllers
//!
//! State and operations behind the Action Board and Analytics screens. Every
//! operation a user triggers reports its outcome as a [`Notice`]; listing
//! loads return errors so the caller can decide how to surface them.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::{backend::BackendError, board::ActionBoardError};

mod action_board;
mod analytics;

pub use action_board::ActionBoardView;
pub use analytics::{AnalyticsTab, AnalyticsView};

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation went through.
    Success,

    /// The operation did not happen.
    Error,
}

/// A transient, user-visible outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,

    /// Message shown to the user
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Whether the notice reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors loading view data.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A listing request failed.
    #[error("failed to load listing: {0}")]
    Backend(#[from] BackendError),

    /// Action Board membership could not be loaded.
    #[error(transparent)]
    Board(#[from] ActionBoardError),
}

pub(crate) const SELECT_FIRST: &str = "Please select items first";
