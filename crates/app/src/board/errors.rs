//! Action Board store errors.

use repricer::board::{BoardMutation, MutationError};
use thiserror::Error;

use crate::backend::BackendError;

/// Errors from Action Board store operations.
#[derive(Debug, Error)]
pub enum ActionBoardError {
    /// Fetching membership failed; the local cache is unchanged.
    #[error("failed to load action board: {0}")]
    Backend(#[from] BackendError),

    /// The backend refused an optimistic change, which was undone locally.
    #[error("action board change rolled back: {source}")]
    RolledBack {
        /// The undone mutation, in its rolled back state
        mutation: BoardMutation,

        /// Why the backend write failed
        #[source]
        source: BackendError,
    },

    /// A mutation was settled twice.
    #[error(transparent)]
    Mutation(#[from] MutationError),
}
