//! Action Board store.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use repricer::{
    board::{BoardMembership, BoardMutation, MutationKind},
    filters::{BulkAddRequest, FilterCriteria},
    generation::Generations,
    products::{PriceStatus, ProductId},
};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, warn};

use crate::{
    backend::{ActionsBackend, BackendError},
    board::ActionBoardError,
};

#[derive(Debug, Default)]
struct BoardState {
    membership: BoardMembership,
    generations: Generations,
    revision: u64,
}

impl BoardState {
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Cache of the products on the pending Action Board.
///
/// Analytics listings use it to leave out products that are already queued.
/// Additions and removals show up locally before the backend confirms them
/// and are undone if the backend write fails. The state lock is never held
/// across a backend call. Additions and removals run one at a time, so a
/// rollback only ever undoes its own change.
pub struct ActionBoardStore {
    backend: Arc<dyn ActionsBackend>,
    state: Mutex<BoardState>,
    writes: AsyncMutex<()>,
}

impl fmt::Debug for ActionBoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBoardStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ActionBoardStore {
    /// Create an empty store; call [`ActionBoardStore::load`] to populate it.
    pub fn new(backend: Arc<dyn ActionsBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(BoardState::default()),
            writes: AsyncMutex::new(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the cache with the backend's membership.
    ///
    /// Returns `false` if the response was discarded because a newer load or
    /// a local change happened while it was in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails; the cache is left as is.
    pub async fn load(&self) -> Result<bool, ActionBoardError> {
        let ticket = self.state().generations.begin();

        let ids = self
            .backend
            .board_items()
            .await
            .inspect_err(|source| error!(%source, "failed to load action board"))?;

        let mut state = self.state();

        if !state.generations.is_current(ticket) {
            warn!(
                generation = ticket.sequence(),
                "discarding stale action board membership"
            );
            return Ok(false);
        }

        debug!(count = ids.len(), "action board loaded");

        state.membership.replace(ids);
        state.touch();

        Ok(true)
    }

    /// Re-fetch membership after a change whose exact delta is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    pub async fn refresh(&self) -> Result<bool, ActionBoardError> {
        self.load().await
    }

    /// Put `ids` on the board.
    ///
    /// # Errors
    ///
    /// Returns [`ActionBoardError::RolledBack`] if the backend write fails.
    pub async fn add(&self, ids: &[ProductId]) -> Result<BoardMutation, ActionBoardError> {
        self.mutate(MutationKind::Add, ids).await
    }

    /// Take `ids` off the board.
    ///
    /// # Errors
    ///
    /// Returns [`ActionBoardError::RolledBack`] if the backend write fails.
    pub async fn remove(&self, ids: &[ProductId]) -> Result<BoardMutation, ActionBoardError> {
        self.mutate(MutationKind::Remove, ids).await
    }

    async fn mutate(
        &self,
        kind: MutationKind,
        ids: &[ProductId],
    ) -> Result<BoardMutation, ActionBoardError> {
        let _write = self.writes.lock().await;

        let mut mutation = {
            let mut state = self.state();

            // An in-flight load predates this change.
            state.generations.invalidate();
            state.touch();

            match kind {
                MutationKind::Add => state.membership.begin_add(ids),
                MutationKind::Remove => state.membership.begin_remove(ids),
            }
        };

        if ids.is_empty() {
            mutation.commit()?;
            return Ok(mutation);
        }

        let result: Result<(), BackendError> = match kind {
            MutationKind::Add => self.backend.add_items(ids.to_vec()).await,
            MutationKind::Remove => self.backend.remove_items(ids.to_vec()).await,
        };

        match result {
            Ok(()) => {
                mutation.commit()?;

                Ok(mutation)
            }
            Err(source) => {
                {
                    let mut state = self.state();
                    state.membership.rollback(&mut mutation)?;
                    state.touch();
                }

                warn!(
                    ?kind,
                    changed = mutation.changed().len(),
                    %source,
                    "action board change rolled back"
                );

                Err(ActionBoardError::RolledBack { mutation, source })
            }
        }
    }

    /// Put every product matching `filters` on the board, optionally only
    /// those with review `status`, then reload membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the bulk add or the reload fails.
    pub async fn bulk_add(
        &self,
        filters: &FilterCriteria,
        status: Option<PriceStatus>,
    ) -> Result<(), ActionBoardError> {
        let request = match status {
            Some(status) => BulkAddRequest::with_status(filters, status),
            None => BulkAddRequest::matching(filters),
        };

        self.backend
            .bulk_add(request)
            .await
            .inspect_err(|source| error!(%source, "bulk add to action board failed"))?;

        self.refresh().await?;

        Ok(())
    }

    /// Whether `id` is on the board.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.state().membership.contains(id)
    }

    /// Number of products on the board.
    pub fn len(&self) -> usize {
        self.state().membership.len()
    }

    /// Whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.state().membership.is_empty()
    }

    /// Copy of the current membership.
    pub fn snapshot(&self) -> BoardMembership {
        self.state().membership.clone()
    }

    /// Counter bumped whenever membership changes locally or is reloaded.
    pub fn revision(&self) -> u64 {
        self.state().revision
    }
}
