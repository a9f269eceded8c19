//! Action board membership
//!
//! Local cache of the products the backend has on the action board. Additions
//! and removals are applied optimistically and described by a [`BoardMutation`]
//! that is later committed or rolled back once the backend answers.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::products::ProductId;

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Products added to the board.
    Add,

    /// Products removed from the board.
    Remove,
}

/// Lifecycle of an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, awaiting the backend.
    Pending,

    /// Confirmed by the backend.
    Committed,

    /// Undone after the backend failed.
    RolledBack,
}

/// Errors moving a mutation between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Only pending mutations can be committed or rolled back.
    #[error("mutation is already {0:?}")]
    NotPending(MutationState),
}

/// An optimistic change to board membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMutation {
    kind: MutationKind,
    requested: Vec<ProductId>,
    changed: Vec<ProductId>,
    state: MutationState,
}

impl BoardMutation {
    /// Direction of the change.
    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Identifiers the caller asked for, sent to the backend.
    pub fn requested(&self) -> &[ProductId] {
        &self.requested
    }

    /// Identifiers whose local membership actually changed.
    pub fn changed(&self) -> &[ProductId] {
        &self.changed
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MutationState {
        self.state
    }

    /// Mark the mutation as confirmed by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotPending`] if the mutation already settled.
    pub fn commit(&mut self) -> Result<(), MutationError> {
        self.ensure_pending()?;
        self.state = MutationState::Committed;

        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), MutationError> {
        match self.state {
            MutationState::Pending => Ok(()),
            other => Err(MutationError::NotPending(other)),
        }
    }
}

/// Products currently on the action board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardMembership {
    items: FxHashSet<ProductId>,
}

impl BoardMembership {
    /// Create membership from a full identifier list.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            items: ids.into_iter().collect(),
        }
    }

    /// Whether `id` is on the board.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }

    /// Number of products on the board.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over board members.
    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter()
    }

    /// Board members in sorted order.
    pub fn sorted(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.items.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Replace the cache wholesale with what the backend reported.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ProductId>) {
        self.items = ids.into_iter().collect();
    }

    /// Optimistically add `ids`.
    pub fn begin_add(&mut self, ids: &[ProductId]) -> BoardMutation {
        let changed = ids
            .iter()
            .filter(|id| self.items.insert((*id).clone()))
            .cloned()
            .collect();

        BoardMutation {
            kind: MutationKind::Add,
            requested: ids.to_vec(),
            changed,
            state: MutationState::Pending,
        }
    }

    /// Optimistically remove `ids`.
    pub fn begin_remove(&mut self, ids: &[ProductId]) -> BoardMutation {
        let changed = ids
            .iter()
            .filter(|id| self.items.remove(*id))
            .cloned()
            .collect();

        BoardMutation {
            kind: MutationKind::Remove,
            requested: ids.to_vec(),
            changed,
            state: MutationState::Pending,
        }
    }

    /// Undo exactly the local changes a pending mutation made.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotPending`] if the mutation already settled.
    pub fn rollback(&mut self, mutation: &mut BoardMutation) -> Result<(), MutationError> {
        mutation.ensure_pending()?;

        match mutation.kind {
            MutationKind::Add => {
                for id in &mutation.changed {
                    self.items.remove(id);
                }
            }
            MutationKind::Remove => {
                self.items.extend(mutation.changed.iter().cloned());
            }
        }

        mutation.state = MutationState::RolledBack;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn ids(values: &[&str]) -> Vec<ProductId> {
        values.iter().copied().map(ProductId::from).collect()
    }

    #[test]
    fn add_is_visible_before_commit() {
        let mut board = BoardMembership::default();
        let mutation = board.begin_add(&ids(&["p1"]));

        assert!(board.contains(&ProductId::from("p1")));
        assert_eq!(mutation.state(), MutationState::Pending);
    }

    #[test]
    fn rollback_add_restores_previous_membership() -> TestResult {
        let mut board = BoardMembership::from_ids(ids(&["p0"]));
        let before = board.clone();

        let mut mutation = board.begin_add(&ids(&["p1"]));
        board.rollback(&mut mutation)?;

        assert_eq!(board, before);
        assert!(!board.contains(&ProductId::from("p1")));
        assert_eq!(mutation.state(), MutationState::RolledBack);

        Ok(())
    }

    #[test]
    fn rollback_add_keeps_members_that_were_already_present() -> TestResult {
        let mut board = BoardMembership::from_ids(ids(&["p1"]));

        let mut mutation = board.begin_add(&ids(&["p1", "p2"]));
        assert_eq!(mutation.changed(), ids(&["p2"]).as_slice());
        assert_eq!(mutation.requested(), ids(&["p1", "p2"]).as_slice());

        board.rollback(&mut mutation)?;

        assert_eq!(board.sorted(), ids(&["p1"]));

        Ok(())
    }

    #[test]
    fn rollback_remove_reinserts_removed_members() -> TestResult {
        let mut board = BoardMembership::from_ids(ids(&["p1", "p2"]));

        let mut mutation = board.begin_remove(&ids(&["p2", "p3"]));
        assert_eq!(board.sorted(), ids(&["p1"]));

        board.rollback(&mut mutation)?;

        assert_eq!(board.sorted(), ids(&["p1", "p2"]));

        Ok(())
    }

    #[test]
    fn settled_mutations_cannot_transition_again() -> TestResult {
        let mut board = BoardMembership::default();
        let mut mutation = board.begin_add(&ids(&["p1"]));

        mutation.commit()?;

        assert_eq!(
            board.rollback(&mut mutation),
            Err(MutationError::NotPending(MutationState::Committed))
        );
        assert!(board.contains(&ProductId::from("p1")));

        Ok(())
    }

    #[test]
    fn replace_overwrites_cache() {
        let mut board = BoardMembership::from_ids(ids(&["p1", "p2"]));

        board.replace(ids(&["p3"]));

        assert_eq!(board.sorted(), ids(&["p3"]));
        assert_eq!(board.len(), 1);
    }
}
