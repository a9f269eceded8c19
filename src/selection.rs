//! Selection
//!
//! Tracks which products are selected across a paginated, filtered listing. A
//! selection is either a finite set of identifiers or "everything matching
//! these filters", which lets the backend resolve the members at submission
//! time instead of the client holding every matching identifier.

use rustc_hash::FxHashSet;

use crate::{filters::FilterCriteria, products::ProductId};

/// What a single-item or page toggle does while "all matching" is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlobalTogglePolicy {
    /// Leave global mode and apply the toggle to the retained finite set.
    #[default]
    ExitGlobal,

    /// Stay in global mode and record the toggled items as exclusions.
    TrackExclusions,
}

/// Global selection scope.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GlobalScope {
    filters: FilterCriteria,
    excluded: FxHashSet<ProductId>,
}

/// Resolved view of a selection, for building requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSnapshot {
    /// Exactly these products.
    Finite(Vec<ProductId>),

    /// Every product matching `filters`, except `excluded`.
    AllMatching {
        /// Scope descriptor
        filters: FilterCriteria,

        /// Products deselected while in global mode
        excluded: Vec<ProductId>,
    },
}

impl SelectionSnapshot {
    /// Whether the snapshot selects nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionSnapshot::Finite(ids) if ids.is_empty())
    }
}

/// Selection store.
///
/// Consumers must check [`SelectionStore::is_all_selected`] before consulting
/// the finite set: while global mode is active the finite set is retained but
/// superseded.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    items: FxHashSet<ProductId>,
    global: Option<GlobalScope>,
    policy: GlobalTogglePolicy,
}

impl SelectionStore {
    /// Create an empty store using `policy` for toggles in global mode.
    pub fn new(policy: GlobalTogglePolicy) -> Self {
        Self {
            items: FxHashSet::default(),
            global: None,
            policy,
        }
    }

    /// Toggle policy in effect.
    pub fn policy(&self) -> GlobalTogglePolicy {
        self.policy
    }

    /// Whether "all matching" mode is active.
    pub fn is_all_selected(&self) -> bool {
        self.global.is_some()
    }

    /// Filters scoping the global selection, if active.
    pub fn current_filters(&self) -> Option<&FilterCriteria> {
        self.global.as_ref().map(|scope| &scope.filters)
    }

    /// The finite set. Superseded while [`Self::is_all_selected`] is true.
    pub fn selected_items(&self) -> &FxHashSet<ProductId> {
        &self.items
    }

    /// Size of the finite set.
    ///
    /// In global mode the true total must be asked of the backend; it is not
    /// cached here.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether `id` should render as selected.
    pub fn is_selected(&self, id: &ProductId) -> bool {
        match &self.global {
            Some(scope) => !scope.excluded.contains(id),
            None => self.items.contains(id),
        }
    }

    /// Whether every id on the page renders as selected.
    pub fn is_page_selected(&self, page_ids: &[ProductId]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.is_selected(id))
    }

    /// Flip the membership of a single item.
    pub fn toggle_item(&mut self, id: &ProductId) {
        if let Some(scope) = self.global.as_mut()
            && self.policy == GlobalTogglePolicy::TrackExclusions
        {
            if !scope.excluded.remove(id) {
                scope.excluded.insert(id.clone());
            }

            return;
        }

        self.global = None;

        if !self.items.remove(id) {
            self.items.insert(id.clone());
        }
    }

    /// Page-level "select all" checkbox: removes every page id if all are
    /// selected, otherwise adds them all.
    pub fn toggle_select_all_page(&mut self, page_ids: &[ProductId]) {
        if let Some(scope) = self.global.as_mut()
            && self.policy == GlobalTogglePolicy::TrackExclusions
        {
            let all_in = page_ids.iter().all(|id| !scope.excluded.contains(id));

            for id in page_ids {
                if all_in {
                    scope.excluded.insert(id.clone());
                } else {
                    scope.excluded.remove(id);
                }
            }

            return;
        }

        self.global = None;

        let all_in = page_ids.iter().all(|id| self.items.contains(id));

        for id in page_ids {
            if all_in {
                self.items.remove(id);
            } else {
                self.items.insert(id.clone());
            }
        }
    }

    /// Enter or leave "all matching" mode.
    ///
    /// Entering records `filters` as the scope; the finite set is kept.
    /// Leaving clears the scope.
    pub fn set_select_all_global(&mut self, selected: bool, filters: &FilterCriteria) {
        self.global = selected.then(|| GlobalScope {
            filters: filters.clone(),
            excluded: FxHashSet::default(),
        });
    }

    /// Reset to an empty finite selection.
    pub fn clear_selection(&mut self) {
        self.items.clear();
        self.global = None;
    }

    /// Drop `ids` from the finite set, e.g. after they were submitted.
    pub fn deselect(&mut self, ids: &[ProductId]) {
        for id in ids {
            self.items.remove(id);
        }
    }

    /// The active interpretation of the selection.
    pub fn snapshot(&self) -> SelectionSnapshot {
        match &self.global {
            Some(scope) => {
                let mut excluded: Vec<ProductId> = scope.excluded.iter().cloned().collect();
                excluded.sort();

                SelectionSnapshot::AllMatching {
                    filters: scope.filters.clone(),
                    excluded,
                }
            }
            None => {
                let mut ids: Vec<ProductId> = self.items.iter().cloned().collect();
                ids.sort();

                SelectionSnapshot::Finite(ids)
            }
        }
    }
}
