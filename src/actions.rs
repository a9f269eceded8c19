//! Pricing actions
//!
//! The per-view queue of pricing actions the operator has chosen but not yet
//! submitted, and the submission payload built from it.

use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    pricing::{PricingStrategy, calculate_new_price},
    products::{Product, ProductId},
};

/// A strategy chosen for one product, with its derived price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingAction {
    /// Chosen strategy
    pub strategy: PricingStrategy,

    /// Strategy parameter as typed (percentage or display price), possibly empty
    pub value: String,

    /// Derived standardized price, `None` when it cannot be computed
    pub new_price: Option<Decimal>,
}

impl PricingAction {
    /// Compute an action for `product`.
    pub fn compute(product: &Product, strategy: PricingStrategy, value: &str) -> Self {
        Self {
            strategy,
            value: value.to_string(),
            new_price: calculate_new_price(product, strategy, value),
        }
    }

    /// Whether the action has a price and can be submitted.
    pub fn is_submittable(&self) -> bool {
        self.new_price.is_some()
    }
}

/// One entry of a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAction {
    /// Product being repriced
    pub product_id: ProductId,

    /// Strategy
    #[serde(rename = "type")]
    pub strategy: PricingStrategy,

    /// Strategy parameter as typed
    pub value: String,

    /// New standardized price
    #[serde(rename = "newPrice", with = "rust_decimal::serde::float")]
    pub new_price: Decimal,
}

/// Body of `POST /actions/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Actions to apply
    pub actions: Vec<SubmittedAction>,

    /// Whether the backend should resolve the targets from a filter scope
    pub is_global: bool,
}

impl SubmitRequest {
    /// Product identifiers covered by the request.
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.actions
            .iter()
            .map(|action| action.product_id.clone())
            .collect()
    }
}

/// Why a submission could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// None of the targeted products has a computed action.
    #[error("no actions pending to submit")]
    NothingToSubmit,
}

/// Queue of pending pricing actions keyed by product.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    actions: FxHashMap<ProductId, PricingAction>,
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Queued action for `id`.
    pub fn get(&self, id: &ProductId) -> Option<&PricingAction> {
        self.actions.get(id)
    }

    /// Queued price for `id`, if one was computed.
    pub fn new_price(&self, id: &ProductId) -> Option<Decimal> {
        self.actions.get(id).and_then(|action| action.new_price)
    }

    /// Choose `strategy` with `value` for `product`, replacing any earlier choice.
    pub fn set_action(
        &mut self,
        product: &Product,
        strategy: PricingStrategy,
        value: &str,
    ) -> &PricingAction {
        self.actions
            .entry(product.product_id.clone())
            .insert_entry(PricingAction::compute(product, strategy, value))
            .into_mut()
    }

    /// Apply one strategy to every loaded product in `ids`.
    ///
    /// Products whose price cannot be computed keep their previous entry.
    /// Returns how many entries were written.
    pub fn apply_bulk<'a>(
        &mut self,
        loaded: impl IntoIterator<Item = &'a Product>,
        ids: &[ProductId],
        strategy: PricingStrategy,
        value: &str,
    ) -> usize {
        let targets: FxHashSet<&ProductId> = ids.iter().collect();
        let mut applied = 0;

        for product in loaded
            .into_iter()
            .filter(|p| targets.contains(&p.product_id))
        {
            let action = PricingAction::compute(product, strategy, value);

            if action.is_submittable() {
                self.actions.insert(product.product_id.clone(), action);
                applied += 1;
            }
        }

        applied
    }

    /// Drop entries for products that are not in `loaded`.
    pub fn retain_loaded(&mut self, loaded: &[ProductId]) {
        let loaded: FxHashSet<&ProductId> = loaded.iter().collect();

        self.actions.retain(|id, _| loaded.contains(id));
    }

    /// Discard pending edits for `ids`.
    pub fn reset_actions(&mut self, ids: &[ProductId]) {
        for id in ids {
            self.actions.remove(id);
        }
    }

    /// Remove entries that were submitted successfully.
    pub fn complete(&mut self, ids: &[ProductId]) {
        self.reset_actions(ids);
    }

    /// Build the submission for `ids`.
    ///
    /// An empty `ids` targets every queued product that is also in `loaded`;
    /// queued products from other pages are left out. Only entries with a
    /// computed price are included.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::NothingToSubmit`] if no entry qualifies.
    pub fn build_submission<'a>(
        &self,
        ids: &[ProductId],
        loaded: impl IntoIterator<Item = &'a Product>,
    ) -> Result<SubmitRequest, SubmissionError> {
        let targets: Vec<&ProductId> = if ids.is_empty() {
            loaded
                .into_iter()
                .map(|p| &p.product_id)
                .filter(|id| self.actions.contains_key(*id))
                .collect()
        } else {
            ids.iter().collect()
        };

        let mut seen = FxHashSet::default();

        let actions: Vec<SubmittedAction> = targets
            .into_iter()
            .filter(|id| seen.insert(*id))
            .filter_map(|id| {
                let action = self.actions.get(id)?;

                Some(SubmittedAction {
                    product_id: id.clone(),
                    strategy: action.strategy,
                    value: action.value.clone(),
                    new_price: action.new_price?,
                })
            })
            .collect();

        if actions.is_empty() {
            return Err(SubmissionError::NothingToSubmit);
        }

        Ok(SubmitRequest {
            actions,
            is_global: false,
        })
    }
}
