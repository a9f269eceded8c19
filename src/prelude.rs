//! Repricer prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    actions::{ActionQueue, PricingAction, SubmissionError, SubmitRequest, SubmittedAction},
    analytics::{
        ActionProductPage, AskRequest, AskResponse, CompetitorStats, CompetitorsPage,
        DashboardStats, FilterOptions, ProductPage, SubmitResponse,
    },
    board::{BoardMembership, BoardMutation, MutationError, MutationKind, MutationState},
    filters::{BulkAddRequest, FilterCriteria, FilterField, SortOrder},
    generation::{Generation, Generations},
    listing::{
        ActionProduct, ActionSort, ActionSortColumn, ActionTab, CompetitorPager, PageRequest,
        Pagination, sort_action_products,
    },
    pricing::{PricingStrategy, calculate_new_price, derived_display_price},
    products::{PriceStatus, Product, ProductId},
    selection::{GlobalTogglePolicy, SelectionSnapshot, SelectionStore},
    settings::{ConfidenceBand, Settings, SettingsError},
};
