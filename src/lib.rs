//! Repricer
//!
//! Repricer is the pricing-action core of a retail repricing dashboard: it derives new prices from
//! competitor data and tracks which products are selected, queued and on the action board.

pub mod actions;
pub mod analytics;
pub mod board;
pub mod filters;
pub mod fixtures;
pub mod generation;
pub mod listing;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod selection;
pub mod settings;
