//! Repricer Application
//!
//! Backend client, Action Board store and view controllers for the repricing dashboard, plus
//! the configuration and logging the `repricer` binary is built from.

pub mod backend;
pub mod board;
pub mod config;
pub mod context;
pub mod observability;
pub mod render;
pub mod views;

#[cfg(test)]
mod test_helpers;
