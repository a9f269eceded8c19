//! Pricing backend client.

mod errors;
mod http;
mod service;

pub use errors::BackendError;
pub use http::{HttpBackend, endpoint, export_url, parse_base};
pub use service::*;
