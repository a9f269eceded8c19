//! Action Board membership backed by the pricing backend.

mod errors;
mod store;

pub use errors::ActionBoardError;
pub use store::ActionBoardStore;
