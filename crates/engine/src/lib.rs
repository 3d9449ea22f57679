//! Engine crate – shared client logic for the deckctl test harness.
//!
//! Talks to the Card Games Engine HTTP API behind the [`traits::DeckApi`]
//! trait and keeps the last outcome of each operation in a headless
//! [`view::DeckView`]. It does NOT depend on any terminal or config types,
//! so every front end (one-shot CLI, interactive session, daemon) drives
//! the same view model.

pub mod commands;
pub mod context;
pub mod platform;
pub mod query;
pub mod scenario;
pub mod traits;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use commands::{Action, ActionRegistry};
pub use context::AppContext;
pub use query::{add_query_params, DeckQuery};
pub use types::{ActionResult, ErrorCode, ErrorInfo, Status};
pub use view::{DeckView, ViewSnapshot};
