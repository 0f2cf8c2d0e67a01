//! `bookstock-core` — shared building blocks for the stock ledger.
//!
//! This crate contains **pure** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{StockError, StockResult};
pub use id::Isbn;
