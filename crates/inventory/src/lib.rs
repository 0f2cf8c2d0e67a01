//! Inventory domain module.
//!
//! This crate contains the stock rules for the book ledger, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod movement;
pub mod row;
pub mod transaction;
pub mod views;

pub use movement::{
    InboundRequest, MutationStage, OutboundChannel, OutboundRequest, Registration, StockCommand,
    StockMovement,
};
pub use row::{InventoryRow, InventoryTable};
pub use transaction::{TIMESTAMP_FORMAT, TransactionKind, TransactionRecord};
pub use views::{OutboundSummary, history, outbound_summary, secondary_outbound_summary};
