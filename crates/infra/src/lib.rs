//! Infrastructure layer: ledger store adapters, repositories, orchestration.

pub mod ledger_store;
pub mod repository;
pub mod stock_service;
pub mod transaction_log;

pub use ledger_store::{
    InMemoryLedgerStore, LedgerStore, LedgerStoreError, LedgerTables, SheetRow, SqliteLedgerStore,
};
pub use repository::InventoryRepository;
pub use stock_service::{MutationReceipt, StockService};
pub use transaction_log::TransactionLog;
