//! Ledger store: the external tabular collaborator holding the inventory and
//! transaction tables.

pub mod codec;
pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerStore, LedgerStoreError, LedgerTables, SheetRow};
pub use sqlite::SqliteLedgerStore;
