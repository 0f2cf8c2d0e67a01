use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use bookstock_core::StockError;

/// One row of a ledger table: column name -> cell value.
pub type SheetRow = Map<String, JsonValue>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerStoreError {
    /// The backing store could not be reached.
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),

    /// The backing store refused the operation.
    #[error("ledger store rejected operation on '{table}': {reason}")]
    Rejected { table: String, reason: String },

    /// A stored row could not be mapped to or from a domain row.
    #[error("row codec error: {0}")]
    Codec(String),
}

impl From<LedgerStoreError> for StockError {
    fn from(value: LedgerStoreError) -> Self {
        StockError::Persistence(value.to_string())
    }
}

/// Tabular store holding the ledger tables.
///
/// Each table is an ordered list of field-mapping rows. There are no targeted
/// writes: a table is either replaced wholesale or extended by one row.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All rows of `table` in stored order. A table that was never written is empty.
    async fn read_all(&self, table: &str) -> Result<Vec<SheetRow>, LedgerStoreError>;

    /// Replace every row of `table`.
    async fn write_all(&self, table: &str, rows: Vec<SheetRow>) -> Result<(), LedgerStoreError>;

    /// Add one row at the end of `table`.
    async fn append_row(&self, table: &str, row: SheetRow) -> Result<(), LedgerStoreError>;
}

#[async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn read_all(&self, table: &str) -> Result<Vec<SheetRow>, LedgerStoreError> {
        (**self).read_all(table).await
    }

    async fn write_all(&self, table: &str, rows: Vec<SheetRow>) -> Result<(), LedgerStoreError> {
        (**self).write_all(table, rows).await
    }

    async fn append_row(&self, table: &str, row: SheetRow) -> Result<(), LedgerStoreError> {
        (**self).append_row(table, row).await
    }
}

/// Names of the store and its tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTables {
    pub store_name: String,
    pub inventory: String,
    pub transactions: String,
    /// Secondary outbound sheet. Configured alongside the others but not
    /// written by the ledger; the secondary channel lives in `transactions`.
    pub secondary: String,
}

impl Default for LedgerTables {
    fn default() -> Self {
        Self {
            store_name: "bookstock".to_string(),
            inventory: "Inventory".to_string(),
            transactions: "Transactions".to_string(),
            secondary: "SecondaryOutbound".to_string(),
        }
    }
}
