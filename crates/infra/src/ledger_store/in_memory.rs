use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::r#trait::{LedgerStore, LedgerStoreError, SheetRow};

/// In-memory ledger store.
///
/// Intended for tests/dev. Failure switches let tests simulate an unreachable
/// store or a table that refuses writes.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    tables: RwLock<HashMap<String, Vec<SheetRow>>>,
    unavailable: AtomicBool,
    rejecting: RwLock<HashSet<String>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `Unavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes (not reads) to `table` fail with `Rejected`.
    pub fn reject_writes_to(&self, table: &str, reject: bool) {
        if let Ok(mut set) = self.rejecting.write() {
            if reject {
                set.insert(table.to_string());
            } else {
                set.remove(table);
            }
        }
    }

    /// Number of rows currently held in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn ensure_available(&self) -> Result<(), LedgerStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerStoreError::Unavailable("in-memory store switched off".to_string()));
        }
        Ok(())
    }

    fn ensure_writable(&self, table: &str) -> Result<(), LedgerStoreError> {
        self.ensure_available()?;
        let rejecting = self
            .rejecting
            .read()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
        if rejecting.contains(table) {
            return Err(LedgerStoreError::Rejected {
                table: table.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn read_all(&self, table: &str) -> Result<Vec<SheetRow>, LedgerStoreError> {
        self.ensure_available()?;
        let tables = self
            .tables
            .read()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    async fn write_all(&self, table: &str, rows: Vec<SheetRow>) -> Result<(), LedgerStoreError> {
        self.ensure_writable(table)?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
        tables.insert(table.to_string(), rows);
        Ok(())
    }

    async fn append_row(&self, table: &str, row: SheetRow) -> Result<(), LedgerStoreError> {
        self.ensure_writable(table)?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| LedgerStoreError::Unavailable("lock poisoned".to_string()))?;
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> SheetRow {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn write_all_replaces_and_append_extends() {
        let store = InMemoryLedgerStore::new();
        store
            .write_all("Inventory", vec![row(json!({"ISBN": "1"})), row(json!({"ISBN": "2"}))])
            .await
            .unwrap();
        store.write_all("Inventory", vec![row(json!({"ISBN": "3"}))]).await.unwrap();
        store.append_row("Inventory", row(json!({"ISBN": "4"}))).await.unwrap();

        let rows = store.read_all("Inventory").await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["ISBN"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[tokio::test]
    async fn unknown_table_reads_empty() {
        let store = InMemoryLedgerStore::new();
        assert!(store.read_all("Nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_switches() {
        let store = InMemoryLedgerStore::new();

        store.set_unavailable(true);
        assert!(matches!(
            store.read_all("Inventory").await,
            Err(LedgerStoreError::Unavailable(_))
        ));
        store.set_unavailable(false);

        store.reject_writes_to("Transactions", true);
        assert!(matches!(
            store.append_row("Transactions", SheetRow::new()).await,
            Err(LedgerStoreError::Rejected { .. })
        ));
        assert!(store.read_all("Transactions").await.unwrap().is_empty());
        store.reject_writes_to("Transactions", false);
        store.append_row("Transactions", SheetRow::new()).await.unwrap();
        assert_eq!(store.row_count("Transactions"), 1);
    }
}
