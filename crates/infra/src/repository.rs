//! Inventory repository: the inventory table as a cached, keyed snapshot.

use std::sync::{Arc, RwLock};

use bookstock_core::StockResult;
use bookstock_inventory::InventoryTable;

use crate::ledger_store::codec::{inventory_row_from_sheet, inventory_row_to_sheet};
use crate::ledger_store::LedgerStore;

/// Loads and persists the whole inventory table.
///
/// `load()` memoizes the snapshot until the next `save()`, `refresh()` or
/// `invalidate()`. Writes from other processes are not observed inside that
/// window, and a save from a stale snapshot overwrites them (last writer wins).
#[derive(Debug)]
pub struct InventoryRepository<S> {
    store: S,
    table: String,
    cache: RwLock<Option<Arc<InventoryTable>>>,
}

impl<S> InventoryRepository<S>
where
    S: LedgerStore,
{
    pub fn new(store: S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn cached(&self) -> Option<Arc<InventoryTable>> {
        self.cache.read().ok().and_then(|c| c.clone())
    }

    fn remember(&self, snapshot: Option<Arc<InventoryTable>>) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = snapshot;
        }
    }

    /// Current snapshot, read from the store only when nothing is cached.
    pub async fn load(&self) -> StockResult<Arc<InventoryTable>> {
        if let Some(snapshot) = self.cached() {
            return Ok(snapshot);
        }

        let rows = self
            .store
            .read_all(&self.table)
            .await?
            .into_iter()
            .map(inventory_row_from_sheet)
            .collect::<Result<Vec<_>, _>>()?;
        let snapshot = Arc::new(InventoryTable::from_rows(rows)?);

        tracing::debug!(table = %self.table, rows = snapshot.len(), "inventory loaded");
        self.remember(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Drop the cached snapshot.
    pub fn invalidate(&self) {
        self.remember(None);
    }

    /// Drop the cached snapshot and read the store again.
    pub async fn refresh(&self) -> StockResult<Arc<InventoryTable>> {
        self.invalidate();
        self.load().await
    }

    /// Overwrite the stored table with `table` and cache it.
    ///
    /// On failure the cache is dropped: a clear-then-rewrite store may have
    /// been left partially written.
    pub async fn save(&self, table: InventoryTable) -> StockResult<Arc<InventoryTable>> {
        let rows = table
            .rows()
            .map(inventory_row_to_sheet)
            .collect::<Result<Vec<_>, _>>()?;

        if let Err(e) = self.store.write_all(&self.table, rows).await {
            self.invalidate();
            return Err(e.into());
        }

        let snapshot = Arc::new(table);
        self.remember(Some(snapshot.clone()));
        Ok(snapshot)
    }
}
