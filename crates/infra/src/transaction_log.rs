//! Append-only transaction log.

use std::sync::{Arc, RwLock};

use bookstock_core::StockResult;
use bookstock_inventory::TransactionRecord;

use crate::ledger_store::codec::{transaction_from_sheet, transaction_to_sheet};
use crate::ledger_store::LedgerStore;

/// Every stock change, in store insertion order.
///
/// Appends are independent of the inventory save; there is no transactional
/// link between the two tables.
#[derive(Debug)]
pub struct TransactionLog<S> {
    store: S,
    table: String,
    cache: RwLock<Option<Arc<Vec<TransactionRecord>>>>,
}

impl<S> TransactionLog<S>
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

    pub async fn append(&self, record: &TransactionRecord) -> StockResult<()> {
        let row = transaction_to_sheet(record)?;
        let result = self.store.append_row(&self.table, row).await;
        // Whether or not the append landed, the cached view may now be stale.
        self.invalidate();
        result?;
        Ok(())
    }

    pub async fn load_all(&self) -> StockResult<Arc<Vec<TransactionRecord>>> {
        if let Some(records) = self.cache.read().ok().and_then(|c| c.clone()) {
            return Ok(records);
        }

        let records = self
            .store
            .read_all(&self.table)
            .await?
            .into_iter()
            .map(transaction_from_sheet)
            .collect::<Result<Vec<_>, _>>()?;
        let records = Arc::new(records);

        tracing::debug!(table = %self.table, rows = records.len(), "transactions loaded");
        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(records.clone());
        }
        Ok(records)
    }

    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }

    pub async fn refresh(&self) -> StockResult<Arc<Vec<TransactionRecord>>> {
        self.invalidate();
        self.load_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use bookstock_core::{Isbn, StockError};
    use bookstock_inventory::TransactionKind;

    use crate::ledger_store::InMemoryLedgerStore;

    fn record(minute: u32, change: i64, kind: TransactionKind) -> TransactionRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, minute, 0)
            .unwrap();
        TransactionRecord::new(ts, Isbn::parse("111").unwrap(), "T", change, kind)
    }

    #[tokio::test]
    async fn appends_are_visible_in_insertion_order() {
        let log = TransactionLog::new(Arc::new(InMemoryLedgerStore::new()), "Transactions");
        assert!(log.load_all().await.unwrap().is_empty());

        log.append(&record(2, 5, TransactionKind::In)).await.unwrap();
        log.append(&record(1, -2, TransactionKind::Out)).await.unwrap();

        let all = log.load_all().await.unwrap();
        let changes: Vec<i64> = all.iter().map(|r| r.change).collect();
        assert_eq!(changes, vec![5, -2]);
        assert_eq!(all[0], record(2, 5, TransactionKind::In));
    }

    #[tokio::test]
    async fn load_all_is_memoized() {
        let log = TransactionLog::new(Arc::new(InMemoryLedgerStore::new()), "Transactions");
        log.append(&record(0, 1, TransactionKind::In)).await.unwrap();

        let a = log.load_all().await.unwrap();
        let b = log.load_all().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn append_failure_is_a_persistence_error() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let log = TransactionLog::new(store.clone(), "Transactions");
        store.reject_writes_to("Transactions", true);

        let err = log.append(&record(0, 1, TransactionKind::In)).await.unwrap_err();
        assert!(matches!(err, StockError::Persistence(_)));
        assert!(log.load_all().await.unwrap().is_empty());
    }
}
