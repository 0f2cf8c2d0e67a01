//! Stock mutation pipeline (application-level orchestration).
//!
//! ```text
//! StockCommand
//!   ↓
//! 1. Load the inventory snapshot (cached)
//!   ↓
//! 2. Validate against the snapshot (pure, may reject)
//!   ↓
//! 3. Apply to a copy and save the whole table
//!   ↓
//! 4. Append one transaction record
//! ```
//!
//! Steps 3 and 4 are not atomic. If the append fails after the save, the new
//! quantity stays and the log has no entry for it; the failure is logged and
//! returned, nothing is rolled back.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use bookstock_core::StockResult;
use bookstock_inventory::{
    InboundRequest, InventoryRow, InventoryTable, MutationStage, OutboundRequest, OutboundSummary,
    StockCommand, TransactionKind, TransactionRecord,
};

use crate::ledger_store::{LedgerStore, LedgerTables};
use crate::repository::InventoryRepository;
use crate::transaction_log::TransactionLog;

/// Outcome of a completed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReceipt {
    pub row: InventoryRow,
    pub record: TransactionRecord,
    pub stage: MutationStage,
}

/// Runs stock mutations and serves the read views.
///
/// Mutations within one service are serialised: each runs to completion
/// before the next starts.
#[derive(Debug)]
pub struct StockService<S> {
    inventory: InventoryRepository<S>,
    log: TransactionLog<S>,
    write_lock: Mutex<()>,
}

impl<S> StockService<S>
where
    S: LedgerStore + Clone,
{
    pub fn new(store: S, tables: &LedgerTables) -> Self {
        Self {
            inventory: InventoryRepository::new(store.clone(), tables.inventory.clone()),
            log: TransactionLog::new(store, tables.transactions.clone()),
            write_lock: Mutex::new(()),
        }
    }
}

impl<S> StockService<S>
where
    S: LedgerStore,
{
    pub fn inventory(&self) -> &InventoryRepository<S> {
        &self.inventory
    }

    pub fn transactions(&self) -> &TransactionLog<S> {
        &self.log
    }

    pub async fn inbound(
        &self,
        req: InboundRequest,
        occurred_at: NaiveDateTime,
    ) -> StockResult<MutationReceipt> {
        self.execute(StockCommand::Inbound(req), occurred_at).await
    }

    pub async fn outbound(
        &self,
        req: OutboundRequest,
        occurred_at: NaiveDateTime,
    ) -> StockResult<MutationReceipt> {
        self.execute(StockCommand::Outbound(req), occurred_at).await
    }

    /// Run one command through the mutation state machine.
    pub async fn execute(
        &self,
        command: StockCommand,
        occurred_at: NaiveDateTime,
    ) -> StockResult<MutationReceipt> {
        let _guard = self.write_lock.lock().await;
        let isbn = command.isbn().clone();
        let kind = command.kind();

        let mut stage = MutationStage::Idle;
        stage = transition(stage, MutationStage::Validating, &command)?;

        let snapshot = self.inventory.load().await?;
        let movement = match snapshot.plan(&command) {
            Ok(m) => m,
            Err(e) => {
                transition(stage, MutationStage::Rejected, &command)?;
                tracing::warn!(isbn = %isbn, kind = %kind, error = %e, code = e.code(), "stock mutation rejected");
                return Err(e);
            }
        };

        stage = transition(stage, MutationStage::Applying, &command)?;
        let mut next: InventoryTable = (*snapshot).clone();
        let row = next.apply(&movement)?.clone();

        if let Err(e) = self.inventory.save(next).await {
            tracing::error!(isbn = %isbn, kind = %kind, error = %e, "inventory save failed");
            return Err(e);
        }

        stage = transition(stage, MutationStage::Logging, &command)?;
        let record = TransactionRecord::new(
            occurred_at,
            row.isbn.clone(),
            row.title.clone(),
            movement.delta(),
            movement.kind(),
        );

        if let Err(e) = self.log.append(&record).await {
            tracing::error!(
                isbn = %isbn,
                kind = %kind,
                delta = movement.delta(),
                error = %e,
                "inventory saved but transaction append failed; log is missing this change"
            );
            return Err(e);
        }

        stage = transition(stage, MutationStage::Done, &command)?;
        tracing::info!(
            isbn = %isbn,
            kind = %kind,
            delta = movement.delta(),
            quantity = row.quantity,
            new_row = movement.registers_new_row(),
            "stock mutation committed"
        );

        Ok(MutationReceipt { row, record, stage })
    }

    /// Current stock, ordered by identifier.
    pub async fn current_stock(&self) -> StockResult<Arc<InventoryTable>> {
        self.inventory.load().await
    }

    /// Records of one kind, newest first.
    pub async fn history(&self, kind: TransactionKind) -> StockResult<Vec<TransactionRecord>> {
        let records = self.log.load_all().await?;
        Ok(bookstock_inventory::history(records.iter(), kind)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Outbound volume per title for the secondary channel.
    pub async fn secondary_summary(&self) -> StockResult<Vec<OutboundSummary>> {
        let records = self.log.load_all().await?;
        Ok(bookstock_inventory::secondary_outbound_summary(records.iter()).collect())
    }

    /// Drop both cached snapshots and reload them.
    pub async fn refresh(&self) -> StockResult<()> {
        self.inventory.refresh().await?;
        self.log.refresh().await?;
        Ok(())
    }
}

fn transition(
    from: MutationStage,
    to: MutationStage,
    command: &StockCommand,
) -> StockResult<MutationStage> {
    let next = from.advance(to)?;
    tracing::debug!(isbn = %command.isbn(), from = ?from, to = ?next, "mutation stage");
    Ok(next)
}
