use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDateTime;

use bookstock_core::StockResult;
use bookstock_infra::{
    InMemoryLedgerStore, MutationReceipt, SqliteLedgerStore, StockService,
};
use bookstock_inventory::{
    InboundRequest, InventoryTable, OutboundRequest, OutboundSummary, TransactionKind,
    TransactionRecord,
};

use crate::config::{AppConfig, Backend};

type InMemoryStockService = StockService<Arc<InMemoryLedgerStore>>;
type SqliteStockService = StockService<SqliteLedgerStore>;

#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryLedgerStore>,
        stock: Arc<InMemoryStockService>,
    },
    Sqlite {
        stock: Arc<SqliteStockService>,
    },
}

/// Dispatch `$body` to the stock service of whichever backend is wired.
macro_rules! with_stock {
    ($services:expr, $stock:ident => $body:expr) => {
        match $services {
            AppServices::InMemory { stock: $stock, .. } => $body,
            AppServices::Sqlite { stock: $stock } => $body,
        }
    };
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match config.backend {
        Backend::Memory => Ok(build_in_memory_services(config)),
        Backend::Sqlite => {
            let store = SqliteLedgerStore::connect(&config.tables.store_name)
                .await
                .with_context(|| format!("failed to open ledger store {}", config.tables.store_name))?;
            tracing::info!(store = %config.tables.store_name, "using sqlite ledger store");
            Ok(AppServices::Sqlite {
                stock: Arc::new(StockService::new(store, &config.tables)),
            })
        }
    }
}

pub fn build_in_memory_services(config: &AppConfig) -> AppServices {
    // In-memory wiring (dev/test): contents live only as long as the process.
    let store = Arc::new(InMemoryLedgerStore::new());
    let stock = Arc::new(StockService::new(store.clone(), &config.tables));
    AppServices::InMemory { store, stock }
}

impl AppServices {
    pub async fn inbound(
        &self,
        req: InboundRequest,
        occurred_at: NaiveDateTime,
    ) -> StockResult<MutationReceipt> {
        with_stock!(self, stock => stock.inbound(req, occurred_at).await)
    }

    pub async fn outbound(
        &self,
        req: OutboundRequest,
        occurred_at: NaiveDateTime,
    ) -> StockResult<MutationReceipt> {
        with_stock!(self, stock => stock.outbound(req, occurred_at).await)
    }

    pub async fn current_stock(&self) -> StockResult<Arc<InventoryTable>> {
        with_stock!(self, stock => stock.current_stock().await)
    }

    pub async fn history(&self, kind: TransactionKind) -> StockResult<Vec<TransactionRecord>> {
        with_stock!(self, stock => stock.history(kind).await)
    }

    pub async fn secondary_summary(&self) -> StockResult<Vec<OutboundSummary>> {
        with_stock!(self, stock => stock.secondary_summary().await)
    }

    pub async fn refresh(&self) -> StockResult<()> {
        with_stock!(self, stock => stock.refresh().await)
    }

    /// The in-memory store, when that backend is wired (tests use it to inject failures).
    pub fn in_memory_store(&self) -> Option<&Arc<InMemoryLedgerStore>> {
        match self {
            AppServices::InMemory { store, .. } => Some(store),
            AppServices::Sqlite { .. } => None,
        }
    }
}
