//! Mutation requests, planned movements and the mutation state machine.

use serde::{Deserialize, Serialize};

use bookstock_core::{Isbn, StockError, StockResult};

use crate::transaction::TransactionKind;

/// Request: receive stock.
///
/// `title`, `author` and `price` are only consulted when `isbn` is not yet in
/// the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRequest {
    pub isbn: Isbn,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<u64>,
    pub quantity: i64,
}

/// Which outbound tab a request came from. Both share the same rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutboundChannel {
    Primary,
    Secondary,
}

impl OutboundChannel {
    pub fn kind(&self) -> TransactionKind {
        match self {
            OutboundChannel::Primary => TransactionKind::Out,
            OutboundChannel::Secondary => TransactionKind::OutSecondary,
        }
    }
}

/// Request: ship stock out through one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub isbn: Isbn,
    pub quantity: i64,
    pub channel: OutboundChannel,
}

/// Any stock mutation accepted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    Inbound(InboundRequest),
    Outbound(OutboundRequest),
}

impl StockCommand {
    pub fn isbn(&self) -> &Isbn {
        match self {
            StockCommand::Inbound(req) => &req.isbn,
            StockCommand::Outbound(req) => &req.isbn,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            StockCommand::Inbound(_) => TransactionKind::In,
            StockCommand::Outbound(req) => req.channel.kind(),
        }
    }
}

/// Details of an identifier seen for the first time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub title: String,
    pub author: String,
    pub price: u64,
}

/// A validated change, ready to be applied to an `InventoryTable`.
///
/// Produced only by `InventoryTable::plan_inbound` / `plan_outbound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub(crate) isbn: Isbn,
    pub(crate) kind: TransactionKind,
    pub(crate) delta: i64,
    pub(crate) registration: Option<Registration>,
}

impl StockMovement {
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Signed quantity change (positive for inbound).
    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn registers_new_row(&self) -> bool {
        self.registration.is_some()
    }
}

pub(crate) fn ensure_positive_quantity(quantity: i64) -> StockResult<()> {
    if quantity < 1 {
        return Err(StockError::validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

/// Lifecycle of a single mutation.
///
/// ```text
/// Idle -> Validating -> Applying -> Logging -> Done
///              \
///               -> Rejected
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationStage {
    Idle,
    Validating,
    Applying,
    Logging,
    Done,
    Rejected,
}

impl MutationStage {
    pub fn can_advance_to(self, next: MutationStage) -> bool {
        matches!(
            (self, next),
            (MutationStage::Idle, MutationStage::Validating)
                | (MutationStage::Validating, MutationStage::Applying)
                | (MutationStage::Validating, MutationStage::Rejected)
                | (MutationStage::Applying, MutationStage::Logging)
                | (MutationStage::Logging, MutationStage::Done)
        )
    }

    pub fn advance(self, next: MutationStage) -> StockResult<MutationStage> {
        if !self.can_advance_to(next) {
            return Err(StockError::validation(format!(
                "illegal mutation transition {self:?} -> {next:?}"
            )));
        }
        Ok(next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MutationStage::Done | MutationStage::Rejected)
    }
}
