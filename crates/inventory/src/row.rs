use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bookstock_core::{Isbn, StockError, StockResult};

use crate::movement::{
    InboundRequest, OutboundRequest, Registration, StockCommand, StockMovement,
    ensure_positive_quantity,
};
use crate::transaction::TransactionKind;

/// One book in stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    pub price: u64,
    pub quantity: i64,
}

/// The full inventory, keyed by identifier.
///
/// Decision logic (`plan_*`) never mutates; `apply` is the only way a row
/// changes, mirroring the handle/apply split of the rest of the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryTable {
    rows: BTreeMap<Isbn, InventoryRow>,
}

impl InventoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from stored rows, rejecting duplicate identifiers and
    /// negative quantities.
    pub fn from_rows(rows: impl IntoIterator<Item = InventoryRow>) -> StockResult<Self> {
        let mut table = Self::new();
        for row in rows {
            if row.quantity < 0 {
                return Err(StockError::validation(format!(
                    "row {} has negative quantity {}",
                    row.isbn, row.quantity
                )));
            }
            if table.rows.contains_key(&row.isbn) {
                return Err(StockError::validation(format!(
                    "duplicate identifier {}",
                    row.isbn
                )));
            }
            table.rows.insert(row.isbn.clone(), row);
        }
        Ok(table)
    }

    pub fn get(&self, isbn: &Isbn) -> Option<&InventoryRow> {
        self.rows.get(isbn)
    }

    pub fn contains(&self, isbn: &Isbn) -> bool {
        self.rows.contains_key(isbn)
    }

    /// Rows ordered by identifier.
    pub fn rows(&self) -> impl Iterator<Item = &InventoryRow> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate a command against this snapshot.
    pub fn plan(&self, command: &StockCommand) -> StockResult<StockMovement> {
        match command {
            StockCommand::Inbound(req) => self.plan_inbound(req),
            StockCommand::Outbound(req) => self.plan_outbound(req),
        }
    }

    pub fn plan_inbound(&self, req: &InboundRequest) -> StockResult<StockMovement> {
        ensure_positive_quantity(req.quantity)?;

        let registration = if self.contains(&req.isbn) {
            None
        } else {
            let title = required_text(req.title.as_deref(), "title")?;
            let author = required_text(req.author.as_deref(), "author")?;
            let price = req.price.ok_or(StockError::MissingRequiredField("price"))?;
            Some(Registration { title, author, price })
        };

        Ok(StockMovement {
            isbn: req.isbn.clone(),
            kind: TransactionKind::In,
            delta: req.quantity,
            registration,
        })
    }

    pub fn plan_outbound(&self, req: &OutboundRequest) -> StockResult<StockMovement> {
        ensure_positive_quantity(req.quantity)?;

        let row = self
            .get(&req.isbn)
            .ok_or_else(|| StockError::UnknownIdentifier(req.isbn.clone()))?;

        if req.quantity > row.quantity {
            return Err(StockError::InsufficientStock {
                isbn: req.isbn.clone(),
                requested: req.quantity,
                on_hand: row.quantity,
            });
        }

        let kind = req.channel.kind();
        Ok(StockMovement {
            isbn: req.isbn.clone(),
            kind,
            delta: kind.sign() * req.quantity,
            registration: None,
        })
    }

    /// Apply a planned movement and return the updated row.
    ///
    /// Re-checks the row invariants so a movement planned against a stale
    /// snapshot cannot drive quantity negative.
    pub fn apply(&mut self, movement: &StockMovement) -> StockResult<&InventoryRow> {
        match &movement.registration {
            Some(reg) if !self.rows.contains_key(&movement.isbn) => {
                let row = InventoryRow {
                    isbn: movement.isbn.clone(),
                    title: reg.title.clone(),
                    author: reg.author.clone(),
                    price: reg.price,
                    quantity: movement.delta,
                };
                Ok(&*self.rows.entry(movement.isbn.clone()).or_insert(row))
            }
            _ => {
                let row = self
                    .rows
                    .get_mut(&movement.isbn)
                    .ok_or_else(|| StockError::UnknownIdentifier(movement.isbn.clone()))?;
                let next = row.quantity.checked_add(movement.delta).ok_or_else(|| {
                    StockError::validation(format!(
                        "quantity for {} would overflow ({} + {})",
                        movement.isbn, row.quantity, movement.delta
                    ))
                })?;
                if next < 0 {
                    return Err(StockError::InsufficientStock {
                        isbn: movement.isbn.clone(),
                        requested: -movement.delta,
                        on_hand: row.quantity,
                    });
                }
                row.quantity = next;
                Ok(&*row)
            }
        }
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> StockResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(StockError::MissingRequiredField(field)),
    }
}
