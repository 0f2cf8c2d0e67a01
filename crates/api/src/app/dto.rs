use serde::Deserialize;

use bookstock_core::{Isbn, StockResult};
use bookstock_infra::MutationReceipt;
use bookstock_inventory::{
    InboundRequest, InventoryRow, OutboundChannel, OutboundRequest, OutboundSummary,
    TransactionRecord,
};

// -------------------------
// Request DTOs
// -------------------------

/// Inbound form. `title`, `author` and `price` are only needed for a new ISBN.
#[derive(Debug, Deserialize)]
pub struct InboundBody {
    pub isbn: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<u64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct OutboundBody {
    pub isbn: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl InboundBody {
    pub fn into_request(self) -> StockResult<InboundRequest> {
        Ok(InboundRequest {
            isbn: Isbn::parse(&self.isbn)?,
            title: self.title,
            author: self.author,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

impl OutboundBody {
    pub fn into_request(self, channel: OutboundChannel) -> StockResult<OutboundRequest> {
        Ok(OutboundRequest {
            isbn: Isbn::parse(&self.isbn)?,
            quantity: self.quantity,
            channel,
        })
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn row_to_json(row: &InventoryRow) -> serde_json::Value {
    serde_json::json!({
        "isbn": row.isbn.as_str(),
        "title": row.title,
        "author": row.author,
        "price": row.price,
        "quantity": row.quantity,
    })
}

pub fn record_to_json(record: &TransactionRecord) -> serde_json::Value {
    serde_json::json!({
        "date": record.formatted_timestamp(),
        "isbn": record.isbn.as_str(),
        "title": record.title,
        "change": record.change,
        "type": record.kind.as_str(),
    })
}

pub fn receipt_to_json(receipt: &MutationReceipt) -> serde_json::Value {
    serde_json::json!({
        "row": row_to_json(&receipt.row),
        "transaction": record_to_json(&receipt.record),
    })
}

pub fn summary_to_json(summary: &OutboundSummary) -> serde_json::Value {
    serde_json::json!({
        "isbn": summary.isbn.as_str(),
        "title": summary.title,
        "total_quantity": summary.total_quantity,
    })
}
