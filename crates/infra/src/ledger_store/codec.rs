//! Mapping between domain rows and ledger-store rows.
//!
//! Column names follow the sheets the ledger has always used:
//! Inventory `ISBN | Title | author | price | qty`,
//! Transactions `Date | ISBN | Title | Change | Type`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstock_core::Isbn;
use bookstock_inventory::{InventoryRow, TIMESTAMP_FORMAT, TransactionKind, TransactionRecord};

use super::r#trait::{LedgerStoreError, SheetRow};

#[derive(Debug, Serialize, Deserialize)]
struct InventorySheetRow {
    #[serde(rename = "ISBN")]
    isbn: Isbn,
    #[serde(rename = "Title")]
    title: String,
    author: String,
    price: u64,
    qty: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionSheetRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "ISBN")]
    isbn: Isbn,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Change")]
    change: i64,
    #[serde(rename = "Type")]
    kind: TransactionKind,
}

fn to_sheet<T: Serialize>(value: &T) -> Result<SheetRow, LedgerStoreError> {
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(LedgerStoreError::Codec(format!("expected an object, got {other}"))),
        Err(e) => Err(LedgerStoreError::Codec(e.to_string())),
    }
}

pub fn inventory_row_to_sheet(row: &InventoryRow) -> Result<SheetRow, LedgerStoreError> {
    to_sheet(&InventorySheetRow {
        isbn: row.isbn.clone(),
        title: row.title.clone(),
        author: row.author.clone(),
        price: row.price,
        qty: row.quantity,
    })
}

pub fn inventory_row_from_sheet(row: SheetRow) -> Result<InventoryRow, LedgerStoreError> {
    let sheet: InventorySheetRow = serde_json::from_value(JsonValue::Object(row))
        .map_err(|e| LedgerStoreError::Codec(format!("inventory row: {e}")))?;
    Ok(InventoryRow {
        isbn: sheet.isbn,
        title: sheet.title,
        author: sheet.author,
        price: sheet.price,
        quantity: sheet.qty,
    })
}

pub fn transaction_to_sheet(record: &TransactionRecord) -> Result<SheetRow, LedgerStoreError> {
    to_sheet(&TransactionSheetRow {
        date: record.formatted_timestamp(),
        isbn: record.isbn.clone(),
        title: record.title.clone(),
        change: record.change,
        kind: record.kind,
    })
}

pub fn transaction_from_sheet(row: SheetRow) -> Result<TransactionRecord, LedgerStoreError> {
    let sheet: TransactionSheetRow = serde_json::from_value(JsonValue::Object(row))
        .map_err(|e| LedgerStoreError::Codec(format!("transaction row: {e}")))?;
    let timestamp = NaiveDateTime::parse_from_str(&sheet.date, TIMESTAMP_FORMAT)
        .map_err(|e| LedgerStoreError::Codec(format!("transaction date '{}': {e}", sheet.date)))?;
    Ok(TransactionRecord::new(
        timestamp,
        sheet.isbn,
        sheet.title,
        sheet.change,
        sheet.kind,
    ))
}
