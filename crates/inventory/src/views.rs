//! Read-only views derived from the transaction log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bookstock_core::Isbn;

use crate::transaction::{TransactionKind, TransactionRecord};

/// Outbound volume for one `(isbn, title)` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSummary {
    pub isbn: Isbn,
    pub title: String,
    pub total_quantity: i64,
}

/// Group records of `kind` by `(isbn, title)` and report the negated sum of
/// their deltas, ascending by identifier then title.
///
/// A title change on an identifier produces a separate group per title.
/// Totals saturate at the `i64` bounds.
pub fn outbound_summary<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
    kind: TransactionKind,
) -> impl Iterator<Item = OutboundSummary> {
    let mut groups: BTreeMap<(Isbn, String), i64> = BTreeMap::new();
    for rec in records.into_iter().filter(|r| r.kind == kind) {
        let sum = groups.entry((rec.isbn.clone(), rec.title.clone())).or_insert(0);
        *sum = sum.saturating_add(rec.change);
    }

    groups.into_iter().map(|((isbn, title), sum)| OutboundSummary {
        isbn,
        title,
        total_quantity: sum.saturating_neg(),
    })
}

/// Summary of the secondary outbound channel.
pub fn secondary_outbound_summary<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
) -> impl Iterator<Item = OutboundSummary> {
    outbound_summary(records, TransactionKind::OutSecondary)
}

/// Records of one kind, newest first. Equal timestamps keep log order.
pub fn history<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
    kind: TransactionKind,
) -> Vec<&'a TransactionRecord> {
    let mut out: Vec<&TransactionRecord> = records.into_iter().filter(|r| r.kind == kind).collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}
