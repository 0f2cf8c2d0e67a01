use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use bookstock_core::Isbn;

/// Wall-clock format used for the `Date` column of the transaction log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Classification of a stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    /// Secondary outbound channel. Older logs tag it `OUT-PAJU`.
    #[serde(rename = "OUT-SECONDARY", alias = "OUT-PAJU")]
    OutSecondary,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "IN",
            TransactionKind::Out => "OUT",
            TransactionKind::OutSecondary => "OUT-SECONDARY",
        }
    }

    /// Sign applied to a requested quantity to obtain the logged delta.
    pub fn sign(&self) -> i64 {
        match self {
            TransactionKind::In => 1,
            TransactionKind::Out | TransactionKind::OutSecondary => -1,
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = bookstock_core::StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "IN" => Ok(TransactionKind::In),
            "OUT" => Ok(TransactionKind::Out),
            "OUT-SECONDARY" | "OUT-PAJU" => Ok(TransactionKind::OutSecondary),
            other => Err(bookstock_core::StockError::validation(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }
}

/// One immutable line of the transaction log.
///
/// `title` is a copy of the inventory title at the time of the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub isbn: Isbn,
    pub title: String,
    pub change: i64,
    pub kind: TransactionKind,
}

impl TransactionRecord {
    /// Timestamp truncated to whole seconds, matching the stored column.
    pub fn new(
        timestamp: NaiveDateTime,
        isbn: Isbn,
        title: impl Into<String>,
        change: i64,
        kind: TransactionKind,
    ) -> Self {
        use chrono::Timelike;
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            isbn,
            title: title.into(),
            change,
            kind,
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn kind_parses_legacy_secondary_tag() {
        assert_eq!("OUT-PAJU".parse::<TransactionKind>().unwrap(), TransactionKind::OutSecondary);
        assert_eq!("OUT-SECONDARY".parse::<TransactionKind>().unwrap(), TransactionKind::OutSecondary);
        assert!("SIDEWAYS".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn kind_sign_and_tag_agree() {
        for kind in [TransactionKind::In, TransactionKind::Out, TransactionKind::OutSecondary] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert_eq!(TransactionKind::In.sign(), 1);
        assert_eq!(TransactionKind::Out.sign(), -1);
        assert_eq!(TransactionKind::OutSecondary.sign(), -1);
    }

    #[test]
    fn record_timestamp_drops_subseconds() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(9, 30, 5, 750)
            .unwrap();
        let rec = TransactionRecord::new(ts, Isbn::parse("111").unwrap(), "T", -3, TransactionKind::Out);
        assert_eq!(rec.formatted_timestamp(), "2024-03-01 09:30:05");
        assert_eq!(rec.timestamp.and_utc().timestamp_subsec_nanos(), 0);
    }
}
