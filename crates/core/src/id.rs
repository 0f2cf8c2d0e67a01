//! Book identifier.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StockError;

/// Identifier of a stock item (an ISBN, but not checksum-validated).
///
/// Stored trimmed and never empty. Ledger stores may hand numeric-looking
/// identifiers back as numbers, so deserialization accepts either a string or
/// an integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, StockError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(StockError::validation("identifier cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Isbn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Isbn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let text = match raw {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "identifier must be a string or integer, got {other}"
                )));
            }
        };
        Isbn::parse(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let isbn = Isbn::parse("  9788937460449 ").unwrap();
        assert_eq!(isbn.as_str(), "9788937460449");
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(matches!(Isbn::parse("   "), Err(StockError::Validation(_))));
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let from_num: Isbn = serde_json::from_value(serde_json::json!(9788937460449u64)).unwrap();
        let from_str: Isbn = serde_json::from_value(serde_json::json!("9788937460449")).unwrap();
        assert_eq!(from_num, from_str);
    }

    #[test]
    fn deserialize_rejects_floats_and_blanks() {
        assert!(serde_json::from_value::<Isbn>(serde_json::json!(1.5)).is_err());
        assert!(serde_json::from_value::<Isbn>(serde_json::json!("")).is_err());
    }
}
