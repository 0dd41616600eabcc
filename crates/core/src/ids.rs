use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform identifier for a record: a non-negative decimal token.
///
/// Ids arrive as strings and can exceed `u64`, so they are kept in their
/// normalized decimal form (no leading zeros) and ordered numerically by
/// comparing length first, then digits. `"9" < "10"` holds, unlike a plain
/// string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record id {0:?}: expected decimal digits")]
pub struct InvalidRecordId(pub String);

impl RecordId {
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidRecordId(value.to_string()));
        }
        let normalized = trimmed.trim_start_matches('0');
        if normalized.is_empty() {
            return Ok(Self("0".to_string()));
        }
        Ok(Self(normalized.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Largest id in `ids`, or `None` when empty.
    pub fn max_of<'a>(ids: impl IntoIterator<Item = &'a RecordId>) -> Option<&'a RecordId> {
        ids.into_iter().max()
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> RecordId {
        RecordId::parse(value).expect("valid id")
    }

    #[test]
    fn orders_numerically_not_lexicographically() {
        assert!(id("9") < id("10"));
        assert!(id("100") > id("99"));
        assert!(id("1845000000000000001") > id("1845000000000000000"));
    }

    #[test]
    fn normalizes_leading_zeros() {
        assert_eq!(id("007"), id("7"));
        assert_eq!(id("000").as_str(), "0");
    }

    #[test]
    fn rejects_non_digits() {
        assert!(RecordId::parse("").is_err());
        assert!(RecordId::parse("12a").is_err());
        assert!(RecordId::parse("-5").is_err());
    }

    #[test]
    fn max_of_picks_numeric_max() {
        let ids = vec![id("5"), id("3"), id("9"), id("10")];
        assert_eq!(RecordId::max_of(&ids), Some(&id("10")));
        assert_eq!(RecordId::max_of(&Vec::<RecordId>::new()), None);
    }

    #[test]
    fn serde_round_trips_as_string() {
        let value: RecordId = serde_json::from_str("\"42\"").expect("deserialize");
        assert_eq!(value, id("42"));
        assert_eq!(serde_json::to_string(&value).expect("serialize"), "\"42\"");
        assert!(serde_json::from_str::<RecordId>("\"x\"").is_err());
    }
}
