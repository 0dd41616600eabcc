use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Billable read categories of the metered API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadKind {
    PostRead,
    UserRead,
}

impl ReadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostRead => "post_read",
            Self::UserRead => "user_read",
        }
    }

    pub fn label(&self, count: u64) -> &'static str {
        match (self, count) {
            (Self::PostRead, 1) => "post read",
            (Self::PostRead, _) => "post reads",
            (Self::UserRead, 1) => "user read",
            (Self::UserRead, _) => "user reads",
        }
    }
}

impl fmt::Display for ReadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown read kind {0:?}")]
pub struct UnknownReadKind(pub String);

impl FromStr for ReadKind {
    type Err = UnknownReadKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "post_read" => Ok(Self::PostRead),
            "user_read" => Ok(Self::UserRead),
            other => Err(UnknownReadKind(other.to_string())),
        }
    }
}

/// Per-kind read counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadCounts(BTreeMap<ReadKind, u64>);

impl ReadCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(kind: ReadKind, count: u64) -> Self {
        let mut counts = Self::new();
        counts.add(kind, count);
        counts
    }

    pub fn add(&mut self, kind: ReadKind, count: u64) {
        if count == 0 {
            return;
        }
        let entry = self.0.entry(kind).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn merge(&mut self, other: &ReadCounts) {
        for (kind, count) in other.iter() {
            self.add(kind, count);
        }
    }

    pub fn get(&self, kind: ReadKind) -> u64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, count| acc.saturating_add(*count))
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReadKind, u64)> + '_ {
        self.0.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// Fixed per-read prices in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitPrices {
    pub post_read_usd: f64,
    pub user_read_usd: f64,
}

impl Default for UnitPrices {
    fn default() -> Self {
        Self {
            post_read_usd: 0.005,
            user_read_usd: 0.01,
        }
    }
}

impl UnitPrices {
    pub fn price(&self, kind: ReadKind) -> f64 {
        match kind {
            ReadKind::PostRead => self.post_read_usd,
            ReadKind::UserRead => self.user_read_usd,
        }
    }

    pub fn cost(&self, reads: &ReadCounts) -> f64 {
        reads
            .iter()
            .map(|(kind, count)| count as f64 * self.price(kind))
            .sum()
    }
}

/// One UTC day of metered consumption. The estimated cost is always derived
/// from the counters, never stored alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageDay {
    pub date: NaiveDate,
    pub reads: ReadCounts,
    prices: UnitPrices,
}

impl UsageDay {
    pub fn new(date: NaiveDate, reads: ReadCounts, prices: UnitPrices) -> Self {
        Self {
            date,
            reads,
            prices,
        }
    }

    pub fn estimated_cost(&self) -> f64 {
        self.prices.cost(&self.reads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_weights_reads_by_kind() {
        let mut reads = ReadCounts::new();
        reads.add(ReadKind::PostRead, 4);
        reads.add(ReadKind::UserRead, 2);
        let cost = UnitPrices::default().cost(&reads);
        assert!((cost - 0.04).abs() < 1e-12);
    }

    #[test]
    fn zero_counts_are_not_recorded() {
        let mut reads = ReadCounts::new();
        reads.add(ReadKind::UserRead, 0);
        assert!(reads.is_empty());
        assert_eq!(reads.iter().count(), 0);
    }

    #[test]
    fn merge_sums_counts() {
        let mut left = ReadCounts::single(ReadKind::PostRead, 1);
        let mut right = ReadCounts::single(ReadKind::PostRead, 2);
        right.add(ReadKind::UserRead, 1);
        left.merge(&right);
        assert_eq!(left.get(ReadKind::PostRead), 3);
        assert_eq!(left.get(ReadKind::UserRead), 1);
        assert_eq!(left.total(), 4);
    }

    #[test]
    fn read_kind_parses_storage_names() {
        for kind in [ReadKind::PostRead, ReadKind::UserRead] {
            assert_eq!(kind.as_str().parse::<ReadKind>(), Ok(kind));
        }
        assert!("tweet_read".parse::<ReadKind>().is_err());
    }
}
