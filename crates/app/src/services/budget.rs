use tracing::debug;
use xwatch_core::{BudgetPolicy, BudgetStatus, ReadCounts, UnitPrices, UsageDay};
use xwatch_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::util::time::utc_today;

/// Result of the pre-fetch budget check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetGate {
    Proceed,
    /// Today's spend already reached the limit and the call was not forced.
    Denied(BudgetStatus),
}

impl BudgetGate {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

#[derive(Clone)]
pub struct BudgetService {
    config: SharedConfig,
}

impl BudgetService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn current_day_usage(&self) -> Result<Option<UsageDay>> {
        let db = self.db()?;
        Ok(db.usage_for_day(utc_today(), self.config.prices)?)
    }

    pub fn record_usage(&self, reads: &ReadCounts) -> Result<UsageDay> {
        let mut db = self.db()?;
        let usage = db.record_usage(utc_today(), reads, self.config.prices)?;
        debug!(
            day = %usage.date,
            calls = reads.total(),
            spent_usd = usage.estimated_cost(),
            "usage recorded"
        );
        Ok(usage)
    }

    pub fn may_proceed(&self, force: bool) -> Result<BudgetGate> {
        let db = self.db()?;
        gate(&db, &self.config.policy, self.config.prices, force)
    }

    /// Today's band, or `None` when checks are disabled or nothing was spent.
    pub fn status(&self) -> Result<Option<BudgetStatus>> {
        let db = self.db()?;
        status_for(&db, &self.config.policy, self.config.prices)
    }

    /// Most recent days first.
    pub fn history(&self, days: usize) -> Result<Vec<UsageDay>> {
        let db = self.db()?;
        Ok(db.list_usage_days(self.config.prices, days)?)
    }
}

pub(crate) fn gate(
    db: &Db,
    policy: &BudgetPolicy,
    prices: UnitPrices,
    force: bool,
) -> Result<BudgetGate> {
    if force || !policy.is_enabled() {
        return Ok(BudgetGate::Proceed);
    }
    let spent = db
        .usage_for_day(utc_today(), prices)?
        .map(|usage| usage.estimated_cost())
        .unwrap_or(0.0);
    if !policy.is_exhausted(spent) {
        return Ok(BudgetGate::Proceed);
    }
    match BudgetStatus::evaluate(policy, spent) {
        Some(status) => {
            debug!(spent_usd = spent, limit_usd = policy.daily_limit_usd, "budget gate denied");
            Ok(BudgetGate::Denied(status))
        }
        None => Ok(BudgetGate::Proceed),
    }
}

pub(crate) fn status_for(
    db: &Db,
    policy: &BudgetPolicy,
    prices: UnitPrices,
) -> Result<Option<BudgetStatus>> {
    if !policy.is_enabled() {
        return Ok(None);
    }
    let Some(usage) = db.usage_for_day(utc_today(), prices)? else {
        return Ok(None);
    };
    Ok(BudgetStatus::evaluate(policy, usage.estimated_cost()))
}
