use serde::{Deserialize, Serialize};

/// Daily spend limit. A limit of zero or less disables budget checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetPolicy {
    pub daily_limit_usd: f64,
}

impl BudgetPolicy {
    pub fn new(daily_limit_usd: f64) -> Self {
        Self { daily_limit_usd }
    }

    pub fn is_enabled(&self) -> bool {
        self.daily_limit_usd > 0.0
    }

    /// True when today's spend has reached the limit.
    pub fn is_exhausted(&self, spent_usd: f64) -> bool {
        self.is_enabled() && spent_usd >= self.daily_limit_usd
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBand {
    Silent,
    Note,
    Warning,
    Exceeded,
}

impl BudgetBand {
    /// Bands are checked highest first; a boundary value belongs to the
    /// higher band.
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 100.0 {
            Self::Exceeded
        } else if pct >= 80.0 {
            Self::Warning
        } else if pct >= 50.0 {
            Self::Note
        } else {
            Self::Silent
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

/// Today's spend classified against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub spent_usd: f64,
    pub limit_usd: f64,
    pub pct: f64,
    pub band: BudgetBand,
}

impl BudgetStatus {
    pub fn evaluate(policy: &BudgetPolicy, spent_usd: f64) -> Option<Self> {
        if !policy.is_enabled() {
            return None;
        }
        let pct = spent_usd / policy.daily_limit_usd * 100.0;
        Some(Self {
            spent_usd,
            limit_usd: policy.daily_limit_usd,
            pct,
            band: BudgetBand::from_pct(pct),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(spent: f64, limit: f64) -> Option<BudgetBand> {
        BudgetStatus::evaluate(&BudgetPolicy::new(limit), spent).map(|status| status.band)
    }

    #[test]
    fn boundaries_belong_to_higher_band() {
        assert_eq!(band(0.80, 1.00), Some(BudgetBand::Warning));
        assert_eq!(band(1.00, 1.00), Some(BudgetBand::Exceeded));
        assert_eq!(band(0.50, 1.00), Some(BudgetBand::Note));
        assert_eq!(band(0.49, 1.00), Some(BudgetBand::Silent));
        assert_eq!(band(0.79, 1.00), Some(BudgetBand::Note));
        assert_eq!(band(1.20, 1.00), Some(BudgetBand::Exceeded));
    }

    #[test]
    fn disabled_policy_has_no_status() {
        assert_eq!(band(5.0, 0.0), None);
        assert_eq!(band(5.0, -1.0), None);
        assert!(!BudgetPolicy::new(0.0).is_exhausted(100.0));
    }

    #[test]
    fn exhausted_at_limit() {
        let policy = BudgetPolicy::new(0.25);
        assert!(!policy.is_exhausted(0.245));
        assert!(policy.is_exhausted(0.25));
    }
}
