use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xwatch_core::{BudgetPolicy, RecordId, UnitPrices};

pub const DEFAULT_DAILY_BUDGET_USD: f64 = 0.25;

/// Template shown when no config file exists yet.
pub const CONFIG_TEMPLATE: &str = r#"daily_budget = 0.25

[account]
bearer_token = "<OAuth 2.0 user access token>"
user_id = "<numeric account id>"
handle = "<handle without @>"

[logging]
level = "warn"
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "no config found at {}\ncreate it with the following contents:\n\n{}",
        .path.display(),
        CONFIG_TEMPLATE
    )]
    Missing { path: PathBuf },
    #[error("read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XwatchConfig {
    #[serde(default = "default_daily_budget")]
    pub daily_budget: f64,
    pub account: AccountConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub bearer_token: String,
    pub user_id: RecordId,
    pub handle: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Overrides for the per-read prices; unset fields keep the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    pub post_read_usd: Option<f64>,
    pub user_read_usd: Option<f64>,
}

fn default_daily_budget() -> f64 {
    DEFAULT_DAILY_BUDGET_USD
}

impl XwatchConfig {
    pub fn budget_policy(&self) -> BudgetPolicy {
        BudgetPolicy::new(self.daily_budget)
    }

    pub fn unit_prices(&self) -> UnitPrices {
        let defaults = UnitPrices::default();
        UnitPrices {
            post_read_usd: self.pricing.post_read_usd.unwrap_or(defaults.post_read_usd),
            user_read_usd: self.pricing.user_read_usd.unwrap_or(defaults.user_read_usd),
        }
    }
}

pub fn load_config(path: &Path) -> Result<XwatchConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
