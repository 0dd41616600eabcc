use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::services::AppServices;
use xwatch_core::{BudgetPolicy, UnitPrices};
use xwatch_db::Db;

/// Storage location and metering settings for one run.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub policy: BudgetPolicy,
    pub prices: UnitPrices,
}

/// Application state shared by frontends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf, policy: BudgetPolicy, prices: UnitPrices) -> Self {
        let config = AppConfig {
            db_path,
            policy,
            prices,
        };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
