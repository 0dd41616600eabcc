mod budget;
mod history;
mod records;
mod sync;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use xwatch_db::Db;

pub use budget::{BudgetGate, BudgetService};
pub use history::{FollowerDelta, HISTORY_CAP, HistoryService};
pub use records::{RecordsService, decode_payload};
pub use sync::{
    CostEstimate, Preview, RecordSource, SyncOutcome, SyncReport, SyncRequest, SyncService,
};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub budget: BudgetService,
    pub sync: SyncService,
    pub records: RecordsService,
    pub history: HistoryService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            budget: BudgetService::new(shared.clone()),
            sync: SyncService::new(shared.clone()),
            records: RecordsService::new(shared.clone()),
            history: HistoryService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}
