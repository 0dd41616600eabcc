pub mod activity;
pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod startup;
pub mod util;

pub use activity::{ACTIVITY_PAGE_SIZE, ACTIVITY_WINDOW_HOURS, ActivitySummary, Nudge};
pub use app::{AppConfig, AppState};
pub use config::{CONFIG_TEMPLATE, ConfigError, XwatchConfig, load_config};
pub use error::{AppError, Result};
pub use services::{
    AppServices, BudgetGate, CostEstimate, FollowerDelta, HISTORY_CAP, Preview, RecordSource,
    SyncOutcome, SyncReport, SyncRequest, decode_payload,
};
pub use startup::{AppPaths, ensure_app_data_dir, resolve_config_dir};
pub use util::time::{utc_today, window_days, window_hours};
