use thiserror::Error;
use xwatch_core::FetchError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] xwatch_db::DbError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    InvalidInput(String),
}

impl AppError {
    /// Stable label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            AppError::Db(_) => "storage",
            AppError::Io(_) => "storage",
            AppError::Config(ConfigError::Missing { .. }) => "config_missing",
            AppError::Config(_) => "config",
            AppError::Fetch(FetchError::Unavailable(_)) => "remote_unavailable",
            AppError::Fetch(FetchError::PaymentRequired(_)) => "remote_payment_required",
            AppError::Fetch(FetchError::Other(_)) => "remote_other",
            AppError::InvalidInput(_) => "invalid_input",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
