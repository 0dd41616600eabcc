use std::path::PathBuf;

use crate::{AppError, Result};

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "xwatch.sqlite";

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppPaths {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let data_dir = config_dir.join("data");
        let db_path = data_dir.join(DB_FILE_NAME);
        Self {
            config_dir,
            config_path,
            data_dir,
            db_path,
        }
    }
}

/// `$XWATCH_HOME` when set, otherwise `$HOME/.config/xwatch`.
pub fn resolve_config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("XWATCH_HOME").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let home = std::env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput("neither XWATCH_HOME nor HOME is set".to_string())
        })?;
    Ok(PathBuf::from(home).join(".config").join("xwatch"))
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.data_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_lives_under_config_dir() {
        let paths = AppPaths::new(PathBuf::from("/tmp/xw"));
        assert_eq!(paths.config_path, PathBuf::from("/tmp/xw/config.toml"));
        assert_eq!(paths.db_path, PathBuf::from("/tmp/xw/data/xwatch.sqlite"));
    }

    #[test]
    fn ensure_creates_data_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = AppPaths::new(dir.path().join("nested"));
        ensure_app_data_dir(&paths).expect("create");
        assert!(paths.data_dir.is_dir());
    }
}
