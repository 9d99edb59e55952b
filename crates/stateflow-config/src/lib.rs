pub mod error;
pub mod settings;

pub use error::*;
pub use settings::*;

use std::path::PathBuf;

/// 設定ファイルを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STATEFLOW_CONFIG_PATH";

const SETTINGS_CANDIDATES: [&str; 2] = ["stateflow.local.yaml", "stateflow.yaml"];

/// stateflowの設定ディレクトリを取得（存在しなければ作成）
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("stateflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STATEFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: stateflow.local.yaml, stateflow.yaml
/// 3. ~/.config/stateflow/stateflow.yaml (グローバル設定)
pub fn find_settings_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(path = %path.display(), "{} points at a missing file", CONFIG_PATH_ENV);
    }

    let current_dir = std::env::current_dir()?;
    for filename in &SETTINGS_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("stateflow").join("stateflow.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::SettingsFileNotFound)
}
