use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: stateflow.local.yaml, stateflow.yaml\n\
        - ~/.config/stateflow/stateflow.yaml\n\
        または STATEFLOW_CONFIG_PATH 環境変数で直接指定できます"
    )]
    SettingsFileNotFound,

    #[error("設定ファイルの解析に失敗しました ({}): {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("環境変数 {var} の値が不正です: {value:?}")]
    InvalidEnv { var: String, value: String },

    #[error("設定値 {field} が不正です: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
