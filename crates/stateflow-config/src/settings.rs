//! 待機・タイムアウト・リトライ設定
//!
//! YAMLから読み込む。全フィールドにデフォルト値があるため、
//! 一部だけ書いたファイル（またはファイルなし）でも有効。
//!
//! ```yaml
//! wait:
//!   poll_interval_secs: 15
//! timeouts:
//!   delete_secs: 3600
//! ```

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const POLL_INTERVAL_ENV: &str = "STATEFLOW_POLL_INTERVAL_SECS";
pub const TIMEOUT_ENV: &str = "STATEFLOW_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub wait: WaitDefaults,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// 全ての待機に適用されるポーリングのデフォルト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitDefaults {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_not_found_budget")]
    pub not_found_budget: u32,
    #[serde(default = "default_stabilization")]
    pub stabilization: u32,
}

/// アクションごとの待機タイムアウト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    #[serde(default = "default_action_timeout")]
    pub create_secs: u64,
    #[serde(default = "default_action_timeout")]
    pub update_secs: u64,
    #[serde(default = "default_action_timeout")]
    pub delete_secs: u64,
}

/// 変更操作のリトライ設定（exponential backoff）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_retry_timeout")]
    pub timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    10
}
fn default_not_found_budget() -> u32 {
    20
}
fn default_stabilization() -> u32 {
    1
}
fn default_action_timeout() -> u64 {
    30 * 60
}
fn default_max_attempts() -> u32 {
    10
}
fn default_initial_delay() -> u64 {
    1000 // 1s
}
fn default_max_delay() -> u64 {
    30000 // 30s
}
fn default_multiplier() -> f64 {
    2.0
}
fn default_retry_timeout() -> u64 {
    4 * 60
}

impl Default for WaitDefaults {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            not_found_budget: default_not_found_budget(),
            stabilization: default_stabilization(),
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            create_secs: default_action_timeout(),
            update_secs: default_action_timeout(),
            delete_secs: default_action_timeout(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            timeout_secs: default_retry_timeout(),
        }
    }
}

impl WaitDefaults {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl TimeoutSettings {
    pub fn create(&self) -> Duration {
        Duration::from_secs(self.create_secs)
    }

    pub fn update(&self) -> Duration {
        Duration::from_secs(self.update_secs)
    }

    pub fn delete(&self) -> Duration {
        Duration::from_secs(self.delete_secs)
    }
}

impl RetrySettings {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// 設定ファイルを読み込む
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings: Self =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// 設定ファイルを探して読み込み、環境変数で上書きする
    ///
    /// ファイルが見つからなければデフォルト値を使う
    pub fn discover() -> Result<Self> {
        let mut settings = match crate::find_settings_file() {
            Ok(path) => Self::load(path)?,
            Err(ConfigError::SettingsFileNotFound) => {
                tracing::debug!("no settings file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ポーリングとリトライが扱えない値を拒否
    pub fn validate(&self) -> Result<()> {
        let multiplier = self.retry.multiplier;
        let checks = [
            (
                self.wait.poll_interval_secs > 0,
                "wait.poll_interval_secs",
                "1以上である必要があります",
            ),
            (
                self.wait.stabilization > 0,
                "wait.stabilization",
                "1以上である必要があります",
            ),
            (
                self.retry.max_attempts > 0,
                "retry.max_attempts",
                "1以上である必要があります",
            ),
            (
                multiplier.is_finite() && multiplier >= 1.0,
                "retry.multiplier",
                "1.0以上の有限値である必要があります",
            ),
        ];

        for (ok, field, reason) in checks {
            if !ok {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
        Ok(())
    }

    /// 環境変数による上書き
    ///
    /// - `STATEFLOW_POLL_INTERVAL_SECS`: ポーリング間隔
    /// - `STATEFLOW_TIMEOUT_SECS`: 作成・更新・削除の全タイムアウト
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(secs) = env_secs(POLL_INTERVAL_ENV)? {
            self.wait.poll_interval_secs = secs;
        }
        if let Some(secs) = env_secs(TIMEOUT_ENV)? {
            self.timeouts.create_secs = secs;
            self.timeouts.update_secs = secs;
            self.timeouts.delete_secs = secs;
        }
        Ok(())
    }
}

fn env_secs(var: &str) -> Result<Option<u64>> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
