//! 待機・待機仕様のエラー型

use std::time::Duration;
use thiserror::Error;

/// 収束待機の失敗
///
/// `T` はプローブで取得したオブジェクトの型。失敗状態ではオブジェクトも
/// 返すため、呼び出し側がリモートの失敗理由を報告できる。
#[derive(Error, Debug)]
pub enum WaitError<T> {
    #[error(
        "タイムアウトしました: {elapsed:?} 経過 (プローブ {probes} 回, 最終状態: {})",
        last_state.as_deref().unwrap_or("なし")
    )]
    Timeout {
        elapsed: Duration,
        probes: u32,
        last_state: Option<String>,
    },

    #[error("リソースが見つかりません (連続 {attempts} 回)")]
    NotFoundExhausted { attempts: u32 },

    #[error("リソースが失敗状態になりました: {state:?}")]
    TerminalFailure { state: String, object: T },

    #[error("状態の取得に失敗しました: {0}")]
    Probe(#[source] anyhow::Error),

    #[error("待機がキャンセルされました")]
    Cancelled,
}

impl<T> WaitError<T> {
    /// `NotFoundExhausted` なら true（削除待機では成功扱い）
    pub fn is_not_found(&self) -> bool {
        matches!(self, WaitError::NotFoundExhausted { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }

    /// 失敗状態で観測されたオブジェクト
    pub fn into_failed_object(self) -> Option<T> {
        match self {
            WaitError::TerminalFailure { object, .. } => Some(object),
            _ => None,
        }
    }
}

/// 不正な待機仕様
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("状態 {0:?} が pending と target の両方に含まれています")]
    PendingTargetOverlap(String),

    #[error("状態 {0:?} が failure と pending/target の両方に含まれています")]
    FailureOverlap(String),

    #[error("stabilization は1以上である必要があります")]
    ZeroStabilization,

    #[error("ポーリング間隔は0より大きい必要があります")]
    ZeroPollInterval,
}

pub type Result<T> = std::result::Result<T, SpecError>;
