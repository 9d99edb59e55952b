//! 変更操作のリトライ（Exponential Backoff）
//!
//! 変更操作の送信は、リモート側が一時的と定めているエラーで失敗することがある
//! （Organizationの初期化中、リソースの伝播中など）。[`retry_when`] は
//! 呼び出し側の判定でリトライ可能な間、再送信する。

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use crate::waiter::deadline_after;
use tokio::time::{Instant, sleep};

/// リモート変更操作のリトライ設定
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// 最大試行回数（初回を含む）
    pub max_attempts: u32,

    /// 初回の待機時間
    pub initial_delay: Duration,

    /// 待機時間の上限
    pub max_delay: Duration,

    /// バックオフ倍率
    pub backoff_multiplier: f64,

    /// 全試行を通した制限時間
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            timeout: Duration::from_secs(4 * 60),
        }
    }
}

impl RetryConfig {
    /// 試行 `attempt`（0始まり）の後の待機時間
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        // NaN・無限大・負の値は上限に丸める
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay)
    }
}

/// リトライの失敗
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// リトライ不可のエラー（即座に返す）
    #[error("{0}")]
    Failed(E),

    /// 上限に達してもリトライ可能なエラーが続いた
    #[error("{attempts} 回試行しましたが失敗しました: {last}")]
    Exhausted { attempts: u32, last: E },

    /// リソースが最後まで見つからなかった
    #[error("{attempts} 回試行しましたがリソースが見つかりません")]
    NotFound { attempts: u32 },
}

impl<E> RetryError<E> {
    /// 最後に発生したエラー（あれば）
    pub fn into_inner(self) -> Option<E> {
        match self {
            RetryError::Failed(e) | RetryError::Exhausted { last: e, .. } => Some(e),
            RetryError::NotFound { .. } => None,
        }
    }
}

/// `op` を成功するまで実行
///
/// リトライ不可のエラー、または `config` の上限到達で終了する。
pub async fn retry_when<T, E, F, Fut, P>(
    config: &RetryConfig,
    mut op: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let deadline = deadline_after(Instant::now(), config.timeout);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !is_retryable(&err) {
            return Err(RetryError::Failed(err));
        }

        let delay = config.delay_for_attempt(attempt - 1);
        if attempt >= config.max_attempts || deadline_after(Instant::now(), delay) > deadline {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        tracing::warn!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "retryable error, retrying"
        );
        sleep(delay).await;
    }
}

/// リソースが見えるまで検索をリトライ
///
/// 作成直後の読み取り遅延を吸収する。`Ok(None)` は同じ上限でリトライし、
/// `Err` は即座に返す。
pub async fn retry_when_not_found<T, E, F, Fut>(
    config: &RetryConfig,
    mut lookup: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let deadline = deadline_after(Instant::now(), config.timeout);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match lookup().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => return Err(RetryError::Failed(e)),
        }

        let delay = config.delay_for_attempt(attempt - 1);
        if attempt >= config.max_attempts || deadline_after(Instant::now(), delay) > deadline {
            return Err(RetryError::NotFound { attempts: attempt });
        }

        tracing::debug!(attempt, "resource not yet visible, retrying");
        sleep(delay).await;
    }
}
