//! 収束待機モジュール
//!
//! 観測した状態が target か failure に達するか、not-found の許容回数を
//! 使い切るか、期限を過ぎるまで状態プローブをポーリングする。

use crate::convergence::{Convergence, Step};
use crate::error::WaitError;
use crate::probe::ProbeResult;
use crate::spec::WaitSpec;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout_at};
use tokio_util::sync::CancellationToken;

// Instantに収まらないタイムアウトは「無期限」として扱う
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + timeout`（オーバーフロー時は遠い未来に丸める）
pub(crate) fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// リソースの収束を待機
///
/// # Arguments
/// * `probe` - 呼び出しごとにリモート状態を1回読み取る
/// * `spec` - 状態の分類とタイミング
///
/// # Returns
/// * `Ok(object)` - target 状態で最後に取得したオブジェクト
/// * `Err(WaitError)` - タイムアウト、not-found、失敗状態、プローブエラー
pub async fn await_state<T, F, Fut>(probe: F, spec: &WaitSpec) -> Result<T, WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
{
    await_state_with_cancel(probe, spec, &CancellationToken::new()).await
}

/// [`await_state`] のキャンセル対応版
///
/// プローブ中・スリープ中を問わず、`cancel` が発火した時点で
/// [`WaitError::Cancelled`] を返す。
pub async fn await_state_with_cancel<T, F, Fut>(
    mut probe: F,
    spec: &WaitSpec,
    cancel: &CancellationToken,
) -> Result<T, WaitError<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
{
    let started = Instant::now();
    let deadline = deadline_after(started, spec.timeout());
    let mut convergence = Convergence::new(spec);

    if !spec.delay().is_zero() {
        let wake = deadline.min(deadline_after(started, spec.delay()));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(convergence.cancel()),
            _ = tokio::time::sleep_until(wake) => {}
        }
    }

    loop {
        if Instant::now() >= deadline {
            let err = convergence.time_out(started.elapsed());
            tracing::debug!(probes = convergence.probes(), "wait timed out");
            return Err(err);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(convergence.cancel()),
            probed = timeout_at(deadline, probe()) => match probed {
                Ok(result) => result,
                Err(_) => {
                    tracing::debug!("probe still in flight at deadline");
                    return Err(convergence.time_out(started.elapsed()));
                }
            },
        };

        tracing::debug!(
            attempt = convergence.probes() + 1,
            state = result.state().unwrap_or("<none>"),
            not_found = result.is_not_found(),
            "probed resource status"
        );

        if let Step::Done(outcome) = convergence.observe(result) {
            return outcome;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        let nap = spec.poll_interval().min(remaining);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(convergence.cancel()),
            _ = sleep(nap) => {}
        }
    }
}
