//! 収束判定ステートマシン
//!
//! 待機の判定ロジックのみを持つ。[`ProbeResult`] を1つずつ渡すと、
//! ポーリングを続けるか終了するかを返す。時間・スリープ・キャンセルは
//! [`crate::waiter`] 側で扱う。

use crate::error::WaitError;
use crate::probe::ProbeResult;
use crate::spec::{StateClass, WaitSpec};

/// 収束待機のフェーズ（`Polling` 以外は終端）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Polling,
    Succeeded,
    TimedOut,
    NotFoundExhausted,
    TerminalFailed,
    ProbeErrored,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Polling)
    }
}

/// プローブ結果1件を観測した後の判定
#[derive(Debug)]
pub enum Step<T> {
    /// ポーリング間隔の後に継続
    Continue,
    /// この結果で終了
    Done(Result<T, WaitError<T>>),
}

/// 1回の待機のカウンタとフェーズ
#[derive(Debug)]
pub struct Convergence<'a> {
    spec: &'a WaitSpec,
    phase: Phase,
    stable_count: u32,
    not_found_count: u32,
    probes: u32,
    last_state: Option<String>,
}

impl<'a> Convergence<'a> {
    pub fn new(spec: &'a WaitSpec) -> Self {
        Self {
            spec,
            phase: Phase::Polling,
            stable_count: 0,
            not_found_count: 0,
            probes: 0,
            last_state: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn probes(&self) -> u32 {
        self.probes
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn not_found_count(&self) -> u32 {
        self.not_found_count
    }

    /// 直近に観測した状態ラベル
    pub fn last_state(&self) -> Option<&str> {
        self.last_state.as_deref()
    }

    /// プローブ結果を1件適用
    pub fn observe<T>(&mut self, result: ProbeResult<T>) -> Step<T> {
        debug_assert_eq!(self.phase, Phase::Polling, "observe after terminal phase");
        self.probes += 1;

        match result {
            ProbeResult::NotFound => {
                self.not_found_count += 1;
                self.stable_count = 0;
                if self.not_found_count > self.spec.not_found_budget() {
                    self.phase = Phase::NotFoundExhausted;
                    return Step::Done(Err(WaitError::NotFoundExhausted {
                        attempts: self.not_found_count,
                    }));
                }
                tracing::debug!(
                    count = self.not_found_count,
                    budget = self.spec.not_found_budget(),
                    "resource not found, tolerating"
                );
                Step::Continue
            }
            ProbeResult::Error(cause) => {
                self.phase = Phase::ProbeErrored;
                Step::Done(Err(WaitError::Probe(cause)))
            }
            ProbeResult::Found { object, state } => {
                self.not_found_count = 0;
                let class = self.spec.classify(&state);
                self.last_state = Some(state);

                match class {
                    StateClass::Failure => {
                        self.phase = Phase::TerminalFailed;
                        let state = self.last_state.clone().unwrap_or_default();
                        Step::Done(Err(WaitError::TerminalFailure { state, object }))
                    }
                    StateClass::Target => {
                        self.stable_count += 1;
                        if self.stable_count >= self.spec.stabilization() {
                            self.phase = Phase::Succeeded;
                            Step::Done(Ok(object))
                        } else {
                            Step::Continue
                        }
                    }
                    StateClass::Pending => {
                        self.stable_count = 0;
                        Step::Continue
                    }
                    StateClass::Unexpected => {
                        tracing::warn!(
                            state = self.last_state.as_deref().unwrap_or_default(),
                            "unexpected state, continuing to poll"
                        );
                        self.stable_count = 0;
                        Step::Continue
                    }
                }
            }
        }
    }

    /// 終端状態を観測しないまま期限に到達
    pub fn time_out<T>(&mut self, elapsed: std::time::Duration) -> WaitError<T> {
        self.phase = Phase::TimedOut;
        WaitError::Timeout {
            elapsed,
            probes: self.probes,
            last_state: self.last_state.clone(),
        }
    }

    pub fn cancel<T>(&mut self) -> WaitError<T> {
        self.phase = Phase::Cancelled;
        WaitError::Cancelled
    }
}
