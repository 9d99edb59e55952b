//! 待機仕様
//!
//! [`WaitSpec`] は状態ラベルを pending・target・failure に分類し、
//! 1回のポーリングのタイミング設定を持つ。作成・更新・削除の呼び出し箇所ごとに、
//! それぞれのタイムアウトで組み立てる。

use crate::error::{Result, SpecError};
use std::collections::BTreeSet;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const DEFAULT_NOT_FOUND_BUDGET: u32 = 20;

/// 1回の収束待機の設定（不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSpec {
    pending: BTreeSet<String>,
    target: BTreeSet<String>,
    failure: BTreeSet<String>,
    poll_interval: Duration,
    timeout: Duration,
    delay: Duration,
    not_found_budget: u32,
    stabilization: u32,
}

impl WaitSpec {
    pub fn builder() -> WaitSpecBuilder {
        WaitSpecBuilder::default()
    }

    pub fn pending(&self) -> &BTreeSet<String> {
        &self.pending
    }

    pub fn target(&self) -> &BTreeSet<String> {
        &self.target
    }

    pub fn failure(&self) -> &BTreeSet<String> {
        &self.failure
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 初回プローブ前の待機
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 失敗とするまでに許容する連続 not-found 回数
    pub fn not_found_budget(&self) -> u32 {
        self.not_found_budget
    }

    /// 成功に必要な連続 target 観測回数
    pub fn stabilization(&self) -> u32 {
        self.stabilization
    }

    /// 観測した状態ラベルを分類
    pub fn classify(&self, state: &str) -> StateClass {
        if self.failure.contains(state) {
            StateClass::Failure
        } else if self.target.contains(state) {
            StateClass::Target
        } else if self.pending.contains(state) {
            StateClass::Pending
        } else {
            StateClass::Unexpected
        }
    }

    /// タイムアウトだけを差し替えた仕様
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`WaitSpec`] に対する状態ラベルの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateClass {
    Pending,
    Target,
    Failure,
    Unexpected,
}

/// [`WaitSpec`] のビルダー
#[derive(Debug, Clone)]
pub struct WaitSpecBuilder {
    pending: BTreeSet<String>,
    target: BTreeSet<String>,
    failure: BTreeSet<String>,
    poll_interval: Duration,
    timeout: Duration,
    delay: Duration,
    not_found_budget: u32,
    stabilization: u32,
}

impl Default for WaitSpecBuilder {
    fn default() -> Self {
        Self {
            pending: BTreeSet::new(),
            target: BTreeSet::new(),
            failure: BTreeSet::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            delay: Duration::ZERO,
            not_found_budget: DEFAULT_NOT_FOUND_BUDGET,
            stabilization: 1,
        }
    }
}

impl WaitSpecBuilder {
    pub fn pending<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn target<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn failure<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failure.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn not_found_budget(mut self, budget: u32) -> Self {
        self.not_found_budget = budget;
        self
    }

    pub fn stabilization(mut self, count: u32) -> Self {
        self.stabilization = count;
        self
    }

    /// 検証して仕様を作成
    pub fn build(self) -> Result<WaitSpec> {
        if let Some(state) = self.pending.intersection(&self.target).next() {
            return Err(SpecError::PendingTargetOverlap(state.clone()));
        }
        if let Some(state) = self
            .failure
            .iter()
            .find(|s| self.pending.contains(*s) || self.target.contains(*s))
        {
            return Err(SpecError::FailureOverlap(state.clone()));
        }
        if self.stabilization == 0 {
            return Err(SpecError::ZeroStabilization);
        }
        if self.poll_interval.is_zero() {
            return Err(SpecError::ZeroPollInterval);
        }

        Ok(WaitSpec {
            pending: self.pending,
            target: self.target,
            failure: self.failure,
            poll_interval: self.poll_interval,
            timeout: self.timeout,
            delay: self.delay,
            not_found_budget: self.not_found_budget,
            stabilization: self.stabilization,
        })
    }
}
