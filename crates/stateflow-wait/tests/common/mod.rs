use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use stateflow_wait::ProbeResult;

/// テスト用のsubscriberを一度だけ設定（RUST_LOGでポーリングのログを表示）
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// スクリプト化したプローブの1ステップ
#[derive(Debug, Clone)]
pub enum Scripted {
    State(&'static str),
    NotFound,
    Error(&'static str),
}

/// 固定のプローブ結果列を再生し、呼び出し回数を数える
/// スクリプトを使い切った後は最後のステップを繰り返す
#[derive(Clone)]
pub struct ScriptedProbe {
    steps: Arc<Mutex<VecDeque<Scripted>>>,
    last: Arc<Mutex<Option<Scripted>>>,
    calls: Arc<Mutex<u32>>,
}

impl ScriptedProbe {
    pub fn new(steps: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    /// プローブ1回分。オブジェクトは1始まりの呼び出し番号
    pub async fn probe(&self) -> ProbeResult<u32> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        let step = {
            let mut steps = self.steps.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = steps.pop_front() {
                *last = Some(step.clone());
            }
            last.clone().expect("empty probe script")
        };

        match step {
            Scripted::State(state) => ProbeResult::found(call, state),
            Scripted::NotFound => ProbeResult::NotFound,
            Scripted::Error(msg) => ProbeResult::error(anyhow::anyhow!(msg)),
        }
    }
}
