use async_trait::async_trait;
use stateflow_cloud::catalog::account;
use stateflow_cloud::{ActionType, ResourceAdapter, ResourceKind};
use stateflow_wait::{ProbeResult, SpecError, WaitSpec};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install a test-friendly subscriber once. Set RUST_LOG to see poll traces.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What the fake remote reports on one read
#[derive(Debug, Clone)]
pub enum Remote {
    State(&'static str),
    Failed(&'static str, &'static str),
    NotFound,
    Error(&'static str),
}

/// Object returned by the fake remote
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub call: u32,
    pub state: String,
    pub reason: Option<String>,
}

/// Catalog-backed adapter whose reads replay a script.
/// Once the script runs out the last step repeats.
#[derive(Clone)]
pub struct FakeAdapter {
    kind: ResourceKind,
    script: Arc<Mutex<VecDeque<Remote>>>,
    last: Arc<Mutex<Option<Remote>>>,
    calls: Arc<Mutex<u32>>,
    probed_ids: Arc<Mutex<Vec<String>>>,
}

impl FakeAdapter {
    pub fn new(kind: ResourceKind, script: impl IntoIterator<Item = Remote>) -> Self {
        Self {
            kind,
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(0)),
            probed_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    pub fn probed_ids(&self) -> Vec<String> {
        self.probed_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceAdapter for FakeAdapter {
    type Object = Observed;

    fn service(&self) -> &str {
        self.kind.service()
    }

    fn resource_type(&self) -> &str {
        self.kind.resource_type()
    }

    async fn probe(&self, id: &str) -> ProbeResult<Observed> {
        self.probed_ids.lock().unwrap().push(id.to_string());
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        let step = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = script.pop_front() {
                *last = Some(step.clone());
            }
            last.clone().expect("empty remote script")
        };

        match step {
            Remote::State(state) => ProbeResult::found(
                Observed {
                    call,
                    state: state.to_string(),
                    reason: None,
                },
                state,
            ),
            Remote::Failed(state, reason) => ProbeResult::found(
                Observed {
                    call,
                    state: state.to_string(),
                    reason: Some(reason.to_string()),
                },
                state,
            ),
            Remote::NotFound => ProbeResult::NotFound,
            Remote::Error(msg) => ProbeResult::error(anyhow::anyhow!(msg)),
        }
    }

    fn wait_spec(
        &self,
        action: ActionType,
        timeout: Duration,
    ) -> Option<Result<WaitSpec, SpecError>> {
        self.kind.wait_spec(action, timeout)
    }

    fn failure_reason(&self, object: &Observed) -> Option<String> {
        object.reason.clone()
    }

    fn is_retryable(&self, err: &anyhow::Error) -> bool {
        self.kind == ResourceKind::Account && account::is_finalizing_organization(err)
    }
}
