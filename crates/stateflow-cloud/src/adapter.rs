//! Resource adapter trait and lifecycle helpers

use crate::action::{ActionType, Settled};
use crate::error::{CloudError, Result, WaitFailure, retry_cause};
use crate::timeouts::{ResourceTimeouts, Tuning};
use async_trait::async_trait;
use stateflow_wait::{
    CancellationToken, ProbeResult, RetryConfig, SpecError, WaitError, WaitSpec,
    await_state_with_cancel, retry_when,
};
use std::future::Future;
use std::time::Duration;

/// Remote resource type that can be probed for its lifecycle state
///
/// Implementations supply the status read and the per-action wait
/// specification; [`settle`] and [`submit`] take care of polling, retry and
/// error reporting.
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// Object returned by a successful probe
    type Object: Send;

    /// Service name used in diagnostics (e.g. "Organizations")
    fn service(&self) -> &str;

    /// Resource type name used in diagnostics (e.g. "Account")
    fn resource_type(&self) -> &str;

    /// Read the current state of the resource identified by `id`
    async fn probe(&self, id: &str) -> ProbeResult<Self::Object>;

    /// Wait specification for `action`, or `None` if the action completes
    /// synchronously.
    fn wait_spec(
        &self,
        action: ActionType,
        timeout: Duration,
    ) -> Option<std::result::Result<WaitSpec, SpecError>>;

    /// Human-readable reason carried by an object in a failure state
    fn failure_reason(&self, _object: &Self::Object) -> Option<String> {
        None
    }

    /// Whether a mutation error is transient and the call should be retried
    fn is_retryable(&self, _err: &anyhow::Error) -> bool {
        false
    }
}

fn waiting_error<A>(adapter: &A, action: ActionType, id: &str, source: WaitFailure) -> CloudError
where
    A: ResourceAdapter + ?Sized,
{
    CloudError::Waiting {
        service: adapter.service().to_string(),
        resource: adapter.resource_type().to_string(),
        id: id.to_string(),
        action,
        source,
    }
}

/// Wait for the resource `id` to settle after `action`.
///
/// A delete wait that ends because the resource can no longer be found
/// returns [`Settled::Gone`]. For other actions running out of not-found
/// budget is an error.
#[tracing::instrument(
    skip(adapter, timeouts, cancel),
    fields(service = adapter.service(), resource = adapter.resource_type())
)]
pub async fn settle<A>(
    adapter: &A,
    action: ActionType,
    id: &str,
    timeouts: &ResourceTimeouts,
    cancel: &CancellationToken,
) -> Result<Settled<A::Object>>
where
    A: ResourceAdapter + ?Sized,
{
    let timeout = timeouts.for_action(action);
    let spec = match adapter.wait_spec(action, timeout) {
        None => {
            tracing::debug!("no waiter for action, skipping");
            return Ok(Settled::Skipped);
        }
        Some(Err(e)) => return Err(waiting_error(adapter, action, id, e.into())),
        Some(Ok(spec)) => spec,
    };

    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "waiting for resource to settle"
    );

    match await_state_with_cancel(|| adapter.probe(id), &spec, cancel).await {
        Ok(object) => {
            tracing::info!("resource settled");
            Ok(Settled::Converged(object))
        }
        Err(WaitError::NotFoundExhausted { attempts }) if action == ActionType::Delete => {
            tracing::info!(attempts, "resource deleted");
            Ok(Settled::Gone)
        }
        Err(err) => {
            let failure = WaitFailure::from_wait(err, |object| adapter.failure_reason(object));
            tracing::debug!(error = %failure, "wait failed");
            Err(waiting_error(adapter, action, id, failure))
        }
    }
}

/// Run a mutation call, retrying the errors the adapter deems transient.
pub async fn submit<A, T, F, Fut>(
    adapter: &A,
    action: ActionType,
    id: &str,
    config: &RetryConfig,
    op: F,
) -> Result<T>
where
    A: ResourceAdapter + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    retry_when(config, op, |e| adapter.is_retryable(e))
        .await
        .map_err(|err| CloudError::Submit {
            service: adapter.service().to_string(),
            resource: adapter.resource_type().to_string(),
            id: id.to_string(),
            action,
            source: retry_cause(err),
        })
}

/// Submit a mutation and wait for the resource to settle.
///
/// `op` returns the identifier to wait on, which for creates is usually only
/// known once the call returns.
pub async fn apply<A, F, Fut>(
    adapter: &A,
    action: ActionType,
    id: &str,
    tuning: &Tuning,
    cancel: &CancellationToken,
    op: F,
) -> Result<(String, Settled<A::Object>)>
where
    A: ResourceAdapter + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    let settled_id = submit(adapter, action, id, &tuning.retry, op).await?;
    let settled = settle(adapter, action, &settled_id, &tuning.timeouts, cancel).await?;
    Ok((settled_id, settled))
}
