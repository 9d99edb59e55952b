//! End-to-end wait scenarios against scripted probes

mod common;

use common::{Scripted, ScriptedProbe, init_tracing};
use stateflow_wait::{WaitError, WaitSpec, await_state};
use std::time::Duration;
use tokio::time::Instant;

use Scripted::{Error, NotFound, State};

#[tokio::test(start_paused = true)]
async fn test_stabilization_requires_consecutive_targets() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Pending"])
        .target(["Normal"])
        .stabilization(2)
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("Pending"), State("Normal"), State("Normal")]);

    let result = await_state(|| probe.probe(), &spec).await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(probe.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failure_state_stops_polling() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Pending"])
        .target(["Succeeded"])
        .failure(["Failed"])
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("Pending"), State("Failed")]);

    let result = await_state(|| probe.probe(), &spec).await;

    match result {
        Err(WaitError::TerminalFailure { state, object }) => {
            assert_eq!(state, "Failed");
            assert_eq!(object, 2);
        }
        other => panic!("expected terminal failure, got {:?}", other),
    }
    assert_eq!(probe.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_budget_exhausted() {
    init_tracing();
    let spec = WaitSpec::builder()
        .target(["Normal"])
        .not_found_budget(1)
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([NotFound, NotFound]);

    let result = await_state(|| probe.probe(), &spec).await;

    assert!(matches!(
        result,
        Err(WaitError::NotFoundExhausted { attempts: 2 })
    ));
    assert_eq!(probe.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_success_ends_before_later_not_founds() {
    init_tracing();
    let spec = WaitSpec::builder()
        .target(["Normal"])
        .not_found_budget(1)
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([NotFound, State("Normal"), NotFound, NotFound]);

    let result = await_state(|| probe.probe(), &spec).await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(probe.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_never_polls_past_deadline() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Pending"])
        .target(["Normal"])
        .timeout(Duration::from_secs(30))
        .poll_interval(Duration::from_secs(10))
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("Pending")]);
    let started = Instant::now();

    let result = await_state(|| probe.probe(), &spec).await;

    match result {
        Err(WaitError::Timeout {
            elapsed,
            probes,
            last_state,
        }) => {
            assert_eq!(elapsed, Duration::from_secs(30));
            assert_eq!(probes, 3);
            assert_eq!(last_state.as_deref(), Some("Pending"));
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert_eq!(probe.calls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_last_sleep_is_clamped_to_deadline() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Pending"])
        .target(["Normal"])
        .timeout(Duration::from_secs(25))
        .poll_interval(Duration::from_secs(10))
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("Pending")]);
    let started = Instant::now();

    let result = await_state(|| probe.probe(), &spec).await;

    assert!(result.unwrap_err().is_timeout());
    // 0s, 10s, 20s でプローブ。最後の待機は 10s ではなく 5s
    assert_eq!(probe.calls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(25));
}

#[tokio::test(start_paused = true)]
async fn test_probe_error_is_not_retried() {
    init_tracing();
    let spec = WaitSpec::builder().target(["Normal"]).build().unwrap();
    let probe = ScriptedProbe::new([Error("ExpiredToken"), State("Normal")]);

    let result = await_state(|| probe.probe(), &spec).await;

    match result {
        Err(WaitError::Probe(cause)) => assert_eq!(cause.to_string(), "ExpiredToken"),
        other => panic!("expected probe error, got {:?}", other),
    }
    assert_eq!(probe.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_states_are_tolerated() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["UPDATING"])
        .target(["STOPPED"])
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("UPDATING"), State("STARTING"), State("STOPPED")]);

    let result = await_state(|| probe.probe(), &spec).await;

    assert_eq!(result.unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_delete_wait_ends_on_absence() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Deleting", "Normal"])
        .not_found_budget(0)
        .build()
        .unwrap();
    let probe = ScriptedProbe::new([State("Normal"), State("Deleting"), NotFound]);

    let result = await_state(|| probe.probe(), &spec).await;

    let err = result.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(probe.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waits_are_independent() {
    init_tracing();
    let spec = WaitSpec::builder()
        .pending(["Pending"])
        .target(["Normal"])
        .build()
        .unwrap();
    let fast = ScriptedProbe::new([State("Normal")]);
    let slow = ScriptedProbe::new([State("Pending"), State("Pending"), State("Normal")]);

    let (a, b) = tokio::join!(
        await_state(|| fast.probe(), &spec),
        await_state(|| slow.probe(), &spec),
    );

    assert_eq!(a.unwrap(), 1);
    assert_eq!(b.unwrap(), 3);
    assert_eq!(fast.calls(), 1);
    assert_eq!(slow.calls(), 3);
}
