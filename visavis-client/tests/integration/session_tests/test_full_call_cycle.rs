use std::sync::Arc;

use visavis_client::{CallCommand, CallState, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{
    CONNECT_TIMEOUT_MS, SIGNAL_TIMEOUT_MS, bridge, drain_notices, error_notices, spawn_controller,
    wait_for_sink_bound, wait_for_state,
};

/// Two clients in the same room: A calls, B answers, candidates trickle both
/// ways, and A's media reaches B's remote sink. No errors on either side.
#[tokio::test]
async fn test_full_call_cycle() {
    init_tracing();

    let mut a = spawn_controller(Arc::new(SyntheticDevices));
    let mut b = spawn_controller(Arc::new(SyntheticDevices));

    // Cross-wire the two mock relays, as the signaling server would.
    bridge(a.signals, b.commands.clone());
    bridge(b.signals, a.commands.clone());

    a.commands.send(CallCommand::Start).await.unwrap();

    assert!(wait_for_state(&mut b.state, CallState::Connected, SIGNAL_TIMEOUT_MS).await);
    assert!(wait_for_state(&mut a.state, CallState::Connected, SIGNAL_TIMEOUT_MS).await);

    assert_eq!(a.sink.offers().await.len(), 1);
    assert_eq!(b.sink.answers().await.len(), 1);
    assert_eq!(b.sink.offers().await.len(), 0);

    // The transport comes up and the caller's stream lands in the callee's
    // remote sink.
    assert!(
        wait_for_sink_bound(&b.remote_sink, CONNECT_TIMEOUT_MS).await,
        "callee should receive the caller's media"
    );

    assert!(error_notices(&drain_notices(&mut a.notices)).is_empty());
    assert!(error_notices(&drain_notices(&mut b.notices)).is_empty());
}
