use std::sync::Arc;

use visavis_client::{CallCommand, CallRole, CallState, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, SentSignal, next_signal, spawn_controller, wait_for_state};

#[tokio::test]
async fn test_start_call_emits_offer() {
    init_tracing();

    let mut rig = spawn_controller(Arc::new(SyntheticDevices));

    rig.commands.send(CallCommand::Start).await.unwrap();

    let signal = next_signal(&mut rig.signals).await.expect("offer expected");
    assert!(matches!(signal, SentSignal::Offer(_)));

    assert!(
        wait_for_state(
            &mut rig.state,
            CallState::Negotiating(CallRole::Caller),
            SIGNAL_TIMEOUT_MS
        )
        .await
    );

    // Local preview bound to the captured stream, exactly one offer out.
    assert!(rig.local_sink.is_bound().await);
    assert_eq!(rig.sink.offers().await.len(), 1);
    assert_eq!(rig.sink.answers().await.len(), 0);
}
