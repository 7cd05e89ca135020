use std::sync::Arc;

use visavis_client::{CallCommand, CallState, ClientNotice, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, SentSignal, next_signal, spawn_controller, wait_for_state};

#[tokio::test]
async fn test_hang_up_releases_call() {
    init_tracing();

    let mut rig = spawn_controller(Arc::new(SyntheticDevices));

    rig.commands.send(CallCommand::Start).await.unwrap();
    let signal = next_signal(&mut rig.signals).await.expect("offer expected");
    assert!(matches!(signal, SentSignal::Offer(_)));
    assert!(rig.local_sink.is_bound().await);

    rig.commands.send(CallCommand::HangUp).await.unwrap();
    assert!(wait_for_state(&mut rig.state, CallState::Closed, SIGNAL_TIMEOUT_MS).await);

    // Everything the call held is released.
    assert!(!rig.local_sink.is_bound().await);
    assert!(!rig.remote_sink.is_bound().await);

    let ended = loop {
        match crate::utils::next_notice(&mut rig.notices).await {
            Some(ClientNotice::CallEnded) => break true,
            Some(_) => {}
            None => break false,
        }
    };
    assert!(ended, "expected CallEnded");

    // A fresh call is allowed after teardown.
    rig.commands.send(CallCommand::Start).await.unwrap();
    let restarted = loop {
        match next_signal(&mut rig.signals).await {
            Some(SentSignal::Offer(_)) => break true,
            Some(_) => {}
            None => break false,
        }
    };
    assert!(restarted, "expected a second offer");
    assert_eq!(rig.sink.offers().await.len(), 2);
}
