use std::sync::Arc;

use visavis_client::{CallCommand, CallState, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, SentSignal, next_signal, spawn_controller, wait_for_state};

#[tokio::test]
async fn test_remote_offer_produces_answer() {
    init_tracing();

    // A real offer from a caller-side controller.
    let mut caller = spawn_controller(Arc::new(SyntheticDevices));
    caller.commands.send(CallCommand::Start).await.unwrap();
    let Some(SentSignal::Offer(offer)) = next_signal(&mut caller.signals).await else {
        panic!("caller offer expected");
    };

    let mut callee = spawn_controller(Arc::new(SyntheticDevices));
    callee
        .commands
        .send(CallCommand::RemoteOffer(offer))
        .await
        .unwrap();

    let signal = next_signal(&mut callee.signals).await.expect("answer expected");
    assert!(matches!(signal, SentSignal::Answer(_)));

    assert!(wait_for_state(&mut callee.state, CallState::Connected, SIGNAL_TIMEOUT_MS).await);
    assert_eq!(callee.sink.answers().await.len(), 1);
    assert_eq!(callee.sink.offers().await.len(), 0);
}
