use std::sync::Arc;

use visavis_client::{CallCommand, CallState, ClientNotice, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{SIGNAL_TIMEOUT_MS, SentSignal, next_signal, spawn_controller, wait_for_state};

/// An offer arriving mid-call must not replace the live connection.
#[tokio::test]
async fn test_second_offer_rejected() {
    init_tracing();

    let mut caller = spawn_controller(Arc::new(SyntheticDevices));
    caller.commands.send(CallCommand::Start).await.unwrap();
    let Some(SentSignal::Offer(offer)) = next_signal(&mut caller.signals).await else {
        panic!("caller offer expected");
    };

    let mut callee = spawn_controller(Arc::new(SyntheticDevices));
    callee
        .commands
        .send(CallCommand::RemoteOffer(offer.clone()))
        .await
        .unwrap();
    assert!(wait_for_state(&mut callee.state, CallState::Connected, SIGNAL_TIMEOUT_MS).await);

    callee
        .commands
        .send(CallCommand::RemoteOffer(offer))
        .await
        .unwrap();

    // The second offer is refused with a notice; the first call stands.
    let rejected = loop {
        match crate::utils::next_notice(&mut callee.notices).await {
            Some(ClientNotice::CallFailed(_)) => break true,
            Some(_) => {}
            None => break false,
        }
    };
    assert!(rejected, "expected a rejection notice");
    assert_eq!(callee.sink.answers().await.len(), 1);
    assert_eq!(*callee.state.borrow(), CallState::Connected);
}
