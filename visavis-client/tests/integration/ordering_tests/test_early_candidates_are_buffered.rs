use std::sync::Arc;

use visavis_client::{CallCommand, SyntheticDevices};

use crate::init_tracing;
use crate::utils::{
    SentSignal, drain_notices, error_notices, expect_no_signal, next_signal, spawn_controller,
};

/// The relay does not guarantee negotiation order. Candidates delivered
/// before the offer must not fail; they wait and apply after the exchange.
#[tokio::test]
async fn test_early_candidates_are_buffered() {
    init_tracing();

    // A caller produces a real offer and real host candidates.
    let mut caller = spawn_controller(Arc::new(SyntheticDevices));
    caller.commands.send(CallCommand::Start).await.unwrap();

    let Some(SentSignal::Offer(offer)) = next_signal(&mut caller.signals).await else {
        panic!("caller offer expected");
    };
    let mut candidates = Vec::new();
    while candidates.len() < 2 {
        match next_signal(&mut caller.signals).await {
            Some(SentSignal::Ice(candidate)) => candidates.push(candidate),
            Some(_) => {}
            None => break,
        }
    }
    assert!(!candidates.is_empty(), "caller should trickle candidates");

    // Deliver the candidates first, out of negotiation order.
    let mut callee = spawn_controller(Arc::new(SyntheticDevices));
    for candidate in candidates {
        callee
            .commands
            .send(CallCommand::RemoteIce(candidate))
            .await
            .unwrap();
    }

    // Early candidates neither fail nor provoke any output.
    assert!(expect_no_signal(&mut callee.signals, 300).await);
    assert!(error_notices(&drain_notices(&mut callee.notices)).is_empty());

    // Once the offer lands, the buffered candidates apply cleanly.
    callee
        .commands
        .send(CallCommand::RemoteOffer(offer))
        .await
        .unwrap();

    let signal = next_signal(&mut callee.signals).await.expect("answer expected");
    assert!(matches!(signal, SentSignal::Answer(_)));
    assert!(error_notices(&drain_notices(&mut callee.notices)).is_empty());
}
