use std::sync::Arc;

use visavis_client::{CallCommand, CallState, ClientNotice, SyntheticDevices};
use visavis_core::SessionDescription;

use crate::init_tracing;
use crate::utils::{expect_no_signal, next_notice, spawn_controller};

#[tokio::test]
async fn test_answer_without_call_fails() {
    init_tracing();

    let mut rig = spawn_controller(Arc::new(SyntheticDevices));

    rig.commands
        .send(CallCommand::RemoteAnswer(SessionDescription::answer(
            "v=0".to_owned(),
        )))
        .await
        .unwrap();

    let notice = next_notice(&mut rig.notices).await.expect("notice expected");
    assert!(matches!(notice, ClientNotice::CallFailed(_)));

    // The error surfaces to the user; nothing is emitted and no recovery
    // is attempted.
    assert!(expect_no_signal(&mut rig.signals, 300).await);
    assert_eq!(*rig.state.borrow(), CallState::Idle);
}
