use crate::call::{CallCommand, CallController, CallState, ClientNotice};
use crate::media::{MediaDevices, MediaSink};
use crate::signaling::{RelayClient, RelayError, RelayEvent, SignalingConfig};
use crate::transport::TransportConfig;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;
use visavis_core::RoomId;

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub signaling: SignalingConfig,
    pub transport: TransportConfig,
}

/// One call surface: the relay connection, the call controller, and the two
/// media sinks, wired together for the life of the client. Dropping (or
/// `close`-ing) the client releases the subscriptions and the call.
pub struct CallClient {
    relay: Arc<RelayClient>,
    commands: mpsc::Sender<CallCommand>,
    notice_tx: mpsc::UnboundedSender<ClientNotice>,
    state_rx: watch::Receiver<CallState>,
    local_sink: Arc<MediaSink>,
    remote_sink: Arc<MediaSink>,
    controller_task: JoinHandle<()>,
    router_task: JoinHandle<()>,
}

impl CallClient {
    pub async fn connect(
        config: ClientConfig,
        devices: Arc<dyn MediaDevices>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClientNotice>), RelayError> {
        let (relay, relay_rx) = RelayClient::connect(&config.signaling).await?;
        let relay = Arc::new(relay);

        let local_sink = Arc::new(MediaSink::local());
        let remote_sink = Arc::new(MediaSink::remote());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(16);

        let (controller, state_rx) = CallController::new(
            command_rx,
            relay.clone() as Arc<dyn crate::signaling::SignalSink>,
            devices,
            local_sink.clone(),
            remote_sink.clone(),
            notice_tx.clone(),
            config.transport,
        );

        let controller_task = tokio::spawn(controller.run());
        let router_task = tokio::spawn(route_relay_events(
            relay_rx,
            command_tx.clone(),
            notice_tx.clone(),
        ));

        let client = Self {
            relay,
            commands: command_tx,
            notice_tx,
            state_rx,
            local_sink,
            remote_sink,
            controller_task,
            router_task,
        };
        Ok((client, notice_rx))
    }

    pub fn join_room(&self, room: &RoomId) -> Result<(), RelayError> {
        self.relay.join(room)?;
        let _ = self.notice_tx.send(ClientNotice::JoinedRoom(room.clone()));
        Ok(())
    }

    /// Leaving also ends any call in progress; the relay itself performs no
    /// cleanup on leave.
    pub async fn leave_room(&self, room: &RoomId) -> Result<(), RelayError> {
        self.relay.leave(room)?;
        let _ = self.notice_tx.send(ClientNotice::LeftRoom(room.clone()));
        self.hang_up().await;
        Ok(())
    }

    pub async fn start_call(&self) {
        let _ = self.commands.send(CallCommand::Start).await;
    }

    pub async fn hang_up(&self) {
        let _ = self.commands.send(CallCommand::HangUp).await;
    }

    pub fn call_state(&self) -> CallState {
        *self.state_rx.borrow()
    }

    pub fn state_changes(&self) -> watch::Receiver<CallState> {
        self.state_rx.clone()
    }

    pub fn local_sink(&self) -> &Arc<MediaSink> {
        &self.local_sink
    }

    pub fn remote_sink(&self) -> &Arc<MediaSink> {
        &self.remote_sink
    }

    /// Unmount: end the call, release the subscriptions, stop the socket
    /// tasks. Complete when this returns.
    pub async fn close(self) {
        let Self {
            relay,
            commands,
            controller_task,
            router_task,
            ..
        } = self;

        // The router holds a clone of the command sender; stop it first so
        // the controller sees its queue close and runs the final teardown.
        router_task.abort();
        let _ = router_task.await;

        drop(commands);
        drop(relay);
        let _ = controller_task.await;
    }
}

/// Inbound dispatch: relay traffic becomes serialized call commands;
/// presence and lifecycle events become notices.
async fn route_relay_events(
    mut relay_rx: mpsc::Receiver<RelayEvent>,
    commands: mpsc::Sender<CallCommand>,
    notices: mpsc::UnboundedSender<ClientNotice>,
) {
    while let Some(event) = relay_rx.recv().await {
        match event {
            RelayEvent::Connected => {
                let _ = notices.send(ClientNotice::ConnectedToServer);
            }
            RelayEvent::Disconnected => {
                let _ = notices.send(ClientNotice::DisconnectedFromServer);
            }
            RelayEvent::ClientJoined(id) => {
                let _ = notices.send(ClientNotice::ClientJoined(id));
            }
            RelayEvent::ClientLeft(id) => {
                let _ = notices.send(ClientNotice::ClientLeft(id));
            }
            RelayEvent::Offer(description) => {
                if commands
                    .send(CallCommand::RemoteOffer(description))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            RelayEvent::Answer(description) => {
                if commands
                    .send(CallCommand::RemoteAnswer(description))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            RelayEvent::IceCandidate(candidate) => {
                if commands
                    .send(CallCommand::RemoteIce(candidate))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }
    }
    debug!("Relay event router stopped");
}
