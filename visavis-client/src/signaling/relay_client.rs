use crate::signaling::{RelayEvent, SignalSink};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{error, info, warn};
use visavis_core::{IceCandidate, RoomId, SessionDescription, SignalMessage};

/// Where the relay lives. The default carries the fixed deployment endpoint;
/// construct one explicitly to point a client elsewhere.
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    pub endpoint: String,
    /// Capacity of the inbound event channel.
    pub event_buffer: usize,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://signal.visavis.dev/ws".to_owned(),
            event_buffer: 64,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    /// Local rejection: join/leave was attempted with an empty room id.
    /// Nothing is put on the wire.
    #[error("room id is required")]
    EmptyRoomId,
    #[error("failed to reach signaling relay: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("signaling relay connection is closed")]
    ChannelClosed,
}

/// Client side of the signaling relay: one WebSocket, a writer task and a
/// reader task. Owned and droppable, so tests and multiple surfaces can run
/// isolated instances instead of sharing process-wide state.
pub struct RelayClient {
    out_tx: mpsc::UnboundedSender<SignalMessage>,
    tasks: Vec<JoinHandle<()>>,
}

impl RelayClient {
    /// Dial the relay and spawn the IO tasks. The returned receiver carries
    /// parsed inbound traffic and the `Connected`/`Disconnected` lifecycle
    /// events; it yields `Connected` as soon as the socket is up.
    pub async fn connect(
        config: &SignalingConfig,
    ) -> Result<(Self, mpsc::Receiver<RelayEvent>), RelayError> {
        let (socket, _response) = connect_async(config.endpoint.as_str()).await?;
        info!("Connected to signaling relay at {}", config.endpoint);

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<SignalMessage>();
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer);

        let send_task = tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize signal message: {e}");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json)).await {
                    error!("Failed to send signal message: {e}");
                    break;
                }
            }
        });

        let recv_task = tokio::spawn(async move {
            let _ = event_tx.send(RelayEvent::Connected).await;

            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => {
                            let Some(event) = RelayEvent::from_signal(signal) else {
                                continue;
                            };
                            if event_tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("Invalid signal message: {e}"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            info!("Signaling relay connection closed");
            let _ = event_tx.send(RelayEvent::Disconnected).await;
        });

        let client = Self {
            out_tx,
            tasks: vec![send_task, recv_task],
        };
        Ok((client, event_rx))
    }

    #[cfg(test)]
    fn with_outbound(out_tx: mpsc::UnboundedSender<SignalMessage>) -> Self {
        Self {
            out_tx,
            tasks: Vec::new(),
        }
    }

    /// Announce this client in `room`. No acknowledgement is awaited.
    pub fn join(&self, room: &RoomId) -> Result<(), RelayError> {
        if room.is_empty() {
            return Err(RelayError::EmptyRoomId);
        }
        self.emit(SignalMessage::JoinRoom(room.clone()))
    }

    /// Withdraw from `room`. Call-state cleanup is the caller's business;
    /// the relay only routes the intent.
    pub fn leave(&self, room: &RoomId) -> Result<(), RelayError> {
        if room.is_empty() {
            return Err(RelayError::EmptyRoomId);
        }
        self.emit(SignalMessage::LeaveRoom(room.clone()))
    }

    fn emit(&self, msg: SignalMessage) -> Result<(), RelayError> {
        self.out_tx.send(msg).map_err(|_| RelayError::ChannelClosed)
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[async_trait]
impl SignalSink for RelayClient {
    async fn send_offer(&self, description: SessionDescription) {
        if let Err(e) = self.emit(SignalMessage::Offer(description)) {
            error!("Failed to queue offer: {e}");
        }
    }

    async fn send_answer(&self, description: SessionDescription) {
        if let Err(e) = self.emit(SignalMessage::Answer(description)) {
            error!("Failed to queue answer: {e}");
        }
    }

    async fn send_ice_candidate(&self, candidate: IceCandidate) {
        if let Err(e) = self.emit(SignalMessage::IceCandidate(candidate)) {
            error!("Failed to queue ICE candidate: {e}");
        }
    }
}
