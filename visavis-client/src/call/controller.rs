use crate::call::{CallCommand, CallRole, CallState, ClientNotice};
use crate::media::{LocalMedia, MediaDevices, MediaSink};
use crate::signaling::SignalSink;
use crate::transport::{LinkEvent, PeerLink, TransportConfig};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use visavis_core::{IceCandidate, SessionDescription};
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Serialized owner of the peer connection.
///
/// The four signaling entry points and the local user actions all land here
/// as commands on one queue; the link's callbacks come in on a second
/// channel consumed by the same loop. One loop, no shared mutable handle,
/// so the entry points can never race to initialize or replace it.
pub struct CallController {
    command_rx: mpsc::Receiver<CallCommand>,
    link_rx: mpsc::Receiver<LinkEvent>,
    link_tx: mpsc::Sender<LinkEvent>,
    signaling: Arc<dyn SignalSink>,
    devices: Arc<dyn MediaDevices>,
    local_sink: Arc<MediaSink>,
    remote_sink: Arc<MediaSink>,
    notices: mpsc::UnboundedSender<ClientNotice>,
    state_tx: watch::Sender<CallState>,
    config: TransportConfig,
    link: Option<PeerLink>,
    media: Option<LocalMedia>,
    remote_applied: bool,
    pending_candidates: Vec<IceCandidate>,
}

impl CallController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        command_rx: mpsc::Receiver<CallCommand>,
        signaling: Arc<dyn SignalSink>,
        devices: Arc<dyn MediaDevices>,
        local_sink: Arc<MediaSink>,
        remote_sink: Arc<MediaSink>,
        notices: mpsc::UnboundedSender<ClientNotice>,
        config: TransportConfig,
    ) -> (Self, watch::Receiver<CallState>) {
        let (link_tx, link_rx) = mpsc::channel(64);
        let (state_tx, state_rx) = watch::channel(CallState::Idle);

        let controller = Self {
            command_rx,
            link_rx,
            link_tx,
            signaling,
            devices,
            local_sink,
            remote_sink,
            notices,
            state_tx,
            config,
            link: None,
            media: None,
            remote_applied: false,
            pending_candidates: Vec::new(),
        };
        (controller, state_rx)
    }

    pub async fn run(mut self) {
        info!("Call controller loop started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            info!("Command channel closed. Shutting down call controller.");
                            break;
                        }
                    }
                }

                event = self.link_rx.recv() => {
                    // link_tx lives in self, so this arm never yields None.
                    if let Some(event) = event {
                        self.handle_link_event(event).await;
                    }
                }
            }
        }

        self.teardown(CallState::Closed).await;
        info!("Call controller loop finished");
    }

    fn state(&self) -> CallState {
        *self.state_tx.borrow()
    }

    fn set_state(&self, state: CallState) {
        self.state_tx.send_replace(state);
    }

    fn notify(&self, notice: ClientNotice) {
        let _ = self.notices.send(notice);
    }

    async fn handle_command(&mut self, cmd: CallCommand) {
        match cmd {
            CallCommand::Start => self.start_call().await,
            CallCommand::RemoteOffer(description) => self.handle_remote_offer(description).await,
            CallCommand::RemoteAnswer(description) => self.handle_remote_answer(description).await,
            CallCommand::RemoteIce(candidate) => self.handle_remote_candidate(candidate).await,
            CallCommand::HangUp => {
                if self.link.is_some() || self.media.is_some() {
                    self.teardown(CallState::Closed).await;
                    self.notify(ClientNotice::CallEnded);
                }
            }
        }
    }

    async fn start_call(&mut self) {
        if !self.state().accepts_new_call() {
            warn!("Start requested while a call is active");
            self.notify(ClientNotice::CallFailed(
                "a call is already in progress".to_owned(),
            ));
            return;
        }

        // Permission gate first: on denial nothing is built and no offer
        // goes out, the UI just loses its camera flag.
        let media = match self.devices.open().await {
            Ok(media) => media,
            Err(e) => {
                warn!("Media capture failed: {e}");
                self.notify(ClientNotice::CameraUnavailable(e.to_string()));
                return;
            }
        };

        self.local_sink.bind_stream(media.stream_id()).await;
        self.media = Some(media);

        if let Err(e) = self.open_caller_link().await {
            warn!("Error starting call: {e:#}");
            self.teardown(CallState::Idle).await;
            self.notify(ClientNotice::CallFailed(e.to_string()));
            return;
        }

        self.set_state(CallState::Negotiating(CallRole::Caller));
        self.notify(ClientNotice::CallStarted);
    }

    /// Caller path: the candidate callback is live before the offer is
    /// created, so candidates trickle out as soon as they are found.
    async fn open_caller_link(&mut self) -> anyhow::Result<()> {
        let link = PeerLink::new(&self.config, self.link_tx.clone()).await?;

        if let Some(media) = &self.media {
            for track in media.tracks() {
                link.add_track(track).await?;
            }
        }

        let offer = link.create_offer().await?;
        self.signaling.send_offer(offer).await;

        self.link = Some(link);
        self.remote_applied = false;
        Ok(())
    }

    async fn handle_remote_offer(&mut self, description: SessionDescription) {
        if !self.state().accepts_new_call() {
            warn!("Offer received while a call is active; rejecting");
            self.notify(ClientNotice::CallFailed(
                "offer received during an active call".to_owned(),
            ));
            return;
        }

        self.set_state(CallState::Negotiating(CallRole::Callee));

        if let Err(e) = self.answer_offer(description).await {
            warn!("Error handling offer: {e:#}");
            self.teardown(CallState::Idle).await;
            self.notify(ClientNotice::CallFailed(e.to_string()));
            return;
        }

        // Nothing further is needed from the callee once the answer is out.
        self.set_state(CallState::Connected);
        self.notify(ClientNotice::AnsweringOffer);
    }

    /// Callee path. The remote-track callback is registered inside
    /// `PeerLink::new`, before the offer is even applied, so a track can
    /// never slip past unobserved.
    async fn answer_offer(&mut self, description: SessionDescription) -> anyhow::Result<()> {
        let link = PeerLink::new(&self.config, self.link_tx.clone()).await?;
        link.apply_remote_offer(description).await?;

        let answer = link.create_answer().await?;
        self.signaling.send_answer(answer).await;

        self.link = Some(link);
        self.remote_applied = true;
        self.flush_pending_candidates().await;
        Ok(())
    }

    async fn handle_remote_answer(&mut self, description: SessionDescription) {
        let link = match (self.state(), self.link.as_ref()) {
            (CallState::Negotiating(CallRole::Caller), Some(link)) => link,
            _ => {
                warn!("Answer received with no outstanding offer");
                self.notify(ClientNotice::CallFailed(
                    "answer received with no call in progress".to_owned(),
                ));
                return;
            }
        };

        if let Err(e) = link.apply_remote_answer(description).await {
            warn!("Error handling answer: {e:#}");
            self.notify(ClientNotice::CallFailed(e.to_string()));
            return;
        }

        self.remote_applied = true;
        self.flush_pending_candidates().await;
        self.set_state(CallState::Connected);
        self.notify(ClientNotice::CallEstablished);
    }

    async fn handle_remote_candidate(&mut self, candidate: IceCandidate) {
        match &self.link {
            Some(link) if self.remote_applied => {
                if let Err(e) = link.add_remote_candidate(candidate).await {
                    warn!("Error handling ICE candidate: {e:#}");
                    self.notify(ClientNotice::CallFailed(e.to_string()));
                }
            }
            _ => {
                // The relay does not guarantee negotiation order; candidates
                // that race ahead of the descriptions wait here.
                debug!("Buffering ICE candidate that arrived before the SDP exchange");
                self.pending_candidates.push(candidate);
            }
        }
    }

    async fn flush_pending_candidates(&mut self) {
        if self.pending_candidates.is_empty() {
            return;
        }
        let candidates = std::mem::take(&mut self.pending_candidates);
        let Some(link) = &self.link else { return };

        debug!("Applying {} buffered ICE candidate(s)", candidates.len());
        for candidate in candidates {
            if let Err(e) = link.add_remote_candidate(candidate).await {
                warn!("Error applying buffered ICE candidate: {e:#}");
                self.notify(ClientNotice::CallFailed(e.to_string()));
            }
        }
    }

    async fn handle_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::CandidateGenerated(candidate) => {
                self.signaling.send_ice_candidate(candidate).await;
            }

            LinkEvent::RemoteTrack(track) => {
                if self.remote_sink.bind_track(track).await {
                    debug!("Remote stream bound to the remote sink");
                }
            }

            LinkEvent::StateChanged(state) => match state {
                RTCPeerConnectionState::Failed
                | RTCPeerConnectionState::Disconnected
                | RTCPeerConnectionState::Closed => {
                    if self.link.is_some() {
                        info!("Peer connection lost ({state}); ending call");
                        self.teardown(CallState::Closed).await;
                        self.notify(ClientNotice::CallEnded);
                    }
                }
                _ => debug!("Peer connection state: {state}"),
            },
        }
    }

    /// Release everything a call holds: the connection, the capture device,
    /// both sinks, and any buffered candidates.
    async fn teardown(&mut self, next: CallState) {
        if let Some(link) = self.link.take() {
            if let Err(e) = link.close().await {
                debug!("Error closing peer connection: {e:#}");
            }
        }
        if let Some(mut media) = self.media.take() {
            media.close();
        }
        self.local_sink.unbind().await;
        self.remote_sink.unbind().await;
        self.pending_candidates.clear();
        self.remote_applied = false;
        self.set_state(next);
    }
}
