use tracing::warn;
use visavis_core::{IceCandidate, PeerId, SessionDescription, SignalMessage};

/// Inbound traffic from the relay, plus connection lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Connected,
    Disconnected,
    Offer(SessionDescription),
    Answer(SessionDescription),
    IceCandidate(IceCandidate),
    ClientJoined(PeerId),
    ClientLeft(PeerId),
}

impl RelayEvent {
    pub(crate) fn from_signal(msg: SignalMessage) -> Option<Self> {
        match msg {
            SignalMessage::Offer(description) => Some(Self::Offer(description)),
            SignalMessage::Answer(description) => Some(Self::Answer(description)),
            SignalMessage::IceCandidate(candidate) => Some(Self::IceCandidate(candidate)),
            SignalMessage::ClientJoined { id } => Some(Self::ClientJoined(id)),
            SignalMessage::ClientLeft { id } => Some(Self::ClientLeft(id)),
            SignalMessage::JoinRoom(_) | SignalMessage::LeaveRoom(_) => {
                warn!("Relay echoed an outbound-only message; dropping it");
                None
            }
        }
    }
}
