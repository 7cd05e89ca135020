use std::sync::Arc;
use visavis_core::IceCandidate;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::track::track_remote::TrackRemote;

/// What the peer connection reports back into the call controller's loop.
pub enum LinkEvent {
    /// Trickle ICE: a local candidate was discovered and must be forwarded.
    CandidateGenerated(IceCandidate),
    /// The counterpart's media arrived.
    RemoteTrack(Arc<TrackRemote>),
    StateChanged(RTCPeerConnectionState),
}
