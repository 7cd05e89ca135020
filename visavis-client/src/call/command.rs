use visavis_core::{IceCandidate, SessionDescription};

/// Everything that may mutate the call, funneled through one queue so the
/// four entry points can never race each other over the connection handle.
#[derive(Debug)]
pub enum CallCommand {
    /// Local user action: start a call.
    Start,
    /// The counterpart sent an SDP offer.
    RemoteOffer(SessionDescription),
    /// The counterpart sent an SDP answer.
    RemoteAnswer(SessionDescription),
    /// The counterpart trickled an ICE candidate.
    RemoteIce(IceCandidate),
    /// Local user action: end the call (also issued on leave-room).
    HangUp,
}
