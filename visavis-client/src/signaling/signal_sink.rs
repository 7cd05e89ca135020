use async_trait::async_trait;
use visavis_core::{IceCandidate, SessionDescription};

/// Outbound half of the signaling channel. The call controller talks to the
/// relay only through this trait, so tests can capture what would be sent.
///
/// All three sends are fire-and-forget: delivery is not confirmed and
/// failures are logged by the implementation, never retried.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send_offer(&self, description: SessionDescription);

    async fn send_answer(&self, description: SessionDescription);

    /// Emit one ICE candidate as it is discovered. No batching.
    async fn send_ice_candidate(&self, candidate: IceCandidate);
}
