use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use visavis_client::SignalSink;
use visavis_core::{IceCandidate, SessionDescription};

/// Outbound signaling traffic captured from the controller.
#[derive(Debug, Clone)]
pub enum SentSignal {
    Offer(SessionDescription),
    Answer(SessionDescription),
    Ice(IceCandidate),
}

/// SignalSink that records everything the controller emits, for
/// verification and for cross-wiring two controllers.
pub struct MockSignalSink {
    tx: mpsc::UnboundedSender<SentSignal>,
    sent: Mutex<Vec<SentSignal>>,
}

impl MockSignalSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SentSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(Self {
            tx,
            sent: Mutex::new(Vec::new()),
        });
        (sink, rx)
    }

    pub async fn offers(&self) -> Vec<SessionDescription> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|signal| match signal {
                SentSignal::Offer(description) => Some(description.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn answers(&self) -> Vec<SessionDescription> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|signal| match signal {
                SentSignal::Answer(description) => Some(description.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn candidates(&self) -> Vec<IceCandidate> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|signal| match signal {
                SentSignal::Ice(candidate) => Some(candidate.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    async fn record(&self, signal: SentSignal) {
        self.sent.lock().await.push(signal.clone());
        let _ = self.tx.send(signal);
    }
}

#[async_trait]
impl SignalSink for MockSignalSink {
    async fn send_offer(&self, description: SessionDescription) {
        self.record(SentSignal::Offer(description)).await;
    }

    async fn send_answer(&self, description: SessionDescription) {
        self.record(SentSignal::Answer(description)).await;
    }

    async fn send_ice_candidate(&self, candidate: IceCandidate) {
        self.record(SentSignal::Ice(candidate)).await;
    }
}
