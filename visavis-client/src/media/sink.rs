use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use webrtc::track::track_remote::TrackRemote;

/// A render target for one media stream: the counterpart of a `<video>`
/// element. The terminal front end reads the bound stream id and the packet
/// counter instead of drawing pixels.
pub struct MediaSink {
    label: &'static str,
    muted: bool,
    packets: Arc<AtomicU64>,
    binding: Mutex<Binding>,
}

#[derive(Default)]
struct Binding {
    stream_id: Option<String>,
    readers: Vec<JoinHandle<()>>,
}

impl MediaSink {
    /// The local preview. Plays muted so the user never hears themselves.
    pub fn local() -> Self {
        Self::new("local", true)
    }

    pub fn remote() -> Self {
        Self::new("remote", false)
    }

    fn new(label: &'static str, muted: bool) -> Self {
        Self {
            label,
            muted,
            packets: Arc::new(AtomicU64::new(0)),
            binding: Mutex::new(Binding::default()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub async fn is_bound(&self) -> bool {
        self.binding.lock().await.stream_id.is_some()
    }

    pub async fn stream_id(&self) -> Option<String> {
        self.binding.lock().await.stream_id.clone()
    }

    pub fn packets_received(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    /// Bind a local stream by id (the preview path; no reader needed).
    pub async fn bind_stream(&self, stream_id: &str) {
        let mut binding = self.binding.lock().await;
        binding.stream_id = Some(stream_id.to_owned());
        debug!("{} sink bound to stream {stream_id}", self.label);
    }

    /// Attach a remote track. The first stream to arrive claims the sink;
    /// tracks belonging to any other stream are ignored. Returns whether
    /// the track was accepted.
    pub async fn bind_track(&self, track: Arc<TrackRemote>) -> bool {
        let mut binding = self.binding.lock().await;
        let stream_id = track.stream_id();
        match &binding.stream_id {
            Some(bound) if *bound != stream_id => return false,
            Some(_) => {}
            None => binding.stream_id = Some(stream_id),
        }

        let packets = self.packets.clone();
        let label = self.label;
        binding.readers.push(tokio::spawn(async move {
            while let Ok((_packet, _attributes)) = track.read_rtp().await {
                packets.fetch_add(1, Ordering::Relaxed);
            }
            debug!("{label} sink: track drained");
        }));
        true
    }

    pub async fn unbind(&self) {
        let mut binding = self.binding.lock().await;
        binding.stream_id = None;
        for reader in binding.readers.drain(..) {
            reader.abort();
        }
        self.packets.store(0, Ordering::Relaxed);
    }
}
