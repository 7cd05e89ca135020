//! Client side of a two-party audio/video call: a signaling relay client
//! over WebSocket and a call controller that owns the one peer connection.

pub mod call;
pub mod client;
pub mod media;
pub mod signaling;
pub mod transport;

pub use call::{CallCommand, CallController, CallRole, CallState, ClientNotice, NoticeLevel};
pub use client::{CallClient, ClientConfig};
pub use media::{
    DeniedDevices, LocalMedia, MediaDevices, MediaError, MediaSink, SyntheticDevices,
};
pub use signaling::{RelayClient, RelayError, RelayEvent, SignalSink, SignalingConfig};
pub use transport::TransportConfig;
