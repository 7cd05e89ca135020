mod relay_client;
mod relay_event;
mod signal_sink;

pub use relay_client::{RelayClient, RelayError, SignalingConfig};
pub use relay_event::RelayEvent;
pub use signal_sink::SignalSink;
