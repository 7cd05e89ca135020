mod link_event;
mod peer_link;
mod transport_config;

pub use link_event::LinkEvent;
pub use peer_link::PeerLink;
pub use transport_config::TransportConfig;
