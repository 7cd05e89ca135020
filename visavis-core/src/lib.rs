pub mod model;

pub use model::{
    IceCandidate, IceServerConfig, PeerId, RoomId, SdpKind, SessionDescription, SignalMessage,
};
