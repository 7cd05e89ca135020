use std::fmt;
use visavis_core::{PeerId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// User-facing notifications. Every error is logged *and* lands here; none
/// is retried, and only `CameraUnavailable` changes later UI behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientNotice {
    ConnectedToServer,
    DisconnectedFromServer,
    ClientJoined(PeerId),
    ClientLeft(PeerId),
    JoinedRoom(RoomId),
    LeftRoom(RoomId),
    CallStarted,
    AnsweringOffer,
    CallEstablished,
    CallEnded,
    CameraUnavailable(String),
    CallFailed(String),
}

impl ClientNotice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::DisconnectedFromServer => NoticeLevel::Warn,
            Self::CameraUnavailable(_) | Self::CallFailed(_) => NoticeLevel::Error,
            _ => NoticeLevel::Info,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level() == NoticeLevel::Error
    }
}

impl fmt::Display for ClientNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectedToServer => write!(f, "Connected to server"),
            Self::DisconnectedFromServer => write!(f, "Disconnected from server"),
            Self::ClientJoined(id) => write!(f, "Client joined: {id}"),
            Self::ClientLeft(id) => write!(f, "Client left: {id}"),
            Self::JoinedRoom(room) => write!(f, "Joined room {room}"),
            Self::LeftRoom(room) => write!(f, "Left room {room}"),
            Self::CallStarted => write!(f, "Call started successfully"),
            Self::AnsweringOffer => write!(f, "Received offer, sending answer"),
            Self::CallEstablished => write!(f, "Call established successfully"),
            Self::CallEnded => write!(f, "Call ended"),
            Self::CameraUnavailable(reason) => {
                write!(f, "Unable to access the camera: {reason}")
            }
            Self::CallFailed(reason) => write!(f, "Call error: {reason}"),
        }
    }
}
