mod command;
mod controller;
mod notice;
mod state;

pub use command::CallCommand;
pub use controller::CallController;
pub use notice::{ClientNotice, NoticeLevel};
pub use state::{CallRole, CallState};
