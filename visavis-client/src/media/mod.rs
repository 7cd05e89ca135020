mod devices;
mod sink;

pub use devices::{DeniedDevices, LocalMedia, MediaDevices, MediaError, SyntheticDevices};
pub use sink::MediaSink;
