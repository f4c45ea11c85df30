//! Drive pipeline — command mapping, debounced transmission, and the
//! dead-reckoned path.

pub mod command;
pub mod path;
pub mod relay;

pub use command::DriveCommand;
pub use path::PathTracker;
pub use relay::{CommandLink, CommandRelay, LinkError, LogLink};

#[cfg(feature = "serial")]
pub use relay::SerialLink;
