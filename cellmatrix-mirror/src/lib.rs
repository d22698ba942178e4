mod bootstrap;
mod device;
pub mod logging;
pub mod wire;

pub use bootstrap::{FATAL_SETUP_EXIT, manage_stdio_terminal, manage_terminal};
pub use device::MirrorDevice;
