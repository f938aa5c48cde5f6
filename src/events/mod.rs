pub mod window;

pub use window::{HostEvent, HostEventType, WindowId, WindowInfo};
