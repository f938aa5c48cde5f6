pub mod kwin_dbus;
pub mod simulator;

pub use kwin_dbus::{KwinEffectsClient, EFFECT_NAME};
pub use simulator::WindowSimulator;
