//! Хост эффекта: композитор, которому контроллер делегирует шейдеры,
//! настройки, перечисление окон и сами привязки.

mod simulated;
mod r#trait;

pub use self::r#trait::EffectHost;
pub use self::simulated::{HostCall, SimulatedHost, SimulatedHostHandle};
