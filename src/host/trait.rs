use crate::effect::binding::{BindingHandle, BindingSpec, ShaderHandle, ShaderSource};
use crate::events::{HostEvent, WindowInfo};
use tokio::sync::mpsc::UnboundedReceiver;

/// Окружение, в котором работает эффект (композитор).
///
/// Хост владеет окнами, шейдерами, хранилищем настроек и рендерингом.
/// Контроллер только вызывает эти методы из цикла событий и не ждёт от них ошибок:
/// сбой внутри хоста выглядит для него так же, как окно без привязки.
pub trait EffectHost {
    /// Может ли хост вообще запускать шейдерные эффекты (OpenGL-композитинг)
    fn is_compositing_supported(&self) -> bool;

    fn add_fragment_shader(&mut self, source: &ShaderSource) -> ShaderHandle;

    fn read_config(&self, key: &str, default: f64) -> f64;

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: f64);

    /// Все известные окна в порядке наложения
    fn stacking_order(&self) -> Vec<WindowInfo>;

    /// Подписка на события хоста. Вызывается один раз при запуске эффекта
    fn subscribe(&mut self) -> UnboundedReceiver<HostEvent>;

    /// Запущен ли сейчас какой-либо полноэкранный эффект
    fn has_active_full_screen_effect(&self) -> bool;

    fn create_binding(&mut self, spec: &BindingSpec) -> BindingHandle;

    fn cancel_binding(&mut self, binding: BindingHandle);
}
