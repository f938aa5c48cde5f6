use crate::debug_if_enabled;
use crate::effect::binding::{BindingHandle, BindingSpec, ShaderHandle, ShaderSource};
use crate::events::{HostEvent, WindowId, WindowInfo};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use super::r#trait::EffectHost;

/// Изменяющий вызов, который контроллер сделал в хост
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    AddShader(String),
    SetUniform { name: String, value: f64 },
    CreateBinding(WindowId),
    CancelBinding(BindingHandle),
}

#[derive(Debug, Default)]
struct HostState {
    supported: bool,
    windows: Vec<WindowInfo>,
    config: HashMap<String, f64>,
    uniforms: HashMap<String, f64>,
    live_bindings: BTreeMap<BindingHandle, BindingSpec>,
    next_handle: u64,
    full_screen: bool,
    calls: Vec<HostCall>,
    events: Option<UnboundedSender<HostEvent>>,
}

/// Хост, работающий в памяти процесса.
///
/// Используется командой `run` вместо настоящего KWin и в тестах: через
/// [`SimulatedHostHandle`] можно менять окна и настройки, а также проверять,
/// какие привязки сейчас живы.
pub struct SimulatedHost {
    state: Arc<Mutex<HostState>>,
}

/// Разделяемый доступ к состоянию [`SimulatedHost`] после передачи хоста контроллеру
#[derive(Clone)]
pub struct SimulatedHostHandle {
    state: Arc<Mutex<HostState>>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        let state = HostState {
            supported: true,
            next_handle: 1,
            ..HostState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_windows(self, windows: impl IntoIterator<Item = WindowInfo>) -> Self {
        self.state.lock().windows.extend(windows);
        self
    }

    pub fn with_config(self, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        self.state.lock().config.extend(entries);
        self
    }

    #[cfg(test)]
    pub fn unsupported(self) -> Self {
        self.state.lock().supported = false;
        self
    }

    pub fn handle(&self) -> SimulatedHostHandle {
        SimulatedHostHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl EffectHost for SimulatedHost {
    fn is_compositing_supported(&self) -> bool {
        self.state.lock().supported
    }

    fn add_fragment_shader(&mut self, source: &ShaderSource) -> ShaderHandle {
        let mut state = self.state.lock();
        state.calls.push(HostCall::AddShader(source.fragment_file.clone()));
        info!("[SIM] Шейдер {} ({:?}) скомпилирован", source.fragment_file, source.shader_trait);
        ShaderHandle(1)
    }

    fn read_config(&self, key: &str, default: f64) -> f64 {
        self.state.lock().config.get(key).copied().unwrap_or(default)
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: f64) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::SetUniform {
            name: name.to_string(),
            value,
        });
        state.uniforms.insert(name.to_string(), value);
        debug_if_enabled!("[SIM] шейдер #{}: uniform {} = {}", shader.0, name, value);
    }

    fn stacking_order(&self) -> Vec<WindowInfo> {
        self.state.lock().windows.clone()
    }

    fn subscribe(&mut self) -> UnboundedReceiver<HostEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        if state.events.replace(tx).is_some() {
            warn!("[SIM] Повторная подписка на события хоста, старый канал закрыт");
        }
        rx
    }

    fn has_active_full_screen_effect(&self) -> bool {
        self.state.lock().full_screen
    }

    fn create_binding(&mut self, spec: &BindingSpec) -> BindingHandle {
        let mut state = self.state.lock();
        let handle = BindingHandle(state.next_handle);
        state.next_handle += 1;
        state.calls.push(HostCall::CreateBinding(spec.window));
        state.live_bindings.insert(handle, spec.clone());
        debug_if_enabled!(
            "[SIM] {}: окно {}, {:?} {} {} -> {} за {:?}",
            handle,
            spec.window,
            spec.kind,
            spec.uniform,
            spec.from,
            spec.to,
            spec.duration
        );
        handle
    }

    fn cancel_binding(&mut self, binding: BindingHandle) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::CancelBinding(binding));
        if state.live_bindings.remove(&binding).is_none() {
            warn!("[SIM] Отмена неизвестной привязки {}", binding);
        }
    }
}

impl SimulatedHostHandle {
    /// Добавить окно в порядок наложения и сообщить об этом подписчику
    pub fn add_window(&self, window: WindowInfo) {
        let mut state = self.state.lock();
        state.windows.retain(|known| known.id != window.id);
        state.windows.push(window.clone());
        Self::emit(&state, HostEvent::WindowAdded(window));
    }

    /// Убрать окно и сообщить подписчику. Окно приходит уже помеченным как удалённое
    pub fn close_window(&self, id: WindowId) -> Option<WindowInfo> {
        let mut state = self.state.lock();
        let position = state.windows.iter().position(|window| window.id == id)?;
        let mut window = state.windows.remove(position);
        window.deleted = true;
        Self::emit(&state, HostEvent::WindowClosed(window.clone()));
        Some(window)
    }

    /// Изменить окно на месте, не отправляя событий (например, скрыть его)
    #[cfg(test)]
    pub fn update_window(&self, id: WindowId, update: impl FnOnce(&mut WindowInfo)) -> bool {
        let mut state = self.state.lock();
        match state.windows.iter_mut().find(|window| window.id == id) {
            Some(window) => {
                update(window);
                true
            }
            None => false,
        }
    }

    /// Заменить хранилище настроек целиком и отправить ConfigChanged
    pub fn replace_config(&self, entries: impl IntoIterator<Item = (String, f64)>) {
        let mut state = self.state.lock();
        state.config = entries.into_iter().collect();
        Self::emit(&state, HostEvent::ConfigChanged);
    }

    pub fn request_toggle(&self) {
        let state = self.state.lock();
        Self::emit(&state, HostEvent::ToggleRequested);
    }

    /// Закрыть канал событий, что для контроллера означает выгрузку эффекта
    pub fn disconnect(&self) {
        self.state.lock().events = None;
    }

    #[cfg(test)]
    pub fn set_full_screen(&self, active: bool) {
        self.state.lock().full_screen = active;
    }

    pub fn window_count(&self) -> usize {
        self.state.lock().windows.len()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    pub fn live_binding_count(&self) -> usize {
        self.state.lock().live_bindings.len()
    }

    /// Количество живых привязок для конкретного окна
    #[cfg(test)]
    pub fn bindings_for(&self, id: WindowId) -> usize {
        self.state
            .lock()
            .live_bindings
            .values()
            .filter(|spec| spec.window == id)
            .count()
    }

    #[cfg(test)]
    pub fn uniform(&self, name: &str) -> Option<f64> {
        self.state.lock().uniforms.get(name).copied()
    }

    #[cfg(test)]
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    #[cfg(test)]
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn emit(state: &HostState, event: HostEvent) {
        match &state.events {
            Some(tx) => {
                if tx.send(event).is_err() {
                    warn!("[SIM] Подписчик событий хоста уже отключён");
                }
            }
            None => {
                debug_if_enabled!("[SIM] Нет подписчика для события {}", event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_are_tracked_until_cancelled() {
        let mut host = SimulatedHost::new();
        let handle = host.handle();

        let first = host.create_binding(&BindingSpec::persistent(WindowId(1), ShaderHandle(1)));
        let second = host.create_binding(&BindingSpec::persistent(WindowId(2), ShaderHandle(1)));
        assert_ne!(first, second);
        assert_eq!(handle.live_binding_count(), 2);

        host.cancel_binding(first);
        assert_eq!(handle.live_binding_count(), 1);
        assert_eq!(handle.bindings_for(WindowId(1)), 0);
        assert_eq!(handle.bindings_for(WindowId(2)), 1);
    }

    #[test]
    fn test_read_config_falls_back_to_default() {
        let host = SimulatedHost::new().with_config([("Radius".to_string(), 4.5)]);

        assert_eq!(host.read_config("Radius", 2.0), 4.5);
        assert_eq!(host.read_config("Strength", 1.0), 1.0);
    }

    #[test]
    fn test_window_events_reach_subscriber() {
        let mut host = SimulatedHost::new();
        let handle = host.handle();
        let mut events = host.subscribe();

        handle.add_window(WindowInfo::new(5, "kate org.kde.kate"));
        let closed = handle.close_window(WindowId(5)).expect("окно должно существовать");
        assert!(closed.deleted);
        assert!(handle.close_window(WindowId(5)).is_none());

        assert!(matches!(events.try_recv(), Ok(HostEvent::WindowAdded(w)) if w.id == WindowId(5)));
        assert!(matches!(events.try_recv(), Ok(HostEvent::WindowClosed(w)) if w.deleted));
        assert_eq!(handle.window_count(), 0);
    }

    #[test]
    fn test_request_toggle_reaches_subscriber() {
        let mut host = SimulatedHost::new();
        let handle = host.handle();
        let mut events = host.subscribe();

        handle.request_toggle();
        assert_eq!(events.try_recv().ok(), Some(HostEvent::ToggleRequested));

        host.set_uniform(ShaderHandle(1), "uEnabled", 0.0);
        assert_eq!(handle.call_count(), 1);
    }

    #[test]
    fn test_disconnect_closes_event_channel() {
        let mut host = SimulatedHost::new();
        let handle = host.handle();
        let mut events = host.subscribe();

        handle.disconnect();
        assert!(matches!(
            events.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
