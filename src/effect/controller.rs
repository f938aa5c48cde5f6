use crate::debug_if_enabled;
use crate::effect::binding::{
    BindingHandle, BindingSpec, EffectParams, ShaderHandle, ShaderSource, CONFIG_RADIUS,
    CONFIG_STRENGTH, DEFAULT_RADIUS, DEFAULT_STRENGTH, FRAGMENT_SHADER, UNIFORM_ENABLED,
    UNIFORM_RADIUS, UNIFORM_STRENGTH,
};
use crate::effect::eligibility::should_apply;
use crate::events::{HostEvent, WindowId, WindowInfo};
use crate::host::EffectHost;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Параметры запуска контроллера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub fragment_shader: String,
    pub enabled: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            fragment_shader: FRAGMENT_SHADER.to_string(),
            enabled: true,
        }
    }
}

/// Контроллер жизненного цикла привязок шейдера к окнам.
///
/// Гарантирует, что у каждого подходящего окна ровно одна живая привязка,
/// а у неподходящего ни одной. Работает целиком внутри цикла событий хоста:
/// каждый обработчик выполняется до конца, прежде чем придёт следующее событие.
pub struct BindingController<H: EffectHost> {
    host: H,
    shader: ShaderHandle,
    params: EffectParams,
    supported: bool,
    bindings: HashMap<WindowId, BindingHandle>,
}

impl<H: EffectHost> BindingController<H> {
    /// Загрузка эффекта: шейдер, подписка на события, настройки и первичная сверка
    /// со всеми окнами, которые уже существуют.
    pub fn start(mut host: H, options: &ControllerOptions) -> (Self, UnboundedReceiver<HostEvent>) {
        let supported = host.is_compositing_supported();
        if !supported {
            warn!("Хост не поддерживает OpenGL-композитинг, эффект останется выключенным");
        }

        let shader = host.add_fragment_shader(&ShaderSource::map_texture(&options.fragment_shader));
        let events = host.subscribe();

        let mut controller = Self {
            host,
            shader,
            params: EffectParams {
                enabled: options.enabled && supported,
                ..EffectParams::default()
            },
            supported,
            bindings: HashMap::new(),
        };

        info!(
            "Эффект загружен (шейдер: {}, включён: {})",
            options.fragment_shader, controller.params.enabled
        );

        controller.load_config();
        controller.reconcile();

        (controller, events)
    }

    /// Перечитать настройки, передать их в шейдер и пересверить все окна
    pub fn load_config(&mut self) {
        let radius = self.host.read_config(CONFIG_RADIUS, DEFAULT_RADIUS);
        let strength = self.host.read_config(CONFIG_STRENGTH, DEFAULT_STRENGTH);

        self.params = EffectParams {
            radius,
            strength,
            enabled: self.params.enabled,
        };
        self.push_uniforms();

        info!(
            "Настройки эффекта применены: radius={}, strength={}",
            radius, strength
        );

        self.reconcile();
    }

    pub fn apply_to_window(&mut self, window: &WindowInfo) {
        // Эффект уступает эксклюзивному полноэкранному содержимому
        if self.host.has_active_full_screen_effect() {
            debug_if_enabled!("Активен полноэкранный эффект, пропускаем окно {}", window);
            return;
        }

        if !self.params.enabled || !should_apply(Some(window)) {
            self.cleanup(Some(window));
            return;
        }

        if self.bindings.contains_key(&window.id) {
            return;
        }

        let binding = self
            .host
            .create_binding(&BindingSpec::persistent(window.id, self.shader));
        self.bindings.insert(window.id, binding);

        info!("Шейдер привязан к окну {} ({})", window, binding);
    }

    pub fn cleanup(&mut self, window: Option<&WindowInfo>) {
        let Some(window) = window else {
            return;
        };

        if let Some(binding) = self.bindings.remove(&window.id) {
            self.host.cancel_binding(binding);
            info!("Привязка {} снята с окна {}", binding, window);
        }
    }

    pub fn on_window_added(&mut self, window: &WindowInfo) {
        self.apply_to_window(window);
    }

    pub fn on_window_closed(&mut self, window: &WindowInfo) {
        self.cleanup(Some(window));
    }

    /// Включить или выключить эффект целиком
    pub fn toggle(&mut self) {
        if self.params.enabled {
            self.params.enabled = false;
            self.cancel_all();
            self.push_uniforms();
            info!("Эффект выключен");
            return;
        }

        if !self.supported {
            warn!("Нельзя включить эффект: хост не поддерживает OpenGL-композитинг");
            return;
        }

        self.params.enabled = true;
        info!("Эффект включён");
        self.load_config();
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        debug_if_enabled!("Обработка события хоста: {}", event);

        match event {
            HostEvent::ConfigChanged => self.load_config(),
            HostEvent::WindowAdded(window) => self.on_window_added(&window),
            HostEvent::WindowClosed(window) => self.on_window_closed(&window),
            HostEvent::ToggleRequested => self.toggle(),
        }
    }

    /// Обрабатывать события, пока хост не закроет канал, затем выгрузить эффект.
    /// Возвращает хост, чтобы вызывающий мог освободить его ресурсы.
    pub async fn run(mut self, mut events: UnboundedReceiver<HostEvent>) -> H {
        info!("Контроллер привязок запущен");

        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }

        info!("Канал событий хоста закрыт");
        self.unload()
    }

    /// Снять все привязки и отдать хост обратно
    pub fn unload(mut self) -> H {
        self.cancel_all();
        info!("Эффект выгружен");
        self.host
    }

    #[cfg(test)]
    pub fn is_bound(&self, id: WindowId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn bound_windows(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.bindings.keys().copied().collect();
        ids.sort();
        ids
    }

    #[cfg(test)]
    pub fn params(&self) -> EffectParams {
        self.params
    }

    fn reconcile(&mut self) {
        let windows = self.host.stacking_order();

        // Окна, о закрытии которых мы не узнали, не должны удерживать привязку
        let known: HashSet<WindowId> = windows.iter().map(|window| window.id).collect();
        let stale: Vec<WindowId> = self
            .bindings
            .keys()
            .filter(|id| !known.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(binding) = self.bindings.remove(&id) {
                self.host.cancel_binding(binding);
                warn!("Окно {} исчезло без события закрытия, привязка {} снята", id, binding);
            }
        }

        for window in &windows {
            self.apply_to_window(window);
        }

        debug_if_enabled!(
            "Сверка завершена: окон {}, привязок {}",
            windows.len(),
            self.bindings.len()
        );
    }

    fn push_uniforms(&mut self) {
        self.host.set_uniform(self.shader, UNIFORM_RADIUS, self.params.radius);
        self.host.set_uniform(self.shader, UNIFORM_STRENGTH, self.params.strength);
        self.host
            .set_uniform(self.shader, UNIFORM_ENABLED, self.params.enabled_value());
    }

    fn cancel_all(&mut self) {
        let count = self.bindings.len();
        if count == 0 {
            return;
        }

        info!("Снятие {} активных привязок", count);
        for (_, binding) in self.bindings.drain() {
            self.host.cancel_binding(binding);
        }
    }
}
