use crate::host::SimulatedHostHandle;
use crate::events::{WindowId, WindowInfo};
use tokio::time::{interval, Duration};
use tracing::info;

/// Окна, которые показываются, если в конфигурации симуляции ничего не задано
pub fn fallback_windows() -> Vec<WindowInfo> {
    vec![
        WindowInfo::new(0x1001, "konsole org.kde.konsole").with_caption("Terminal - simulation"),
        WindowInfo::new(0x1002, "firefox firefox")
            .with_caption("Tooltip - simulation")
            .as_popup(),
        WindowInfo::new(0x1003, "kate org.kde.kate")
            .with_caption("Save As - simulation")
            .as_dialog(),
        WindowInfo::new(0x1004, "spectacle org.kde.spectacle").with_caption("Spectacle - simulation"),
        WindowInfo::new(0x1005, "plasmashell org.kde.plasmashell")
            .with_caption("Panel - simulation")
            .with_decoration(false)
            .as_special(),
    ]
}

/// Эмулирует появление и закрытие окон в хосте, как это делал бы композитор
pub struct WindowSimulator {
    host: SimulatedHostHandle,
    windows: Vec<WindowInfo>,
    interval: Duration,
}

impl WindowSimulator {
    pub fn new(host: SimulatedHostHandle, windows: Vec<WindowInfo>, interval_ms: u64) -> Self {
        let windows = if windows.is_empty() {
            fallback_windows()
        } else {
            windows
        };
        Self {
            host,
            windows,
            interval: Duration::from_millis(interval_ms),
        }
    }

    /// Один шаг симуляции: окно с индексом `step` открывается, если его нет, иначе закрывается
    pub fn step(&self, step: usize) {
        let window = &self.windows[step % self.windows.len()];

        if self.host.close_window(window.id).is_some() {
            info!("Симуляция: окно {} закрыто", window);
        } else {
            info!("Симуляция: окно {} открыто", window);
            self.host.add_window(window.clone());
        }
    }

    pub async fn run(self) {
        info!(
            "Симуляция окон запущена: {} окон, интервал {:?}",
            self.windows.len(),
            self.interval
        );

        let mut ticker = interval(self.interval);
        let mut step = 0;

        loop {
            ticker.tick().await;
            self.step(step);
            step = step.wrapping_add(1);
        }
    }

    #[cfg(test)]
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|window| window.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EffectHost, SimulatedHost};

    #[test]
    fn test_empty_config_uses_fallback_windows() {
        let host = SimulatedHost::new();
        let simulator = WindowSimulator::new(host.handle(), Vec::new(), 1000);

        assert_eq!(simulator.window_ids().len(), fallback_windows().len());
    }

    #[test]
    fn test_step_alternates_open_and_close() {
        let mut host = SimulatedHost::new();
        let handle = host.handle();
        let _events = host.subscribe();
        let simulator = WindowSimulator::new(
            handle.clone(),
            vec![WindowInfo::new(1, "kate org.kde.kate")],
            1000,
        );

        simulator.step(0);
        assert_eq!(handle.window_count(), 1);

        simulator.step(1);
        assert_eq!(handle.window_count(), 0);
        assert_eq!(host.stacking_order().len(), 0);
    }
}
