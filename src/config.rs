use crate::effect::binding::{CONFIG_RADIUS, CONFIG_STRENGTH, DEFAULT_RADIUS, DEFAULT_STRENGTH, FRAGMENT_SHADER};
use crate::effect::ControllerOptions;
use crate::events::WindowInfo;
use crate::waymca_error;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub effect: EffectConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

/// Настройки эффекта. Поля radius и strength отдаются хосту под ключами Radius и Strength
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EffectConfig {
    pub radius: f64,
    pub strength: f64,
    pub shader: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub event_interval_ms: u64,
    #[serde(default)]
    pub windows: Vec<WindowInfo>,
}

impl LoggingConfig {
    /// Директивы для EnvFilter: общий уровень, затем уточняющий фильтр
    pub fn directives(&self) -> String {
        let filter = self.filter.trim();
        if filter.is_empty() {
            self.level.clone()
        } else {
            format!("{},{}", self.level, filter)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
                filter: "waymca=info".to_string(),
            },
            effect: EffectConfig {
                radius: DEFAULT_RADIUS,
                strength: DEFAULT_STRENGTH,
                shader: FRAGMENT_SHADER.to_string(),
                enabled: true,
            },
            simulation: SimulationConfig {
                event_interval_ms: 2000,
                windows: Vec::new(),
            },
        }
    }
}

impl Config {
    /// Значения по умолчанию, поверх них TOML-файл, поверх него переменные WAYMCA_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WAYMCA_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация параметров эффекта
        for (name, value) in [("radius", self.effect.radius), ("strength", self.effect.strength)] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} должно быть неотрицательным числом, получено {}", name, value);
            }
        }

        if self.effect.shader.trim().is_empty() {
            anyhow::bail!("Не указан файл фрагментного шейдера");
        }

        if self.simulation.event_interval_ms < 100 {
            anyhow::bail!("event_interval_ms должно быть минимум 100");
        }

        // Валидация окон симуляции
        let mut ids = HashSet::new();
        for (i, window) in self.simulation.windows.iter().enumerate() {
            if window.window_class.trim().is_empty() {
                return Err(waymca_error!(invalid_window, "Пустой window_class у окна #{}", i + 1).into());
            }
            if !ids.insert(window.id) {
                return Err(waymca_error!(invalid_window, "Повторяющийся id {} у окна #{}", window.id, i + 1).into());
            }
        }

        Ok(())
    }

    /// Содержимое хранилища настроек эффекта в том виде, в котором его читает хост
    pub fn effect_entries(&self) -> Vec<(String, f64)> {
        vec![
            (CONFIG_RADIUS.to_string(), self.effect.radius),
            (CONFIG_STRENGTH.to_string(), self.effect.strength),
        ]
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            fragment_shader: self.effect.shader.clone(),
            enabled: self.effect.enabled,
        }
    }
}
