use crate::events::WindowId;
use std::fmt;
use std::time::Duration;

/// Имена uniform-переменных фрагментного шейдера
pub const UNIFORM_RADIUS: &str = "uRadius";
pub const UNIFORM_STRENGTH: &str = "uStrength";
pub const UNIFORM_ENABLED: &str = "uEnabled";

/// Ключи конфигурации эффекта и их значения по умолчанию
pub const CONFIG_RADIUS: &str = "Radius";
pub const CONFIG_STRENGTH: &str = "Strength";
pub const DEFAULT_RADIUS: f64 = 2.0;
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// KWin подставит core-profile вариант (waymca_core.frag) сам
pub const FRAGMENT_SHADER: &str = "waymca.frag";

/// Непрозрачный дескриптор шейдера, выданный хостом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Непрозрачный дескриптор активной привязки, выданный хостом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingHandle(pub u64);

impl fmt::Display for BindingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// Какие текстуры шейдер получает от хоста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderTrait {
    MapTexture,
}

/// Источник фрагментного шейдера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub shader_trait: ShaderTrait,
    pub fragment_file: String,
}

impl ShaderSource {
    pub fn map_texture(fragment_file: impl Into<String>) -> Self {
        Self {
            shader_trait: ShaderTrait::MapTexture,
            fragment_file: fragment_file.into(),
        }
    }
}

/// Тип анимации, который запрашивается у хоста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    ShaderUniform,
}

/// Описание привязки шейдера к окну
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSpec {
    pub window: WindowId,
    pub duration: Duration,
    pub kind: AnimationKind,
    pub shader: ShaderHandle,
    pub uniform: &'static str,
    pub from: f64,
    pub to: f64,
}

impl BindingSpec {
    /// Постоянная привязка: from == to, поэтому анимация ничего не меняет во времени,
    /// а только удерживает шейдер на окне.
    pub fn persistent(window: WindowId, shader: ShaderHandle) -> Self {
        Self {
            window,
            duration: Duration::from_millis(1),
            kind: AnimationKind::ShaderUniform,
            shader,
            uniform: UNIFORM_ENABLED,
            from: 1.0,
            to: 1.0,
        }
    }
}

/// Параметры эффекта, которые передаются в шейдер целиком
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub radius: f64,
    pub strength: f64,
    pub enabled: bool,
}

impl EffectParams {
    pub fn enabled_value(&self) -> f64 {
        if self.enabled {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            strength: DEFAULT_STRENGTH,
            enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_binding_is_static() {
        let spec = BindingSpec::persistent(WindowId(3), ShaderHandle(1));

        assert_eq!(spec.window, WindowId(3));
        assert_eq!(spec.kind, AnimationKind::ShaderUniform);
        assert_eq!(spec.uniform, UNIFORM_ENABLED);
        assert_eq!(spec.from, spec.to);
        assert_eq!(spec.duration, Duration::from_millis(1));
    }

    #[test]
    fn test_effect_params_enabled_value() {
        let mut params = EffectParams::default();
        assert_eq!(params.enabled_value(), 1.0);

        params.enabled = false;
        assert_eq!(params.enabled_value(), 0.0);
    }
}
