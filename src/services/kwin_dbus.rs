use crate::error::Result;
use crate::waymca_error;
use tracing::{debug, info};
use zbus::Connection;

/// Имя эффекта, под которым KWin его загружает
pub const EFFECT_NAME: &str = "waymca";

/// Интерфейс управления эффектами KWin на сессионной шине
#[zbus::proxy(
    interface = "org.kde.kwin.Effects",
    default_service = "org.kde.KWin",
    default_path = "/Effects"
)]
trait KwinEffects {
    #[zbus(name = "isEffectLoaded")]
    fn is_effect_loaded(&self, name: &str) -> zbus::Result<bool>;

    #[zbus(name = "reconfigureEffect")]
    fn reconfigure_effect(&self, name: &str) -> zbus::Result<()>;

    #[zbus(name = "toggleEffect")]
    fn toggle_effect(&self, name: &str) -> zbus::Result<bool>;
}

/// Клиент D-Bus для уже запущенного KWin
pub struct KwinEffectsClient {
    proxy: KwinEffectsProxy<'static>,
}

impl KwinEffectsClient {
    pub async fn connect() -> Result<Self> {
        info!("Подключение к KWin через D-Bus");

        let connection = Connection::session().await?;
        let proxy = KwinEffectsProxy::new(&connection).await?;

        Ok(Self { proxy })
    }

    async fn ensure_loaded(&self, effect: &str) -> Result<()> {
        let loaded = self.proxy.is_effect_loaded(effect).await?;
        debug!("KWin isEffectLoaded({}) = {}", effect, loaded);

        if !loaded {
            return Err(waymca_error!(
                service_unavailable,
                "Эффект '{}' не загружен в KWin",
                effect
            ));
        }
        Ok(())
    }

    /// Попросить KWin перечитать настройки эффекта (он пришлёт configChanged)
    pub async fn reconfigure(&self, effect: &str) -> Result<()> {
        self.ensure_loaded(effect).await?;
        self.proxy.reconfigure_effect(effect).await?;
        info!("KWin переконфигурировал эффект '{}'", effect);
        Ok(())
    }

    /// Переключить эффект в KWin. Возвращает новое состояние
    pub async fn toggle(&self, effect: &str) -> Result<bool> {
        let enabled = self.proxy.toggle_effect(effect).await?;
        info!(
            "Эффект '{}' в KWin {}",
            effect,
            if enabled { "включён" } else { "выключен" }
        );
        Ok(enabled)
    }
}
