use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор окна, выданный хостом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Информация об окне в том виде, в котором её отдаёт хост.
///
/// `window_class` хранится так же, как в KWin: "<resource name> <resource class>",
/// например "konsole org.kde.konsole". Значения по умолчанию описывают обычное
/// управляемое видимое окно с декорацией.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowInfo {
    pub id: WindowId,
    pub window_class: String,
    pub caption: String,
    pub has_decoration: bool,
    pub on_all_desktops: bool,
    pub popup_window: bool,
    pub lock_screen: bool,
    pub outline: bool,
    pub managed: bool,
    pub visible: bool,
    pub deleted: bool,
    pub normal_window: bool,
    pub dialog: bool,
}

impl Default for WindowInfo {
    fn default() -> Self {
        Self {
            id: WindowId::default(),
            window_class: String::new(),
            caption: String::new(),
            has_decoration: true,
            on_all_desktops: false,
            popup_window: false,
            lock_screen: false,
            outline: false,
            managed: true,
            visible: true,
            deleted: false,
            normal_window: true,
            dialog: false,
        }
    }
}

impl WindowInfo {
    pub fn new(id: u64, window_class: impl Into<String>) -> Self {
        Self {
            id: WindowId(id),
            window_class: window_class.into(),
            ..Self::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_decoration(mut self, has_decoration: bool) -> Self {
        self.has_decoration = has_decoration;
        self
    }

    #[cfg(test)]
    pub fn on_all_desktops(mut self, on_all_desktops: bool) -> Self {
        self.on_all_desktops = on_all_desktops;
        self
    }

    /// Всплывающее окно: подсказка, меню, выпадающий список
    pub fn as_popup(mut self) -> Self {
        self.popup_window = true;
        self.normal_window = false;
        self
    }

    pub fn as_dialog(mut self) -> Self {
        self.dialog = true;
        self.normal_window = false;
        self
    }

    #[cfg(test)]
    pub fn as_lock_screen(mut self) -> Self {
        self.lock_screen = true;
        self
    }

    #[cfg(test)]
    pub fn as_outline(mut self) -> Self {
        self.outline = true;
        self
    }

    /// Окно без типа normal/dialog (панели, доки, уведомления)
    pub fn as_special(mut self) -> Self {
        self.normal_window = false;
        self.dialog = false;
        self
    }

    #[cfg(test)]
    pub fn with_managed(mut self, managed: bool) -> Self {
        self.managed = managed;
        self
    }

    #[cfg(test)]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[cfg(test)]
    pub fn mark_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.caption.is_empty() {
            write!(f, "{} [{}]", self.id, self.window_class)
        } else {
            write!(f, "{} \"{}\" [{}]", self.id, self.caption, self.window_class)
        }
    }
}

/// События, которые хост доставляет контроллеру эффекта
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Пользователь изменил настройки эффекта
    ConfigChanged,
    WindowAdded(WindowInfo),
    WindowClosed(WindowInfo),
    /// Глобальное действие "Toggle WayMCA Effect"
    ToggleRequested,
}

impl HostEvent {
    pub fn event_type(&self) -> HostEventType {
        match self {
            HostEvent::ConfigChanged => HostEventType::ConfigChanged,
            HostEvent::WindowAdded(_) => HostEventType::WindowAdded,
            HostEvent::WindowClosed(_) => HostEventType::WindowClosed,
            HostEvent::ToggleRequested => HostEventType::ToggleRequested,
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::WindowAdded(window) | HostEvent::WindowClosed(window) => {
                write!(f, "{:?}: {}", self.event_type(), window)
            }
            _ => write!(f, "{:?}", self.event_type()),
        }
    }
}

/// Тип события хоста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventType {
    ConfigChanged,
    WindowAdded,
    WindowClosed,
    ToggleRequested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_info_defaults_describe_normal_window() {
        let window = WindowInfo::new(7, "konsole org.kde.konsole").with_caption("Konsole");

        assert_eq!(window.id, WindowId(7));
        assert!(window.has_decoration);
        assert!(window.managed);
        assert!(window.visible);
        assert!(window.normal_window);
        assert!(!window.dialog);
        assert!(!window.deleted);
    }

    #[test]
    fn test_window_type_builders() {
        let popup = WindowInfo::new(1, "firefox firefox").as_popup();
        assert!(popup.popup_window);
        assert!(!popup.normal_window);

        let dialog = WindowInfo::new(2, "kate org.kde.kate").as_dialog();
        assert!(dialog.dialog);
        assert!(!dialog.normal_window);

        let dock = WindowInfo::new(3, "latte-dock latte-dock").as_special();
        assert!(!dock.dialog && !dock.normal_window);
    }

    #[test]
    fn test_host_event_display() {
        let window = WindowInfo::new(0x2a, "kate org.kde.kate").with_caption("notes.txt");
        let event = HostEvent::WindowAdded(window);

        assert_eq!(event.event_type(), HostEventType::WindowAdded);
        assert_eq!(
            event.to_string(),
            "WindowAdded: 0x2a \"notes.txt\" [kate org.kde.kate]"
        );
        assert_eq!(HostEvent::ConfigChanged.to_string(), "ConfigChanged");
    }
}
