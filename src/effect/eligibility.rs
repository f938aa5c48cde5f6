//! Решение о том, применять ли эффект к окну.
//!
//! Функция чистая: смотрит только на свойства окна и не обращается к хосту.
//! Правила проверяются по порядку, первое сработавшее определяет результат,
//! поэтому более поздние правила полагаются на то, что ранние уже отсеяли
//! всплывающие окна и служебные оверлеи.

use crate::events::WindowInfo;

/// Spectacle должен оставаться вне собственных скриншотов
pub const BLACKLIST: [&str; 2] = [
    "spectacle spectacle",         // x11
    "spectacle org.kde.spectacle", // wayland
];

const PLASMASHELL_CLASSES: [&str; 2] = [
    "plasmashell plasmashell",
    "plasmashell org.kde.plasmashell",
];

pub fn is_blacklisted(window_class: &str) -> bool {
    BLACKLIST.contains(&window_class)
}

pub fn should_apply(window: Option<&WindowInfo>) -> bool {
    let Some(window) = window else {
        return false;
    };

    if is_blacklisted(&window.window_class) {
        return false;
    }

    // Alt+Tab и похожие оверлеи
    if !window.has_decoration && window.on_all_desktops {
        return false;
    }

    // Подсказки, меню, выпадающие списки
    if window.popup_window {
        return false;
    }

    if window.lock_screen || window.outline {
        return false;
    }

    if !window.managed || !window.visible || window.deleted {
        return false;
    }

    // От plasmashell берём только настоящие диалоги с декорацией
    if PLASMASHELL_CLASSES.contains(&window.window_class.as_str()) {
        return window.has_decoration;
    }

    window.normal_window || window.dialog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(class: &str) -> WindowInfo {
        WindowInfo::new(1, class)
    }

    #[test]
    fn test_absent_window_is_ineligible() {
        assert!(!should_apply(None));
    }

    #[test]
    fn test_normal_window_and_dialog_are_eligible() {
        assert!(should_apply(Some(&normal("konsole org.kde.konsole"))));
        assert!(should_apply(Some(&normal("kate org.kde.kate").as_dialog())));
    }

    #[test]
    fn test_blacklisted_classes_never_apply() {
        for class in BLACKLIST {
            let window = normal(class);
            assert!(window.normal_window && window.has_decoration);
            assert!(!should_apply(Some(&window)), "{} must be blacklisted", class);
        }
    }

    #[test]
    fn test_undecorated_window_on_all_desktops_is_ineligible() {
        let switcher = normal("kwin kwin").with_decoration(false).on_all_desktops(true);
        assert!(!should_apply(Some(&switcher)));

        // Любое из двух условий по отдельности не исключает окно
        let sticky = normal("kwrite org.kde.kwrite").on_all_desktops(true);
        assert!(should_apply(Some(&sticky)));
        let borderless = normal("mpv mpv").with_decoration(false);
        assert!(should_apply(Some(&borderless)));
    }

    #[test]
    fn test_popups_and_compositor_overlays_are_ineligible() {
        assert!(!should_apply(Some(&normal("firefox firefox").as_popup())));
        assert!(!should_apply(Some(&normal("kscreenlocker_greet kscreenlocker_greet").as_lock_screen())));
        assert!(!should_apply(Some(&normal("kwin kwin").as_outline())));
    }

    #[test]
    fn test_unmanaged_hidden_or_deleted_is_ineligible() {
        assert!(!should_apply(Some(&normal("xterm xterm").with_managed(false))));
        assert!(!should_apply(Some(&normal("xterm xterm").with_visible(false))));
        assert!(!should_apply(Some(&normal("xterm xterm").mark_deleted())));
    }

    #[test]
    fn test_plasmashell_depends_only_on_decoration() {
        for class in PLASMASHELL_CLASSES {
            let panel = normal(class).with_decoration(false).as_special();
            assert!(!should_apply(Some(&panel)));

            let undecorated = normal(class).with_decoration(false);
            assert!(!should_apply(Some(&undecorated)));

            // Декорированное окно plasmashell подходит даже без типа normal/dialog
            let dialog = normal(class).as_special();
            assert!(should_apply(Some(&dialog)));
        }
    }

    #[test]
    fn test_special_window_types_are_ineligible() {
        let dock = normal("latte-dock latte-dock").as_special();
        assert!(!should_apply(Some(&dock)));
    }

    #[test]
    fn test_decision_is_deterministic() {
        let window = normal("dolphin org.kde.dolphin");
        let before = window.clone();

        assert_eq!(should_apply(Some(&window)), should_apply(Some(&window)));
        assert_eq!(window, before);
    }
}
