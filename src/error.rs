use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaymcaError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Некорректное описание окна: {0}")]
    InvalidWindow(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, WaymcaError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! waymca_error {
    (invalid_window, $($arg:tt)*) => {
        $crate::error::WaymcaError::InvalidWindow(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::WaymcaError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::WaymcaError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_macro() {
        let err = waymca_error!(internal, "контроллер остановился ({})", 3);
        assert!(matches!(err, WaymcaError::Internal(ref message) if message == "контроллер остановился (3)"));
        assert_eq!(err.to_string(), "Внутренняя ошибка: контроллер остановился (3)");
    }

    #[test]
    fn test_service_unavailable_converts_to_anyhow() {
        let err: anyhow::Error = waymca_error!(service_unavailable, "KWin").into();
        assert_eq!(err.to_string(), "Сервис недоступен: KWin");
    }
}
