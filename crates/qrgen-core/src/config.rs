//! Конфигурация генератора

use serde::{Deserialize, Serialize};

use crate::input::InputMode;
use crate::style::{HexColor, PixelSize};
use crate::GeneratorError;

/// Имя файла при выгрузке по умолчанию
pub const DEFAULT_EXPORT_FILE_NAME: &str = "qr-code.png";

/// Конфигурация начального состояния формы и экспорта
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Начальный режим ввода
    pub initial_mode: InputMode,
    /// Размер по умолчанию (один из 200/300/400/500/600)
    pub default_size: PixelSize,
    /// Цвет модулей
    pub default_foreground: HexColor,
    /// Цвет фона
    pub default_background: HexColor,
    /// Имя выгружаемого файла
    pub export_file_name: String,
    /// Уровень логирования для консоли браузера
    pub log_level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            initial_mode: InputMode::default(),
            default_size: PixelSize::default(),
            default_foreground: HexColor::black(),
            default_background: HexColor::white(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Загрузка из JSON; отсутствующие поля берутся по умолчанию
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| GeneratorError::Config(e.to_string()))?;

        if config.export_file_name.trim().is_empty() {
            return Err(GeneratorError::Config(
                "export_file_name must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Уровень логирования; неизвестные значения дают `Info`
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.export_file_name, "qr-code.png");
    }

    #[test]
    fn test_partial_json() {
        let config = GeneratorConfig::from_json(
            r##"{"default_size": 500, "default_foreground": "#FF0000", "initial_mode": "url"}"##,
        )
        .unwrap();
        assert_eq!(config.default_size, PixelSize::Px500);
        assert_eq!(config.default_foreground.as_str(), "#ff0000");
        assert_eq!(config.initial_mode, InputMode::Url);
        assert_eq!(config.default_background, HexColor::white());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            GeneratorConfig::from_json(r#"{"default_size": 350}"#),
            Err(GeneratorError::Config(_))
        ));
        assert!(GeneratorConfig::from_json(r#"{"default_background": "white"}"#).is_err());
        assert!(GeneratorConfig::from_json(r#"{"export_file_name": " "}"#).is_err());
    }

    #[test]
    fn test_log_level() {
        let mut config = GeneratorConfig::default();
        assert_eq!(config.log_level(), log::Level::Info);
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level(), log::Level::Debug);
        config.log_level = "loud".to_string();
        assert_eq!(config.log_level(), log::Level::Info);
    }
}
