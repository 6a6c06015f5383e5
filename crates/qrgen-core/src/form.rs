//! Состояние формы генератора
//!
//! Единственное состояние: режим ввода, введённые данные, стиль и ошибка
//! валидации. Все обработчики синхронные.

use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::input::{derive_validity, InputMode};
use crate::render::{ErrorCorrection, ImageOverlay, RenderRequest};
use crate::style::{HexColor, PixelSize, RenderStyle};
use crate::GeneratorError;

/// Снимок состояния для отображения
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormSnapshot {
    pub mode: InputMode,
    pub raw_data: String,
    pub image_source: String,
    /// Значение поля ввода в текущем режиме
    pub input_value: String,
    pub foreground: HexColor,
    pub background: HexColor,
    pub size: u32,
    pub validation_error: Option<String>,
    pub color_pickers_visible: bool,
    pub placeholder: String,
    /// Показывать ли QR-код и кнопку выгрузки
    pub gate_open: bool,
}

/// Форма генератора QR-кодов
#[derive(Debug, Clone, Default)]
pub struct QrForm {
    mode: InputMode,
    raw_data: String,
    image_source: String,
    style: RenderStyle,
    validation_error: Option<String>,
    color_pickers_visible: bool,
}

impl QrForm {
    /// Форма с настройками по умолчанию
    pub fn new() -> Self {
        Self::default()
    }

    /// Форма с начальным состоянием из конфигурации
    pub fn with_config(config: &GeneratorConfig) -> Self {
        Self {
            mode: config.initial_mode,
            style: RenderStyle {
                foreground: config.default_foreground.clone(),
                background: config.default_background.clone(),
                size: config.default_size,
            },
            ..Self::default()
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    pub fn image_source(&self) -> &str {
        &self.image_source
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn color_pickers_visible(&self) -> bool {
        self.color_pickers_visible
    }

    /// Смена режима: данные и ошибка сбрасываются всегда
    pub fn set_mode(&mut self, mode: InputMode) {
        log::debug!("Input mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.raw_data.clear();
        self.image_source.clear();
        self.validation_error = None;
    }

    /// Значение, привязанное к полю ввода в текущем режиме
    pub fn input_value(&self) -> &str {
        match self.mode {
            InputMode::Image => &self.image_source,
            InputMode::Text | InputMode::Url => &self.raw_data,
        }
    }

    /// Изменение текста в поле ввода с повторной валидацией
    pub fn edit_input(&mut self, value: &str) {
        match self.mode {
            InputMode::Image => self.image_source = value.to_string(),
            InputMode::Text | InputMode::Url => self.raw_data = value.to_string(),
        }

        let validity = derive_validity(self.mode, value);
        if let Some(message) = &validity.message {
            log::debug!("{}", message);
        }
        self.validation_error = validity.message;
    }

    pub fn set_foreground(&mut self, color: HexColor) {
        self.style.foreground = color;
    }

    pub fn set_background(&mut self, color: HexColor) {
        self.style.background = color;
    }

    pub fn set_pixel_size(&mut self, size: PixelSize) {
        self.style.size = size;
    }

    /// Цвет из color picker'а; некорректная строка не меняет состояние
    pub fn set_foreground_hex(&mut self, hex: &str) -> Result<(), GeneratorError> {
        self.style.foreground = HexColor::parse(hex)?;
        Ok(())
    }

    pub fn set_background_hex(&mut self, hex: &str) -> Result<(), GeneratorError> {
        self.style.background = HexColor::parse(hex)?;
        Ok(())
    }

    /// Размер в пикселях; значения вне набора отклоняются
    pub fn set_pixel_size_px(&mut self, px: u32) -> Result<(), GeneratorError> {
        self.style.size = PixelSize::try_from(px)?;
        Ok(())
    }

    pub fn toggle_color_pickers(&mut self) {
        self.color_pickers_visible = !self.color_pickers_visible;
    }

    /// Кодируемые данные: URL картинки в режиме `image`, иначе введённый текст
    pub fn payload(&self) -> &str {
        self.input_value()
    }

    /// Открыт ли гейт отрисовки
    pub fn gate_open(&self) -> bool {
        !self.payload().is_empty() && self.validation_error.is_none()
    }

    /// Доступна ли выгрузка (совпадает с гейтом)
    pub fn can_export(&self) -> bool {
        self.gate_open()
    }

    /// Параметры для рендерера, если гейт открыт
    pub fn render_request(&self) -> Option<RenderRequest> {
        if !self.gate_open() {
            return None;
        }

        let overlay = match self.mode {
            InputMode::Image => {
                let side = f64::from(self.style.size.px()) / 4.0;
                Some(ImageOverlay {
                    src: self.image_source.clone(),
                    width: side,
                    height: side,
                    excavate: true,
                })
            }
            InputMode::Text | InputMode::Url => None,
        };

        Some(RenderRequest {
            payload: self.payload().to_string(),
            size: self.style.size,
            foreground: self.style.foreground.clone(),
            background: self.style.background.clone(),
            level: ErrorCorrection::High,
            overlay,
        })
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            mode: self.mode,
            raw_data: self.raw_data.clone(),
            image_source: self.image_source.clone(),
            input_value: self.input_value().to_string(),
            foreground: self.style.foreground.clone(),
            background: self.style.background.clone(),
            size: self.style.size.px(),
            validation_error: self.validation_error.clone(),
            color_pickers_visible: self.color_pickers_visible,
            placeholder: self.mode.placeholder().to_string(),
            gate_open: self.gate_open(),
        }
    }
}
