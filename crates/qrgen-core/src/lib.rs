//! QR Core - Модуль генерации QR-кодов
//!
//! Библиотека для формы генератора QR-кодов:
//! - Валидация ввода для режимов text / url / image
//! - Параметры отрисовки (цвета, размер из фиксированного набора)
//! - Отрисовка в SVG через `qrcode` с вырезом под картинку
//! - Выгрузка в PNG через `resvg`

pub mod config;
pub mod export;
pub mod form;
pub mod input;
pub mod render;
pub mod style;

pub use config::{GeneratorConfig, DEFAULT_EXPORT_FILE_NAME};
pub use export::{ExportError, ExportedFile, Exporter, SvgDataUri};
pub use form::{FormSnapshot, QrForm};
pub use input::{derive_validity, validate, InputMode, Validity};
pub use render::{ErrorCorrection, Excavation, ImageOverlay, QrRenderer, RenderRequest, RenderedSvg};
pub use style::{HexColor, PixelSize, RenderStyle};

use thiserror::Error;

/// Основные ошибки модуля
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown input mode: {0}")]
    UnknownMode(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unsupported size: {0}px")]
    InvalidSize(u32),

    #[error("Failed to encode QR: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Главный генератор: форма, рендерер и выгрузка
#[derive(Debug, Clone)]
pub struct QrGenerator {
    form: QrForm,
    renderer: QrRenderer,
    exporter: Exporter,
}

impl Default for QrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl QrGenerator {
    /// Создание генератора с настройками по умолчанию
    pub fn new() -> Self {
        Self::with_config(&GeneratorConfig::default())
    }

    /// Создание генератора с пользовательскими настройками
    pub fn with_config(config: &GeneratorConfig) -> Self {
        Self {
            form: QrForm::with_config(config),
            renderer: QrRenderer::new(),
            exporter: Exporter::with_file_name(config.export_file_name.clone()),
        }
    }

    pub fn form(&self) -> &QrForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut QrForm {
        &mut self.form
    }

    /// Текущий QR-код; `None`, если гейт закрыт
    pub fn render(&self) -> Result<Option<RenderedSvg>, GeneratorError> {
        self.form
            .render_request()
            .map(|request| self.renderer.render(&request))
            .transpose()
    }

    /// Превью в виде data URI для `<img src>`
    pub fn preview_data_uri(&self) -> Result<Option<SvgDataUri>, GeneratorError> {
        Ok(self
            .render()?
            .map(|svg| SvgDataUri::from_markup(&svg.markup)))
    }

    /// Выгрузка текущего QR-кода в PNG
    pub fn export(&self) -> Result<ExportedFile, GeneratorError> {
        Ok(self.exporter.export(&self.form)?)
    }
}
