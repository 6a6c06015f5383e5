//! Выгрузка QR-кода в PNG
//!
//! SVG сериализуется в data URI (base64), загружается обратно в растровую
//! поверхность того же размера, отрисовывается и кодируется в PNG.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_EXPORT_FILE_NAME;
use crate::form::QrForm;
use crate::render::{QrRenderer, RenderedSvg};

const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Ошибки выгрузки
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing is rendered: input is empty or invalid")]
    NothingRendered,

    #[error("Failed to render QR code: {0}")]
    Render(String),

    #[error("Not an SVG data URI")]
    InvalidDataUri,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("Cannot allocate {width}x{height} raster surface")]
    EmptySurface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// SVG в виде `data:image/svg+xml;base64,...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvgDataUri(String);

impl SvgDataUri {
    pub fn from_markup(markup: &str) -> Self {
        Self(format!("{}{}", SVG_DATA_URI_PREFIX, STANDARD.encode(markup.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Исходная разметка SVG
    pub fn decode(&self) -> Result<Vec<u8>, ExportError> {
        let encoded = self
            .0
            .strip_prefix(SVG_DATA_URI_PREFIX)
            .ok_or(ExportError::InvalidDataUri)?;
        Ok(STANDARD.decode(encoded)?)
    }
}

/// Готовый к сохранению файл
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    /// PNG
    pub bytes: Vec<u8>,
}

/// Процедура выгрузки
#[derive(Debug, Clone)]
pub struct Exporter {
    file_name: String,
    renderer: QrRenderer,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self::with_file_name(DEFAULT_EXPORT_FILE_NAME)
    }

    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            renderer: QrRenderer::new(),
        }
    }

    /// Выгрузка текущего QR-кода формы.
    ///
    /// Если гейт закрыт, возвращает [`ExportError::NothingRendered`].
    pub fn export(&self, form: &QrForm) -> Result<ExportedFile, ExportError> {
        let request = form.render_request().ok_or(ExportError::NothingRendered)?;
        let svg = self
            .renderer
            .render(&request)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        self.export_svg(&svg)
    }

    /// Выгрузка уже отрисованного SVG
    pub fn export_svg(&self, svg: &RenderedSvg) -> Result<ExportedFile, ExportError> {
        let result = self.rasterize_and_encode(svg);
        match &result {
            Ok(file) => log::info!(
                "Exported {} ({}x{}, {} bytes)",
                file.file_name,
                file.width,
                file.height,
                file.bytes.len()
            ),
            Err(e) => log::warn!("Export failed: {}", e),
        }
        result
    }

    fn rasterize_and_encode(&self, svg: &RenderedSvg) -> Result<ExportedFile, ExportError> {
        let uri = SvgDataUri::from_markup(&svg.markup);
        let raster = self.rasterize(&uri)?;
        let (width, height) = raster.dimensions();

        let mut bytes = Vec::new();
        raster.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        Ok(ExportedFile {
            file_name: self.file_name.clone(),
            mime: "image/png".to_string(),
            width,
            height,
            bytes,
        })
    }

    /// Загрузка SVG из data URI и отрисовка в поверхность его собственного размера
    pub fn rasterize(&self, uri: &SvgDataUri) -> Result<RgbaImage, ExportError> {
        let data = uri.decode()?;
        let tree = Tree::from_data(&data, &Options::default())
            .map_err(|e| ExportError::SvgParse(e.to_string()))?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        let mut pixmap =
            Pixmap::new(width, height).ok_or(ExportError::EmptySurface { width, height })?;
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        // tiny-skia хранит premultiplied RGBA
        let mut raster = RgbaImage::new(width, height);
        for (dst, src) in raster.pixels_mut().zip(pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }

        Ok(raster)
    }
}
