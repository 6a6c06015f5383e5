//! Модуль отрисовки QR-кода в SVG
//!
//! Кодирование символа выполняет крейт `qrcode`, здесь только построение
//! разметки: фон, модули, центральная картинка с вырезом модулей под ней.

use std::fmt::{self, Write as _};

use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::style::{HexColor, PixelSize};
use crate::GeneratorError;

/// Уровень коррекции ошибок.
///
/// Поддерживается только максимальный уровень, он выдерживает вырез под картинку.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCorrection {
    #[default]
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Картинка поверх QR-кода
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageOverlay {
    /// URL картинки
    pub src: String,
    /// Ширина в пикселях
    pub width: f64,
    /// Высота в пикселях
    pub height: f64,
    /// Убирать модули под картинкой
    pub excavate: bool,
}

/// Запрос на отрисовку
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderRequest {
    /// Кодируемые данные
    pub payload: String,
    pub size: PixelSize,
    pub foreground: HexColor,
    pub background: HexColor,
    pub level: ErrorCorrection,
    pub overlay: Option<ImageOverlay>,
}

/// Область вырезанных модулей (в модулях)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excavation {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Excavation {
    fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Результат отрисовки
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSvg {
    /// SVG-разметка
    pub markup: String,
    /// Ширина в пикселях
    pub width: u32,
    /// Высота в пикселях
    pub height: u32,
    /// Число модулей по стороне
    pub modules: usize,
    pub excavation: Option<Excavation>,
}

/// Положение картинки в координатах модулей
struct OverlayBox {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    excavation: Option<Excavation>,
}

impl OverlayBox {
    fn compute(overlay: &ImageOverlay, size: u32, modules: usize) -> Self {
        let scale = modules as f64 / size as f64;
        let w = overlay.width * scale;
        let h = overlay.height * scale;
        let x = (modules as f64 - w) / 2.0;
        let y = (modules as f64 - h) / 2.0;

        let excavation = overlay.excavate.then(|| {
            let floor_x = x.floor();
            let floor_y = y.floor();
            Excavation {
                x: floor_x as usize,
                y: floor_y as usize,
                w: (w + x - floor_x).ceil() as usize,
                h: (h + y - floor_y).ceil() as usize,
            }
        });

        Self {
            x,
            y,
            w,
            h,
            excavation,
        }
    }
}

/// Рендерер QR-кода
#[derive(Debug, Default, Clone, Copy)]
pub struct QrRenderer;

impl QrRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Кодирование данных и построение SVG
    pub fn render(&self, request: &RenderRequest) -> Result<RenderedSvg, GeneratorError> {
        let code = QrCode::with_error_correction_level(
            request.payload.as_bytes(),
            request.level.ec_level(),
        )
        .map_err(|e| GeneratorError::Encode(e.to_string()))?;

        let modules = code.width();
        let size = request.size.px();
        log::info!(
            "Rendering QR: {} bytes, {}x{} modules, {}px",
            request.payload.len(),
            modules,
            modules,
            size
        );

        let overlay = request
            .overlay
            .as_ref()
            .map(|overlay| (overlay, OverlayBox::compute(overlay, size, modules)));
        let excavation = overlay.as_ref().and_then(|(_, bbox)| bbox.excavation);

        let mut path = String::new();
        let mut markup = String::new();
        write_module_path(&mut path, &code, excavation)
            .and_then(|()| {
                write_svg(
                    &mut markup,
                    request,
                    modules,
                    &path,
                    overlay.as_ref().map(|(o, bbox)| (*o, bbox)),
                )
            })
            .map_err(|e| GeneratorError::Encode(e.to_string()))?;

        Ok(RenderedSvg {
            markup,
            width: size,
            height: size,
            modules,
            excavation,
        })
    }
}

/// Тёмные модули построчно, соседние объединяются в один отрезок
fn write_module_path(
    out: &mut String,
    code: &QrCode,
    excavation: Option<Excavation>,
) -> fmt::Result {
    let modules = code.width();
    for y in 0..modules {
        let mut run_start: Option<usize> = None;
        for x in 0..=modules {
            let dark = x < modules
                && code[(x, y)] == qrcode::Color::Dark
                && !excavation.is_some_and(|e| e.contains(x, y));

            match (dark, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    write!(out, "M{} {}h{}v1H{}z", start, y, x - start, start)?;
                    run_start = None;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn write_svg(
    out: &mut String,
    request: &RenderRequest,
    modules: usize,
    path: &str,
    overlay: Option<(&ImageOverlay, &OverlayBox)>,
) -> fmt::Result {
    let size = request.size.px();
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" height="{size}" width="{size}" viewBox="0 0 {modules} {modules}">"#
    )?;
    write!(
        out,
        r#"<path fill="{}" d="M0,0 h{modules}v{modules}H0z" shape-rendering="crispEdges"/>"#,
        request.background
    )?;
    write!(
        out,
        r#"<path fill="{}" d="{}" shape-rendering="crispEdges"/>"#,
        request.foreground, path
    )?;
    if let Some((overlay, bbox)) = overlay {
        write!(
            out,
            r#"<image href="{}" height="{}" width="{}" x="{}" y="{}" preserveAspectRatio="none"/>"#,
            escape_attr(&overlay.src),
            bbox.h,
            bbox.w,
            bbox.x,
            bbox.y
        )?;
    }
    out.push_str("</svg>");
    Ok(())
}

/// Экранирование значения атрибута XML
fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
