//! WASM bindings для генератора QR-кодов
//!
//! Предоставляет JavaScript API формы: обработчики ввода, SVG для
//! отображения и выгрузку PNG через "Сохранить как" браузера.

use qrgen_core::{GeneratorConfig, InputMode, PixelSize, QrGenerator};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Инициализация panic hook и логирования в консоль
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging(log::Level::Info);
    log::info!("QR Generator WASM module initialized");
}

fn init_logging(level: log::Level) {
    // Повторная инициализация логгера возвращает ошибку, уровень просто обновляем
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// JavaScript-доступная форма генератора
#[wasm_bindgen(js_name = QrForm)]
pub struct WasmQrForm {
    generator: QrGenerator,
}

#[wasm_bindgen(js_class = QrForm)]
impl WasmQrForm {
    /// Создание формы с настройками по умолчанию
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            generator: QrGenerator::new(),
        }
    }

    /// Создание формы с настройками из JSON
    ///
    /// @param config_json - например `{"default_size": 400, "log_level": "debug"}`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmQrForm, JsError> {
        let config = GeneratorConfig::from_json(config_json).map_err(js_error)?;
        init_logging(config.log_level());

        Ok(Self {
            generator: QrGenerator::with_config(&config),
        })
    }

    /// Смена режима ввода: "text", "url" или "image"
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsError> {
        let mode: InputMode = mode.parse().map_err(js_error)?;
        self.generator.form_mut().set_mode(mode);
        Ok(())
    }

    /// Обработчик изменения поля ввода
    #[wasm_bindgen(js_name = editInput)]
    pub fn edit_input(&mut self, value: &str) {
        self.generator.form_mut().edit_input(value);
    }

    /// Цвет модулей из color picker'а (hex)
    #[wasm_bindgen(js_name = setForeground)]
    pub fn set_foreground(&mut self, hex: &str) -> Result<(), JsError> {
        self.generator
            .form_mut()
            .set_foreground_hex(hex)
            .map_err(js_error)
    }

    /// Цвет фона из color picker'а (hex)
    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&mut self, hex: &str) -> Result<(), JsError> {
        self.generator
            .form_mut()
            .set_background_hex(hex)
            .map_err(js_error)
    }

    /// Размер в пикселях, один из `sizes()`
    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, px: u32) -> Result<(), JsError> {
        self.generator
            .form_mut()
            .set_pixel_size_px(px)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = toggleColorPickers)]
    pub fn toggle_color_pickers(&mut self) {
        self.generator.form_mut().toggle_color_pickers();
    }

    /// Снимок состояния формы
    ///
    /// @returns Object с полями mode, validation_error, gate_open и т.д.
    pub fn state(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.generator.form().snapshot()).map_err(js_error)
    }

    /// Можно ли показывать QR-код и кнопку выгрузки
    #[wasm_bindgen(js_name = canExport)]
    pub fn can_export(&self) -> bool {
        self.generator.form().can_export()
    }

    /// SVG-разметка текущего QR-кода или `undefined`, если гейт закрыт
    #[wasm_bindgen(js_name = renderSvg)]
    pub fn render_svg(&self) -> Result<Option<String>, JsError> {
        let svg = self.generator.render().map_err(js_error)?;
        Ok(svg.map(|svg| svg.markup))
    }

    /// Data URI для `<img src>` или `undefined`
    #[wasm_bindgen(js_name = previewDataUri)]
    pub fn preview_data_uri(&self) -> Result<Option<String>, JsError> {
        let uri = self.generator.preview_data_uri().map_err(js_error)?;
        Ok(uri.map(|uri| uri.as_str().to_string()))
    }

    /// PNG текущего QR-кода
    ///
    /// @returns Uint8Array
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self) -> Result<js_sys::Uint8Array, JsError> {
        let file = self.generator.export().map_err(js_error)?;
        Ok(js_sys::Uint8Array::from(file.bytes.as_slice()))
    }

    /// Выгрузка PNG через диалог сохранения браузера
    ///
    /// Ошибка возвращается в JS, чтобы страница могла показать уведомление.
    pub fn download(&self) -> Result<(), JsError> {
        let file = self.generator.export().map_err(|e| {
            log::warn!("Download aborted: {}", e);
            js_error(e)
        })?;
        save_file(&file.file_name, &file.bytes, &file.mime).map_err(|e| {
            let message = e.as_string().unwrap_or_else(|| format!("{:?}", e));
            log::warn!("Save action failed: {}", message);
            JsError::new(&message)
        })
    }
}

impl Default for WasmQrForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Задержка перед освобождением blob URL: загрузка должна успеть прочитать его
const REVOKE_DELAY_MS: i32 = 40_000;

/// Запуск "Сохранить как": Blob + временная ссылка с атрибутом download
fn save_file(file_name: &str, bytes: &[u8], mime: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    revoke_later(&window, url)?;
    log::info!("Save dialog triggered for {}", file_name);
    Ok(())
}

/// Освобождение blob URL по таймеру, после того как браузер начал загрузку
fn revoke_later(window: &web_sys::Window, url: String) -> Result<(), JsValue> {
    let revoke = Closure::once_into_js(move || {
        if let Err(e) = web_sys::Url::revoke_object_url(&url) {
            log::warn!("Failed to revoke {}: {:?}", url, e);
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        revoke.unchecked_ref(),
        REVOKE_DELAY_MS,
    )?;
    Ok(())
}

/// Проверка строки для режима без создания формы
#[wasm_bindgen]
pub fn validate(mode: &str, value: &str) -> Result<bool, JsError> {
    let mode: InputMode = mode.parse().map_err(js_error)?;
    Ok(qrgen_core::validate(mode, value))
}

/// Допустимые размеры в пикселях
#[wasm_bindgen]
pub fn sizes() -> Vec<u32> {
    PixelSize::ALL.iter().map(|size| size.px()).collect()
}

/// Информация о версии
#[wasm_bindgen(js_name = version)]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_form_creation() {
        let form = WasmQrForm::new();
        assert!(!form.can_export());
        assert!(form.render_svg().unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn test_render_after_input() {
        let mut form = WasmQrForm::new();
        form.set_mode("url").unwrap();
        form.edit_input("https://example.com");
        assert!(form.can_export());

        let svg = form.render_svg().unwrap().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(form.export_png().unwrap().length() > 0);
    }

    #[wasm_bindgen_test]
    fn test_download_leaves_no_anchor_behind() {
        let mut form = WasmQrForm::new();
        form.edit_input("hello");
        assert!(form.download().is_ok());

        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .unwrap();
        assert!(body.query_selector("a[download]").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn test_download_with_closed_gate_fails() {
        let form = WasmQrForm::new();
        assert!(form.download().is_err());
    }

    #[wasm_bindgen_test]
    fn test_free_functions() {
        assert!(validate("text", "hello").unwrap());
        assert!(!validate("url", "example.com").unwrap());
        assert_eq!(sizes(), vec![200, 300, 400, 500, 600]);
        assert!(!version().is_empty());
    }
}
