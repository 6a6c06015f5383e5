//! Модуль валидации ввода
//!
//! Правила проверки строки ввода для каждого режима:
//! - `text` — непустая строка после обрезки пробелов
//! - `url`, `image` — абсолютный URL (парсер WHATWG, как `new URL()` в браузере)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeneratorError;

/// Режим ввода
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Text,
    Url,
    Image,
}

impl InputMode {
    /// Все режимы в порядке отображения
    pub const ALL: [InputMode; 3] = [InputMode::Text, InputMode::Url, InputMode::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Text => "text",
            InputMode::Url => "url",
            InputMode::Image => "image",
        }
    }

    /// Подсказка для поля ввода
    pub fn placeholder(self) -> &'static str {
        match self {
            InputMode::Text => "Enter text",
            InputMode::Url => "Enter URL",
            InputMode::Image => "Enter Image URL",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| GeneratorError::UnknownMode(s.to_string()))
    }
}

/// Результат проверки ввода
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity {
    pub is_valid: bool,
    /// Сообщение для пользователя, если ввод некорректен
    pub message: Option<String>,
}

/// Проверка значения для режима.
///
/// Пустая строка некорректна в любом режиме, в том числе `image`.
pub fn validate(mode: InputMode, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }

    match mode {
        InputMode::Text => !value.trim_matches(is_js_whitespace).is_empty(),
        InputMode::Url | InputMode::Image => url::Url::parse(value).is_ok(),
    }
}

/// Пробельные символы в смысле `String.prototype.trim`: U+FEFF входит, U+0085 нет
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Проверка значения с сообщением об ошибке
pub fn derive_validity(mode: InputMode, value: &str) -> Validity {
    if validate(mode, value) {
        Validity {
            is_valid: true,
            message: None,
        }
    } else {
        Validity {
            is_valid: false,
            message: Some(format!("Invalid {} input", mode)),
        }
    }
}
