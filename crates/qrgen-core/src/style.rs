//! Параметры отрисовки: цвета и размер QR-кода

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GeneratorError;

/// Цвет в формате `#rrggbb` (всегда в нижнем регистре)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    /// Разбор `#rgb` или `#rrggbb`
    pub fn parse(input: &str) -> Result<Self, GeneratorError> {
        let invalid = || GeneratorError::InvalidColor(input.to_string());

        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let normalized = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        Ok(Self(format!("#{}", normalized.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = GeneratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

/// Размер QR-кода в пикселях из фиксированного набора
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PixelSize {
    Px200,
    #[default]
    Px300,
    Px400,
    Px500,
    Px600,
}

impl PixelSize {
    /// Допустимые размеры в порядке возрастания
    pub const ALL: [PixelSize; 5] = [
        PixelSize::Px200,
        PixelSize::Px300,
        PixelSize::Px400,
        PixelSize::Px500,
        PixelSize::Px600,
    ];

    pub fn px(self) -> u32 {
        match self {
            PixelSize::Px200 => 200,
            PixelSize::Px300 => 300,
            PixelSize::Px400 => 400,
            PixelSize::Px500 => 500,
            PixelSize::Px600 => 600,
        }
    }

    /// Подпись для выпадающего списка, например `300x300 px`
    pub fn label(self) -> String {
        format!("{0}x{0} px", self.px())
    }
}

impl TryFrom<u32> for PixelSize {
    type Error = GeneratorError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PixelSize::ALL
            .into_iter()
            .find(|size| size.px() == value)
            .ok_or(GeneratorError::InvalidSize(value))
    }
}

impl From<PixelSize> for u32 {
    fn from(size: PixelSize) -> Self {
        size.px()
    }
}

/// Параметры стиля, передаваемые рендереру
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub foreground: HexColor,
    pub background: HexColor,
    pub size: PixelSize,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            foreground: HexColor::black(),
            background: HexColor::white(),
            size: PixelSize::default(),
        }
    }
}
