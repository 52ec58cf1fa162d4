use std::error::Error;
use std::fmt;

use serde::Deserialize;

use crate::types::{BlockId, Rgba};

// --- Block registry config ---

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    /// Namespace applied to bare names; `minecraft` when absent.
    #[serde(default)]
    pub default_namespace: Option<String>,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<BlockId>,
}

// --- Highlight config ---

/// One configured highlight: a block identifier and the color to draw it with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct HighlightEntry {
    pub block: String,
    pub color: Rgba,
}

impl HighlightEntry {
    pub fn new(block: impl Into<String>, color: Rgba) -> Self {
        Self {
            block: block.into(),
            color,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HighlightConfig {
    #[serde(default)]
    pub highlight: Vec<HighlightEntry>,
}

impl HighlightConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }
}

/// Colors are accepted either as a raw ARGB integer or as a hex string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Packed(u32),
    Hex(String),
}

#[derive(Debug)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}', expected #AARRGGBB or #RRGGBB", self.0)
    }
}

impl Error for ColorParseError {}

impl TryFrom<ColorValue> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Packed(v) => Ok(Rgba(v)),
            ColorValue::Hex(s) => Rgba::parse_hex(&s).ok_or(ColorParseError(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_config_accepts_both_color_forms() {
        let cfg = HighlightConfig::from_toml_str(
            r##"
            [[highlight]]
            block = "diamond_ore"
            color = "#8000FFFF"

            [[highlight]]
            block = "minecraft:gold_ore"
            color = 4294956800
        "##,
        )
        .unwrap();
        assert_eq!(cfg.highlight.len(), 2);
        assert_eq!(cfg.highlight[0].color, Rgba(0x8000_FFFF));
        assert_eq!(cfg.highlight[1].block, "minecraft:gold_ore");
        assert_eq!(cfg.highlight[1].color, Rgba(0xFFFF_D700));
    }

    #[test]
    fn bad_color_is_an_error() {
        let res = HighlightConfig::from_toml_str(
            r##"
            [[highlight]]
            block = "diamond_ore"
            color = "#12"
        "##,
        );
        assert!(res.is_err());
    }
}
