//! LED colors and their register encodings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{HalError, Result};

/// Closed set of colors a front-panel LED can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Off,
    Red,
    Green,
    Blue,
    Amber,
}

impl LedColor {
    pub const ALL: [LedColor; 5] = [
        LedColor::Off,
        LedColor::Red,
        LedColor::Green,
        LedColor::Blue,
        LedColor::Amber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedColor::Off => "off",
            LedColor::Red => "red",
            LedColor::Green => "green",
            LedColor::Blue => "blue",
            LedColor::Amber => "amber",
        }
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bijection between brightness codes and colors for single-node LEDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedColorMap {
    code_to_color: BTreeMap<i64, LedColor>,
    color_to_code: BTreeMap<LedColor, i64>,
}

impl LedColorMap {
    /// Build a map from `(code, color)` pairs. Every code and every color may
    /// appear at most once.
    pub fn new(pairs: impl IntoIterator<Item = (i64, LedColor)>) -> Result<Self> {
        let mut code_to_color = BTreeMap::new();
        let mut color_to_code = BTreeMap::new();
        for (code, color) in pairs {
            if code_to_color.insert(code, color).is_some() {
                return Err(HalError::DuplicateMapping(format!("code {}", code)));
            }
            if color_to_code.insert(color, code).is_some() {
                return Err(HalError::DuplicateMapping(format!("color {}", color)));
            }
        }
        Ok(Self {
            code_to_color,
            color_to_code,
        })
    }

    pub fn color(&self, code: i64) -> Option<LedColor> {
        self.code_to_color.get(&code).copied()
    }

    pub fn code(&self, color: LedColor) -> Option<i64> {
        self.color_to_code.get(&color).copied()
    }

    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.code_to_color.keys().copied()
    }
}

impl Default for LedColorMap {
    fn default() -> Self {
        let code_to_color = BTreeMap::from([
            (0, LedColor::Off),
            (1, LedColor::Green),
            (2, LedColor::Red),
            (3, LedColor::Amber),
        ]);
        let color_to_code = code_to_color.iter().map(|(k, v)| (*v, *k)).collect();
        Self {
            code_to_color,
            color_to_code,
        }
    }
}
