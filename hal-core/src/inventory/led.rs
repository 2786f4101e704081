//! Front-panel LEDs
//!
//! Two wirings exist: a single brightness node whose value encodes the color,
//! and three separate red/green/blue LED class devices combined into one
//! logical LED.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::{ColorLed, Component};
use crate::context::HalContext;
use crate::desc::LedDesc;
use crate::driver::SysfsDriver;
use crate::entry::{ColorEntry, IntEntry, LedColor, LedColorMap};
use crate::error::Result;

fn is_status_name(name: &str) -> bool {
    name.contains("sfp")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedOptions {
    /// `(code, color)` pairs replacing the default brightness encoding
    #[serde(default)]
    pub colors: Option<Vec<(i64, LedColor)>>,
}

/// LED whose color is selected by one brightness value
pub struct LedSysfs {
    desc: LedDesc,
    brightness: ColorEntry,
}

impl LedSysfs {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: LedDesc,
        options: LedOptions,
    ) -> Result<Self> {
        let map = match options.colors {
            Some(pairs) => LedColorMap::new(pairs)?,
            None => LedColorMap::default(),
        };
        Ok(Self {
            brightness: ColorEntry::led_color(ctx, driver, desc.name.clone(), map),
            desc,
        })
    }
}

impl Component for LedSysfs {
    fn name(&self) -> String {
        self.desc.name.clone()
    }
}

impl ColorLed for LedSysfs {
    fn get_color(&self) -> Result<Option<LedColor>> {
        self.brightness.try_read()
    }

    fn set_color(&self, color: LedColor) -> Result<bool> {
        self.brightness.try_write(&color)
    }

    fn is_status_led(&self) -> bool {
        is_status_name(&self.desc.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedRgbOptions {
    /// Leading part of the per-channel LED names: `<prefix>:<channel>:<name>`
    pub prefix: String,
}

type Rgb = (i64, i64, i64);

/// LED made of three single-color LED class devices
pub struct LedRgbSysfs {
    desc: LedDesc,
    red: IntEntry,
    green: IntEntry,
    blue: IntEntry,
    color_to_values: HashMap<LedColor, Rgb>,
    values_to_color: HashMap<Rgb, LedColor>,
}

impl LedRgbSysfs {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: LedDesc,
        options: LedRgbOptions,
    ) -> Self {
        let channel = |c: &str| {
            IntEntry::led(ctx, driver, format!("{}:{}:{}", options.prefix, c, desc.name))
        };
        let color_to_values = HashMap::from([
            (LedColor::Off, (0, 0, 0)),
            (LedColor::Red, (1, 0, 0)),
            (LedColor::Green, (0, 1, 0)),
            (LedColor::Blue, (0, 0, 1)),
            (LedColor::Amber, (1, 1, 0)),
        ]);
        let values_to_color = color_to_values.iter().map(|(c, v)| (*v, *c)).collect();
        Self {
            red: channel("red"),
            green: channel("green"),
            blue: channel("blue"),
            desc,
            color_to_values,
            values_to_color,
        }
    }

    fn channels(&self) -> [&IntEntry; 3] {
        [&self.red, &self.green, &self.blue]
    }

    fn channel_value(entry: &IntEntry) -> Option<i64> {
        if entry.exists() {
            entry.read()
        } else {
            Some(0)
        }
    }
}

impl Component for LedRgbSysfs {
    fn name(&self) -> String {
        self.desc.name.clone()
    }
}

impl ColorLed for LedRgbSysfs {
    /// `Ok(None)` when the channels show a combination with no name
    fn get_color(&self) -> Result<Option<LedColor>> {
        let [r, g, b] = self.channels().map(Self::channel_value);
        let values = match (r, g, b) {
            (Some(r), Some(g), Some(b)) => (r, g, b),
            _ => return Ok(None),
        };
        Ok(self.values_to_color.get(&values).copied())
    }

    fn set_color(&self, color: LedColor) -> Result<bool> {
        let (r, g, b) = self.color_to_values.get(&color).copied().unwrap_or((0, 0, 0));
        for (entry, value) in self.channels().into_iter().zip([r, g, b]) {
            if entry.exists() {
                entry.write(&value);
            }
        }
        Ok(true)
    }

    fn is_status_led(&self) -> bool {
        is_status_name(&self.desc.name)
    }
}
