/*
 * This file is part of switchhal.
 *
 * Copyright (C) 2025 switchhal contributors
 *
 * switchhal is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * switchhal is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with switchhal. If not, see <https://www.gnu.org/licenses/>.
 */

//! Platform layout files
//!
//! A layout names the sysfs root of a platform driver and lists the
//! components it exposes. Loading one yields an [`Inventory`] of live
//! entities.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hal_core::registry::{ComponentDesc, DescKind, DescRegistry};
use hal_core::{
    ColorLed, FanDesc, FanOptions, FanSysfs, GpioDesc, GpioOptions, GpioSysfs, HalContext,
    Inventory, KernelDriver, LedDesc, LedOptions, LedRgbOptions, LedRgbSysfs, LedSysfs, ObjectId,
    Polarized, RailDesc, RawRail, ResetDesc, ResetSysfs, SensorDesc, SensorRail, SysfsDriver,
    TempSysfs,
};
use hal_error::{HalError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FanLayout {
    pub desc: FanDesc,
    #[serde(default)]
    pub options: FanOptions,
    /// Name of an LED declared in `leds` or `rgb_leds`
    #[serde(default)]
    pub led: Option<String>,
    /// Name of a GPIO declared in `gpios`
    #[serde(default)]
    pub fault_gpio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedLayout {
    pub desc: LedDesc,
    #[serde(default)]
    pub options: LedOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RgbLedLayout {
    pub desc: LedDesc,
    pub options: LedRgbOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpioLayout {
    pub desc: GpioDesc,
    #[serde(default)]
    pub options: GpioOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RailLayout {
    pub desc: RailDesc,
    /// Read the bare `_input` attributes instead of full sensor groups
    #[serde(default)]
    pub raw: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformLayout {
    pub sysfs_path: PathBuf,
    #[serde(default)]
    pub fans: Vec<FanLayout>,
    #[serde(default)]
    pub leds: Vec<LedLayout>,
    #[serde(default)]
    pub rgb_leds: Vec<RgbLedLayout>,
    /// Descriptors for sensors that need more than the defaults
    #[serde(default)]
    pub temps: Vec<SensorDesc>,
    /// Number of temperature channels; unlisted ones get default descriptors
    #[serde(default)]
    pub temp_count: Option<u32>,
    #[serde(default)]
    pub gpios: Vec<GpioLayout>,
    #[serde(default)]
    pub resets: Vec<ResetDesc>,
    #[serde(default)]
    pub rails: Vec<RailLayout>,
}

impl PlatformLayout {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HalError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Registry seeded with the sensor descriptors this layout configures
    pub fn registry(&self) -> DescRegistry {
        DescRegistry::with_descs(self.temps.iter().cloned().map(ComponentDesc::Sensor))
    }

    /// Temperature descriptors in channel order
    pub fn sensor_descs(&self) -> Vec<SensorDesc> {
        let Some(count) = self.temp_count else {
            return self.temps.clone();
        };
        let registry = self.registry();
        (1..=count)
            .filter_map(|oid| match registry.desc_for_id(DescKind::Sensors, ObjectId(oid)) {
                Some(ComponentDesc::Sensor(desc)) => Some(desc),
                _ => None,
            })
            .collect()
    }

    /// Build every entity this layout declares
    pub fn build(&self, ctx: &Arc<HalContext>) -> Result<Inventory> {
        let driver: Arc<dyn SysfsDriver> = Arc::new(KernelDriver::new(&self.sysfs_path));
        self.build_with_driver(ctx, &driver)
    }

    pub fn build_with_driver(
        &self,
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
    ) -> Result<Inventory> {
        let mut inventory = Inventory::new();

        let mut gpios: HashMap<String, Arc<dyn Polarized>> = HashMap::new();
        for layout in &self.gpios {
            let gpio: Arc<dyn Polarized> =
                Arc::new(GpioSysfs::new(ctx, driver, layout.desc.clone(), layout.options));
            gpios.insert(layout.desc.name.clone(), Arc::clone(&gpio));
            inventory.gpios.push(gpio);
        }

        let mut leds: HashMap<String, Arc<dyn ColorLed>> = HashMap::new();
        for layout in &self.leds {
            let led: Arc<dyn ColorLed> = Arc::new(LedSysfs::new(
                ctx,
                driver,
                layout.desc.clone(),
                layout.options.clone(),
            )?);
            leds.insert(layout.desc.name.clone(), Arc::clone(&led));
            inventory.leds.push(led);
        }
        for layout in &self.rgb_leds {
            let led: Arc<dyn ColorLed> = Arc::new(LedRgbSysfs::new(
                ctx,
                driver,
                layout.desc.clone(),
                layout.options.clone(),
            ));
            leds.insert(layout.desc.name.clone(), Arc::clone(&led));
            inventory.leds.push(led);
        }

        for layout in &self.fans {
            let mut fan = FanSysfs::new(ctx, driver, layout.desc.clone(), layout.options)?;
            if let Some(name) = &layout.led {
                let led = leds.get(name).ok_or_else(|| {
                    HalError::invalid_descriptor(format!(
                        "fan {} references unknown LED '{}'",
                        layout.desc.fan_id, name
                    ))
                })?;
                fan = fan.with_led(Arc::clone(led));
            }
            if let Some(name) = &layout.fault_gpio {
                let gpio = gpios.get(name).ok_or_else(|| {
                    HalError::invalid_descriptor(format!(
                        "fan {} references unknown GPIO '{}'",
                        layout.desc.fan_id, name
                    ))
                })?;
                fan = fan.with_fault_gpio(Arc::clone(gpio));
            }
            inventory.fans.push(Arc::new(fan));
        }

        for desc in self.sensor_descs() {
            inventory.temps.push(Arc::new(TempSysfs::new(ctx, driver, desc)?));
        }

        for desc in &self.resets {
            inventory
                .resets
                .push(Arc::new(ResetSysfs::new(ctx, driver, desc.clone())));
        }

        for layout in &self.rails {
            debug!(rail = layout.desc.rail_id, raw = layout.raw, "Creating rail");
            if layout.raw {
                inventory
                    .rails
                    .push(Arc::new(RawRail::new(ctx, driver, layout.desc.clone())));
            } else {
                inventory
                    .rails
                    .push(Arc::new(SensorRail::new(ctx, driver, layout.desc.clone())));
            }
        }

        info!(
            fans = inventory.fans.len(),
            leds = inventory.leds.len(),
            temps = inventory.temps.len(),
            gpios = inventory.gpios.len(),
            resets = inventory.resets.len(),
            rails = inventory.rails.len(),
            "Built inventory from {}",
            self.sysfs_path.display()
        );
        Ok(inventory)
    }
}
