//! Temperature sensors
//!
//! Thresholds normally come from the descriptor. When the context asks for
//! hardware thresholds, the live `tempN_max`/`_min`/`_crit`/`_lcrit` values
//! are reported instead wherever they exist.

use std::sync::Arc;
use tracing::debug;

use super::{Component, Thermal, ThresholdControl, Thresholded};
use crate::constants::{prefix, scale, NOT_AVAILABLE};
use crate::context::HalContext;
use crate::desc::{Position, SensorDesc};
use crate::driver::SysfsDriver;
use crate::entry::{BoolEntry, FloatEntry, RawEntry};
use crate::error::Result;

pub struct TempSysfs {
    ctx: Arc<HalContext>,
    desc: SensorDesc,
    temp_id: u32,
    label: RawEntry,
    input: FloatEntry,
    max: FloatEntry,
    crit: FloatEntry,
    min: FloatEntry,
    lcrit: FloatEntry,
    fault: BoolEntry,
}

impl TempSysfs {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: SensorDesc,
    ) -> Result<Self> {
        let temp_id = desc.temp_id()?;
        let attr = |suffix: &str| format!("{}{}_{}", prefix::TEMP, temp_id, suffix);
        let float = |suffix: &str| FloatEntry::float(ctx, driver, attr(suffix), scale::MILLI);
        debug!(sensor = temp_id, "Creating temperature sensor");
        Ok(Self {
            ctx: Arc::clone(ctx),
            temp_id,
            label: RawEntry::raw(ctx, driver, attr("label")),
            input: float("input"),
            max: float("max"),
            crit: float("crit"),
            min: float("min"),
            lcrit: float("lcrit"),
            fault: BoolEntry::boolean(ctx, driver, attr("fault")),
            desc,
        })
    }

    pub fn desc(&self) -> &SensorDesc {
        &self.desc
    }

    /// hwmon channel index (`diode + 1`)
    pub fn temp_id(&self) -> u32 {
        self.temp_id
    }

    fn live_or(&self, entry: &FloatEntry, configured: Option<f64>) -> Option<f64> {
        if self.ctx.report_hw_thresholds() && entry.exists() {
            return entry.read();
        }
        configured
    }

    fn set_if_present(entry: &FloatEntry, value: f64) -> bool {
        if entry.exists() {
            entry.write(&value);
            return true;
        }
        false
    }
}

impl Component for TempSysfs {
    fn name(&self) -> String {
        if let Some(name) = &self.desc.name {
            return name.clone();
        }
        if self.label.exists() {
            if let Some(label) = self.label.read() {
                return label;
            }
        }
        NOT_AVAILABLE.to_string()
    }
}

impl Thresholded for TempSysfs {
    fn get_high_threshold(&self) -> Option<f64> {
        self.live_or(&self.max, self.desc.overheat)
    }

    fn get_low_threshold(&self) -> Option<f64> {
        self.live_or(&self.min, self.desc.low)
    }

    fn get_critical_threshold(&self) -> Option<f64> {
        self.live_or(&self.crit, self.desc.critical)
    }

    fn get_low_critical_threshold(&self) -> Option<f64> {
        self.live_or(&self.lcrit, self.desc.lcritical)
    }
}

impl ThresholdControl for TempSysfs {
    fn set_high_threshold(&self, value: f64) -> bool {
        Self::set_if_present(&self.max, value)
    }

    fn set_low_threshold(&self, value: f64) -> bool {
        Self::set_if_present(&self.min, value)
    }

    fn set_critical_threshold(&self, value: f64) -> bool {
        Self::set_if_present(&self.crit, value)
    }

    fn set_low_critical_threshold(&self, value: f64) -> bool {
        Self::set_if_present(&self.lcrit, value)
    }

    fn refresh_hardware_thresholds(&self) -> usize {
        let pushes: [(Option<f64>, fn(&Self, f64) -> bool); 4] = [
            (self.desc.low, Self::set_low_threshold),
            (self.desc.lcritical, Self::set_low_critical_threshold),
            (self.desc.overheat, Self::set_high_threshold),
            (self.desc.critical, Self::set_critical_threshold),
        ];
        pushes
            .into_iter()
            .filter_map(|(value, set)| value.map(|v| set(self, v)))
            .filter(|written| *written)
            .count()
    }
}

impl Thermal for TempSysfs {
    fn get_temperature(&self) -> Option<f64> {
        self.input.read()
    }

    fn get_status(&self) -> bool {
        if self.fault.exists() && self.fault.read() == Some(true) {
            return false;
        }
        true
    }

    fn get_position(&self) -> Position {
        self.desc.position
    }

    // on-board diodes cannot be removed and carry no model
    fn get_presence(&self) -> bool {
        true
    }

    fn get_model(&self) -> String {
        NOT_AVAILABLE.to_string()
    }
}
