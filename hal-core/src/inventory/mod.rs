//! Device-level inventory objects
//!
//! Each entity composes sysfs entries into the behavior of one physical
//! component. Capabilities are split into narrow traits so an entity only
//! implements what its hardware can do.

pub mod fan;
pub mod gpio;
pub mod led;
pub mod reset;
pub mod temp;

use std::fmt;
use std::sync::Arc;

use crate::desc::Position;
use crate::entry::LedColor;
use crate::error::Result;
use crate::rail::PowerRail;

pub use fan::{speed_transition, FanOptions, FanSysfs, SpeedTransition};
pub use gpio::{GpioOptions, GpioSysfs};
pub use led::{LedOptions, LedRgbOptions, LedRgbSysfs, LedSysfs};
pub use reset::ResetSysfs;
pub use temp::TempSysfs;

pub trait Component {
    fn name(&self) -> String;
}

/// Read-side limits of a measured value
pub trait Thresholded {
    fn get_high_threshold(&self) -> Option<f64>;
    fn get_low_threshold(&self) -> Option<f64>;
    fn get_critical_threshold(&self) -> Option<f64>;
    fn get_low_critical_threshold(&self) -> Option<f64>;
}

/// Limits that can be pushed to hardware. Each setter returns whether the
/// backing node existed and a write was issued.
pub trait ThresholdControl: Thresholded {
    fn set_high_threshold(&self, value: f64) -> bool;
    fn set_low_threshold(&self, value: f64) -> bool;
    fn set_critical_threshold(&self, value: f64) -> bool;
    fn set_low_critical_threshold(&self, value: f64) -> bool;

    /// Write every configured threshold; returns how many were issued
    fn refresh_hardware_thresholds(&self) -> usize;
}

/// A bit whose logical state depends on its polarity
pub trait Polarized: Component + Send + Sync {
    fn is_active_low(&self) -> bool;
    fn is_active(&self) -> bool;
    fn set_active(&self, active: bool) -> bool;
}

pub trait ColorLed: Component + Send + Sync {
    fn get_color(&self) -> Result<Option<LedColor>>;
    fn set_color(&self, color: LedColor) -> Result<bool>;
    fn is_status_led(&self) -> bool;
}

pub trait FanControl: Component + Send + Sync {
    fn get_id(&self) -> u32;
    fn get_model(&self) -> Option<String>;
    fn get_position(&self) -> String;

    /// Speed in percent of full scale
    fn get_speed(&self) -> Option<u32>;
    fn set_speed(&self, speed: u32) -> bool;
    fn get_rpm(&self) -> Option<u32>;
    fn get_fault(&self) -> bool;
    fn get_presence(&self) -> bool;
    fn get_direction(&self) -> Option<String>;
    fn get_led(&self) -> Option<Arc<dyn ColorLed>>;

    fn get_status(&self) -> bool {
        self.get_presence() && !self.get_fault()
    }
}

pub trait Thermal: Component + ThresholdControl + Send + Sync {
    /// Degrees Celsius
    fn get_temperature(&self) -> Option<f64>;
    fn get_status(&self) -> bool;
    fn get_position(&self) -> Position;
    fn get_presence(&self) -> bool;
    fn get_model(&self) -> String;
}

pub trait ResetLine: Component + Send + Sync {
    fn read(&self) -> Option<bool>;
    fn reset_in(&self) -> bool;
    fn reset_out(&self) -> bool;
}

/// All entities of one platform, grouped by kind
#[derive(Default)]
pub struct Inventory {
    pub fans: Vec<Arc<dyn FanControl>>,
    pub leds: Vec<Arc<dyn ColorLed>>,
    pub temps: Vec<Arc<dyn Thermal>>,
    pub gpios: Vec<Arc<dyn Polarized>>,
    pub resets: Vec<Arc<dyn ResetLine>>,
    pub rails: Vec<Arc<dyn PowerRail>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fan(&self, id: u32) -> Option<&Arc<dyn FanControl>> {
        self.fans.iter().find(|f| f.get_id() == id)
    }

    pub fn gpio(&self, name: &str) -> Option<&Arc<dyn Polarized>> {
        self.gpios.iter().find(|g| g.name() == name)
    }

    pub fn led(&self, name: &str) -> Option<&Arc<dyn ColorLed>> {
        self.leds.iter().find(|l| l.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fans.len()
            + self.leds.len()
            + self.temps.len()
            + self.gpios.len()
            + self.resets.len()
            + self.rails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inventory")
            .field("fans", &self.fans.len())
            .field("leds", &self.leds.len())
            .field("temps", &self.temps.len())
            .field("gpios", &self.gpios.len())
            .field("resets", &self.resets.len())
            .field("rails", &self.rails.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::HalContext;
    use crate::desc::SensorDesc;
    use crate::driver::{KernelDriver, SysfsDriver};

    #[test]
    fn test_debug_prints_counts() {
        let driver: Arc<dyn SysfsDriver> = Arc::new(KernelDriver::new("/nonexistent"));
        let ctx = HalContext::simulated();
        let mut inventory = Inventory::new();
        assert!(inventory.is_empty());
        for diode in 0..2 {
            let temp = TempSysfs::new(&ctx, &driver, SensorDesc::new(diode)).unwrap();
            inventory.temps.push(Arc::new(temp));
        }
        assert_eq!(inventory.len(), 2);
        assert_eq!(
            format!("{:?}", inventory),
            "Inventory { fans: 0, leds: 0, temps: 2, gpios: 0, resets: 0, rails: 0 }"
        );
    }
}
