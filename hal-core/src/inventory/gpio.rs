//! Named GPIO bits exported by a driver as flat sysfs files

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::{Component, Polarized};
use crate::context::HalContext;
use crate::desc::GpioDesc;
use crate::driver::SysfsDriver;
use crate::entry::{sysfs_resolver, BoolCodec, BoolEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpioOptions {
    /// The driver already inverts active-low bits, so the file reads
    /// active-high regardless of the descriptor
    #[serde(default)]
    pub hw_active_low: bool,
}

pub struct GpioSysfs {
    ctx: Arc<HalContext>,
    desc: GpioDesc,
    hw_active_low: bool,
    gpio: BoolEntry,
}

impl GpioSysfs {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: GpioDesc,
        options: GpioOptions,
    ) -> Self {
        Self {
            ctx: Arc::clone(ctx),
            gpio: BoolEntry::new(ctx, desc.name.clone(), sysfs_resolver(driver), BoolCodec),
            hw_active_low: options.hw_active_low,
            desc,
        }
    }

    pub fn get_addr(&self) -> u32 {
        self.desc.addr
    }

    pub fn get_bit(&self) -> u32 {
        self.desc.bit
    }

    pub fn is_ro(&self) -> bool {
        self.desc.ro
    }

    pub fn get_path(&self) -> &Path {
        self.gpio.path()
    }

    pub fn get_raw_value(&self) -> Option<bool> {
        self.gpio.read()
    }

    pub fn set_raw_value(&self, value: bool) -> bool {
        self.gpio.write(&value)
    }

    fn active_value(&self) -> bool {
        !self.is_active_low()
    }
}

impl Component for GpioSysfs {
    fn name(&self) -> String {
        self.desc.name.clone()
    }
}

impl Polarized for GpioSysfs {
    fn is_active_low(&self) -> bool {
        if self.hw_active_low {
            false
        } else {
            self.desc.active_low
        }
    }

    fn is_active(&self) -> bool {
        if self.ctx.in_simulation() {
            return true;
        }
        self.get_raw_value() == Some(self.active_value())
    }

    fn set_active(&self, active: bool) -> bool {
        self.set_raw_value(active != self.is_active_low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::KernelDriver;
    use std::fs;
    use tempfile::TempDir;

    fn gpio_desc(active_low: bool) -> GpioDesc {
        GpioDesc {
            name: "psu1_present".into(),
            addr: 0x5000,
            bit: 3,
            ro: true,
            active_low,
        }
    }

    fn setup(contents: &str) -> (TempDir, Arc<dyn SysfsDriver>) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("psu1_present"), contents).unwrap();
        let driver: Arc<dyn SysfsDriver> = Arc::new(KernelDriver::new(dir.path()));
        (dir, driver)
    }

    #[test]
    fn test_active_low_zero_is_active() {
        let (_dir, driver) = setup("0\n");
        let gpio = GpioSysfs::new(
            &HalContext::hardware(),
            &driver,
            gpio_desc(true),
            GpioOptions::default(),
        );
        assert!(gpio.is_active_low());
        assert_eq!(gpio.get_raw_value(), Some(false));
        assert!(gpio.is_active());
    }

    #[test]
    fn test_active_high() {
        let (_dir, driver) = setup("1\n");
        let gpio = GpioSysfs::new(
            &HalContext::hardware(),
            &driver,
            gpio_desc(false),
            GpioOptions::default(),
        );
        assert!(!gpio.is_active_low());
        assert!(gpio.is_active());
    }

    #[test]
    fn test_hw_inversion_overrides_descriptor() {
        let (_dir, driver) = setup("0\n");
        let gpio = GpioSysfs::new(
            &HalContext::hardware(),
            &driver,
            gpio_desc(true),
            GpioOptions { hw_active_low: true },
        );
        assert!(!gpio.is_active_low());
        assert!(!gpio.is_active());
    }

    #[test]
    fn test_set_active_applies_polarity() {
        let (dir, driver) = setup("1\n");
        let gpio = GpioSysfs::new(
            &HalContext::hardware(),
            &driver,
            gpio_desc(true),
            GpioOptions::default(),
        );
        assert!(gpio.set_active(true));
        assert_eq!(fs::read_to_string(dir.path().join("psu1_present")).unwrap(), "0");
        assert!(gpio.set_active(false));
        assert_eq!(fs::read_to_string(dir.path().join("psu1_present")).unwrap(), "1");
        assert!(!gpio.is_active());
    }

    #[test]
    fn test_simulation_always_active() {
        let (_dir, driver) = setup("0\n");
        let gpio = GpioSysfs::new(
            &HalContext::simulated(),
            &driver,
            gpio_desc(false),
            GpioOptions::default(),
        );
        assert!(gpio.is_active());
    }

    #[test]
    fn test_accessors() {
        let (dir, driver) = setup("0\n");
        let gpio = GpioSysfs::new(
            &HalContext::hardware(),
            &driver,
            gpio_desc(false),
            GpioOptions::default(),
        );
        assert_eq!(gpio.get_addr(), 0x5000);
        assert_eq!(gpio.get_bit(), 3);
        assert!(gpio.is_ro());
        assert_eq!(gpio.get_path(), dir.path().join("psu1_present"));
        assert_eq!(gpio.name(), "psu1_present");
    }
}
