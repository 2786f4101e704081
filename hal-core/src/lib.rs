//! switchhal core library
//!
//! Typed access to the sysfs attributes exposed by network switch platform
//! drivers, and the device entities built on top of them.
//!
//! # Module Structure
//!
//! - `entry/` - One sysfs attribute with its value conversion
//! - `sensor`, `rail` - hwmon sensor groups and derived power rails
//! - `inventory/` - Fans, LEDs, temperature sensors, GPIOs and reset lines
//! - `desc`, `registry` - Static platform descriptors
//! - `config`, `context` - Runtime flags shared by every entity
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hal_core::{
//!     FanControl, FanDesc, FanOptions, FanSysfs, HalContext, KernelDriver, SysfsDriver,
//! };
//!
//! let ctx = HalContext::hardware();
//! let driver: Arc<dyn SysfsDriver> =
//!     Arc::new(KernelDriver::new("/sys/devices/platform/switchboard"));
//! let fan = FanSysfs::new(&ctx, &driver, FanDesc::new(1), FanOptions::default()).unwrap();
//! fan.set_speed(60);
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod desc;
pub mod driver;
pub mod entry;
pub mod error;
pub mod inventory;
pub mod rail;
pub mod registry;
pub mod sensor;
pub mod snapshot;

pub use config::{config_path, HalConfig};
pub use context::HalContext;
pub use desc::{
    Direction, FanDesc, GpioDesc, LedDesc, ObjectId, Position, RailDesc, ResetDesc, SensorDesc,
    SensorGroupDesc,
};
pub use driver::{KernelDriver, SysfsDriver};
pub use entry::{
    BoolEntry, ColorEntry, FloatEntry, IntEntry, LedColor, LedColorMap, LinearEntry, RawEntry,
    SysfsEntry,
};
pub use error::{HalError, Result};
pub use inventory::{
    ColorLed, Component, FanControl, FanOptions, FanSysfs, GpioOptions, GpioSysfs, Inventory,
    LedOptions, LedRgbOptions, LedRgbSysfs, LedSysfs, Polarized, ResetLine, ResetSysfs, Thermal,
    ThresholdControl, Thresholded, TempSysfs,
};
pub use rail::{
    derive_current, derive_power, derive_voltage, PowerRail, RailSource, RawRail, SensorRail,
};
pub use registry::{ComponentDesc, DescKind, DescRegistry};
pub use sensor::{SensorGroup, SensorGroupOptions, SensorKind};
pub use snapshot::{capture_snapshot, snapshot_to_json, snapshot_to_json_compact, InventorySnapshot};
