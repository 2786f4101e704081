//! Generic hwmon sensor channels
//!
//! A [`SensorGroup`] bundles the attributes the kernel exposes for one
//! channel (`in3_label`, `in3_input`, `in3_max`, ...). Every getter follows
//! the same rule: if the attribute exists, report what it says; otherwise
//! fall back to the first configured default, else `None`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::constants::{prefix, scale};
use crate::context::HalContext;
use crate::desc::SensorGroupDesc;
use crate::driver::SysfsDriver;
use crate::entry::{Codec, FloatEntry, RawEntry, SysfsEntry};
use crate::inventory::{Component, Thresholded};

/// Physical quantity measured by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Voltage,
    Current,
    Power,
}

impl SensorKind {
    /// hwmon attribute prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            SensorKind::Voltage => prefix::VOLTAGE,
            SensorKind::Current => prefix::CURRENT,
            SensorKind::Power => prefix::POWER,
        }
    }

    /// Fixed-point scale of the channel's attributes
    pub fn scale(&self) -> f64 {
        match self {
            SensorKind::Voltage | SensorKind::Current => scale::MILLI,
            SensorKind::Power => scale::MICRO,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorGroupOptions {
    /// Attribute prefix replacing `<kind><id>` (e.g. `in12`)
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Return the entry's value when it exists, else the first default set
pub(crate) fn get_or<C: Codec>(
    entry: &SysfsEntry<C>,
    defaults: &[Option<C::Value>],
) -> Option<C::Value>
where
    C::Value: Clone,
{
    if entry.exists() {
        return entry.read();
    }
    defaults.iter().flatten().next().cloned()
}

pub struct SensorGroup {
    kind: SensorKind,
    desc: SensorGroupDesc,
    prefix: String,
    label: RawEntry,
    input: FloatEntry,
    max: FloatEntry,
    min: FloatEntry,
    crit: FloatEntry,
    lcrit: FloatEntry,
}

impl SensorGroup {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        kind: SensorKind,
        desc: SensorGroupDesc,
        options: SensorGroupOptions,
    ) -> Self {
        let prefix = options
            .prefix
            .unwrap_or_else(|| format!("{}{}", kind.prefix(), desc.id));
        let scale = kind.scale();
        let float =
            |attr: &str| FloatEntry::float(ctx, driver, format!("{}_{}", prefix, attr), scale);
        let label = RawEntry::raw(ctx, driver, format!("{}_label", prefix));
        let input = float("input");
        let max = float("max");
        let min = float("min");
        let crit = float("crit");
        let lcrit = float("lcrit");
        debug!(prefix = %prefix, ?kind, "Creating sensor group");
        Self {
            kind,
            desc,
            prefix,
            label,
            input,
            max,
            min,
            crit,
            lcrit,
        }
    }

    pub fn voltage(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: SensorGroupDesc,
    ) -> Self {
        Self::new(ctx, driver, SensorKind::Voltage, desc, SensorGroupOptions::default())
    }

    pub fn current(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: SensorGroupDesc,
    ) -> Self {
        Self::new(ctx, driver, SensorKind::Current, desc, SensorGroupOptions::default())
    }

    pub fn power(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: SensorGroupDesc,
    ) -> Self {
        Self::new(ctx, driver, SensorKind::Power, desc, SensorGroupOptions::default())
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn desc(&self) -> &SensorGroupDesc {
        &self.desc
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Channel name: the kernel label if exposed, else the configured name
    pub fn get_name(&self) -> Option<String> {
        get_or(&self.label, &[self.desc.name.clone()])
    }

    pub fn get_input(&self) -> Option<f64> {
        get_or(&self.input, &[])
    }
}

impl Component for SensorGroup {
    fn name(&self) -> String {
        self.get_name().unwrap_or_else(|| self.prefix.clone())
    }
}

impl Thresholded for SensorGroup {
    fn get_high_threshold(&self) -> Option<f64> {
        get_or(&self.max, &[self.desc.high])
    }

    fn get_low_threshold(&self) -> Option<f64> {
        get_or(&self.min, &[self.desc.low])
    }

    fn get_critical_threshold(&self) -> Option<f64> {
        get_or(&self.crit, &[self.desc.critical])
    }

    fn get_low_critical_threshold(&self) -> Option<f64> {
        get_or(&self.lcrit, &[self.desc.low_critical])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::KernelDriver;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<dyn SysfsDriver>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("hwmon/hwmon0")).unwrap();
        let driver: Arc<dyn SysfsDriver> = Arc::new(KernelDriver::new(dir.path()));
        (dir, driver)
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join("hwmon/hwmon0").join(name), contents).unwrap();
    }

    #[test]
    fn test_voltage_channel_reads_millivolts() {
        let (dir, driver) = setup();
        write(&dir, "in3_input", "12050\n");
        write(&dir, "in3_label", "VIN\n");
        let group = SensorGroup::voltage(&HalContext::hardware(), &driver, SensorGroupDesc::new(3));
        assert_eq!(group.get_input(), Some(12.05));
        assert_eq!(group.get_name().as_deref(), Some("VIN"));
        assert_eq!(group.name(), "VIN");
    }

    #[test]
    fn test_power_channel_uses_microwatts() {
        let (dir, driver) = setup();
        write(&dir, "power1_input", "150000000\n");
        let group = SensorGroup::power(&HalContext::hardware(), &driver, SensorGroupDesc::new(1));
        assert_eq!(group.get_input(), Some(150.0));
    }

    #[test]
    fn test_missing_attributes_fall_back_to_descriptor() {
        let (_dir, driver) = setup();
        let desc = SensorGroupDesc {
            name: Some("VDD".into()),
            high: Some(1.2),
            low_critical: Some(0.7),
            ..SensorGroupDesc::new(5)
        };
        let group = SensorGroup::voltage(&HalContext::hardware(), &driver, desc);
        assert_eq!(group.get_high_threshold(), Some(1.2));
        assert_eq!(group.get_low_critical_threshold(), Some(0.7));
        assert_eq!(group.get_low_threshold(), None);
        assert_eq!(group.get_input(), None);
        assert_eq!(group.get_name().as_deref(), Some("VDD"));
    }

    #[test]
    fn test_hardware_threshold_preferred_when_present() {
        let (dir, driver) = setup();
        write(&dir, "curr2_max", "30000\n");
        let desc = SensorGroupDesc {
            high: Some(25.0),
            ..SensorGroupDesc::new(2)
        };
        let group = SensorGroup::current(&HalContext::hardware(), &driver, desc);
        assert_eq!(group.get_high_threshold(), Some(30.0));
    }

    #[test]
    fn test_prefix_override() {
        let (dir, driver) = setup();
        write(&dir, "in12_input", "900\n");
        let group = SensorGroup::new(
            &HalContext::hardware(),
            &driver,
            SensorKind::Voltage,
            SensorGroupDesc::new(1),
            SensorGroupOptions {
                prefix: Some("in12".into()),
            },
        );
        assert_eq!(group.prefix(), "in12");
        assert_eq!(group.get_input(), Some(0.9));
        assert_eq!(group.name(), "in12");
    }
}
