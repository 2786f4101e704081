//! Power rails
//!
//! A rail is described by voltage, current and power. Hardware rarely
//! reports all three, so each getter falls back to deriving its quantity
//! from the other two (P = V * I). Derivation is one level deep: when two
//! quantities are missing the result is 0, never an error.

use std::sync::Arc;

use crate::constants::{prefix, scale};
use crate::context::HalContext;
use crate::desc::RailDesc;
use crate::driver::SysfsDriver;
use crate::entry::FloatEntry;
use crate::inventory::Component;
use crate::sensor::SensorGroup;

/// Directly measured quantities of a rail; `None` when not measured
pub trait RailSource {
    fn measured_voltage(&self) -> Option<f64>;
    fn measured_current(&self) -> Option<f64>;
    fn measured_power(&self) -> Option<f64>;
}

fn quotient(dividend: Option<f64>, divisor: Option<f64>) -> f64 {
    match (dividend, divisor) {
        (Some(dividend), Some(divisor)) if divisor != 0.0 => dividend / divisor,
        _ => 0.0,
    }
}

fn product(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => a * b,
        _ => 0.0,
    }
}

pub fn derive_current<S: RailSource + ?Sized>(source: &S) -> f64 {
    if let Some(current) = source.measured_current() {
        return current;
    }
    let voltage = source.measured_voltage();
    quotient(source.measured_power(), voltage)
}

pub fn derive_voltage<S: RailSource + ?Sized>(source: &S) -> f64 {
    if let Some(voltage) = source.measured_voltage() {
        return voltage;
    }
    let current = source.measured_current();
    quotient(source.measured_power(), current)
}

pub fn derive_power<S: RailSource + ?Sized>(source: &S) -> f64 {
    if let Some(power) = source.measured_power() {
        return power;
    }
    product(source.measured_current(), source.measured_voltage())
}

/// Rail readings in volts, amps and watts
pub trait PowerRail: Component + RailSource + Send + Sync {
    fn get_voltage(&self) -> f64 {
        derive_voltage(self)
    }

    fn get_current(&self) -> f64 {
        derive_current(self)
    }

    fn get_power(&self) -> f64 {
        derive_power(self)
    }
}

fn rail_name(desc: &RailDesc) -> String {
    desc.name
        .clone()
        .unwrap_or_else(|| format!("rail{}", desc.rail_id))
}

/// Rail backed by the three bare `_input` attributes of one channel
pub struct RawRail {
    desc: RailDesc,
    voltage: FloatEntry,
    current: FloatEntry,
    power: FloatEntry,
}

impl RawRail {
    pub fn new(ctx: &Arc<HalContext>, driver: &Arc<dyn SysfsDriver>, desc: RailDesc) -> Self {
        let id = desc.rail_id;
        let input = |kind: &str, scale: f64| {
            FloatEntry::float(ctx, driver, format!("{}{}_input", kind, id), scale)
        };
        Self {
            voltage: input(prefix::VOLTAGE, scale::MILLI),
            current: input(prefix::CURRENT, scale::MILLI),
            power: input(prefix::POWER, scale::MICRO),
            desc,
        }
    }

    pub fn desc(&self) -> &RailDesc {
        &self.desc
    }
}

fn present(entry: &FloatEntry) -> Option<f64> {
    if entry.exists() {
        entry.read()
    } else {
        None
    }
}

impl RailSource for RawRail {
    fn measured_voltage(&self) -> Option<f64> {
        present(&self.voltage)
    }

    fn measured_current(&self) -> Option<f64> {
        present(&self.current)
    }

    fn measured_power(&self) -> Option<f64> {
        present(&self.power)
    }
}

impl Component for RawRail {
    fn name(&self) -> String {
        rail_name(&self.desc)
    }
}

impl PowerRail for RawRail {}

/// Rail built from three full sensor channels, each possibly with its own
/// descriptor
pub struct SensorRail {
    desc: RailDesc,
    voltage: SensorGroup,
    current: SensorGroup,
    power: SensorGroup,
}

impl SensorRail {
    pub fn new(ctx: &Arc<HalContext>, driver: &Arc<dyn SysfsDriver>, desc: RailDesc) -> Self {
        let voltage = SensorGroup::voltage(ctx, driver, desc.group_desc(desc.voltage.as_ref()));
        let current = SensorGroup::current(ctx, driver, desc.group_desc(desc.current.as_ref()));
        let power = SensorGroup::power(ctx, driver, desc.group_desc(desc.power.as_ref()));
        Self {
            desc,
            voltage,
            current,
            power,
        }
    }

    pub fn desc(&self) -> &RailDesc {
        &self.desc
    }

    pub fn voltage_sensor(&self) -> &SensorGroup {
        &self.voltage
    }

    pub fn current_sensor(&self) -> &SensorGroup {
        &self.current
    }

    pub fn power_sensor(&self) -> &SensorGroup {
        &self.power
    }
}

impl RailSource for SensorRail {
    fn measured_voltage(&self) -> Option<f64> {
        self.voltage.get_input()
    }

    fn measured_current(&self) -> Option<f64> {
        self.current.get_input()
    }

    fn measured_power(&self) -> Option<f64> {
        self.power.get_input()
    }
}

impl Component for SensorRail {
    fn name(&self) -> String {
        rail_name(&self.desc)
    }
}

impl PowerRail for SensorRail {}
