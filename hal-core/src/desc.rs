//! Static device descriptors
//!
//! Descriptors are the declarative half of the platform description: they say
//! what a component is called, where it sits and which defaults apply when the
//! hardware does not report a value. They are plain data, deserializable from
//! JSON with unknown fields rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::prefix;
use crate::error::{HalError, Result};

/// Stable, one-based identifier of a component within its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a temperature sensor sits relative to the airflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Inlet,
    Outlet,
    #[default]
    Other,
}

/// Whether a rail feeds into or out of the measured device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FanDesc {
    pub fan_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub airflow: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl FanDesc {
    pub fn new(fan_id: u32) -> Self {
        Self {
            fan_id,
            name: None,
            model: None,
            airflow: None,
            position: None,
        }
    }

    /// Configured name, or `fan<id>` when none was given
    pub fn rendered_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}{}", prefix::FAN, self.fan_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedDesc {
    pub name: String,
}

/// Temperature sensor. `diode` is zero-based; the hwmon channel is `diode + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorDesc {
    pub diode: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub overheat: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub lcritical: Option<f64>,
}

impl SensorDesc {
    pub fn new(diode: u32) -> Self {
        Self {
            diode,
            name: None,
            position: Position::Other,
            overheat: None,
            critical: None,
            low: None,
            lcritical: None,
        }
    }

    /// hwmon channel index, `diode + 1`
    pub fn temp_id(&self) -> Result<u32> {
        self.diode.checked_add(1).ok_or_else(|| {
            HalError::invalid_descriptor(format!(
                "sensor diode {} has no hwmon channel",
                self.diode
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpioDesc {
    pub name: String,
    pub addr: u32,
    pub bit: u32,
    #[serde(default)]
    pub ro: bool,
    #[serde(default)]
    pub active_low: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetDesc {
    pub name: String,
    pub addr: u32,
    pub bit: u32,
}

/// One hwmon channel of a voltage, current or power sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorGroupDesc {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub critical: Option<f64>,
    #[serde(default)]
    pub low_critical: Option<f64>,
}

impl SensorGroupDesc {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: None,
            direction: None,
            high: None,
            low: None,
            critical: None,
            low_critical: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RailDesc {
    pub rail_id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub voltage: Option<SensorGroupDesc>,
    #[serde(default)]
    pub current: Option<SensorGroupDesc>,
    #[serde(default)]
    pub power: Option<SensorGroupDesc>,
}

impl RailDesc {
    pub fn new(rail_id: u32) -> Self {
        Self {
            rail_id,
            name: None,
            direction: None,
            voltage: None,
            current: None,
            power: None,
        }
    }

    /// Sub-descriptor for one quantity, falling back to one derived from the
    /// rail itself
    pub fn group_desc(&self, which: Option<&SensorGroupDesc>) -> SensorGroupDesc {
        which.cloned().unwrap_or_else(|| SensorGroupDesc {
            name: self.name.clone(),
            direction: self.direction,
            ..SensorGroupDesc::new(self.rail_id)
        })
    }
}
