//! Point-in-time capture of every inventory reading
//!
//! Used for diagnostics and by the CLI to dump the state of a platform.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::desc::Position;
use crate::entry::LedColor;
use crate::error::Result;
use crate::inventory::Inventory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanSnapshot {
    pub id: u32,
    pub name: String,
    pub speed: Option<u32>,
    pub rpm: Option<u32>,
    pub present: bool,
    pub fault: bool,
    pub status: bool,
    pub direction: Option<String>,
    pub model: Option<String>,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedSnapshot {
    pub name: String,
    pub color: Option<LedColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempSnapshot {
    pub name: String,
    pub position: Position,
    pub temperature: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub critical: Option<f64>,
    pub low_critical: Option<f64>,
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpioSnapshot {
    pub name: String,
    pub active_low: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetSnapshot {
    pub name: String,
    pub asserted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RailSnapshot {
    pub name: String,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySnapshot {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    pub fans: Vec<FanSnapshot>,
    pub leds: Vec<LedSnapshot>,
    pub temps: Vec<TempSnapshot>,
    pub gpios: Vec<GpioSnapshot>,
    pub resets: Vec<ResetSnapshot>,
    pub rails: Vec<RailSnapshot>,
}

/// Read every entity of `inventory` once
pub fn capture_snapshot(inventory: &Inventory) -> InventorySnapshot {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let fans = inventory
        .fans
        .iter()
        .map(|fan| FanSnapshot {
            id: fan.get_id(),
            name: fan.name(),
            speed: fan.get_speed(),
            rpm: fan.get_rpm(),
            present: fan.get_presence(),
            fault: fan.get_fault(),
            status: fan.get_status(),
            direction: fan.get_direction(),
            model: fan.get_model(),
            position: fan.get_position(),
        })
        .collect();

    // unmapped codes are reported per LED
    let leds = inventory
        .leds
        .iter()
        .map(|led| match led.get_color() {
            Ok(color) => LedSnapshot {
                name: led.name(),
                color,
                error: None,
            },
            Err(e) => LedSnapshot {
                name: led.name(),
                color: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let temps = inventory
        .temps
        .iter()
        .map(|temp| TempSnapshot {
            name: temp.name(),
            position: temp.get_position(),
            temperature: temp.get_temperature(),
            high: temp.get_high_threshold(),
            low: temp.get_low_threshold(),
            critical: temp.get_critical_threshold(),
            low_critical: temp.get_low_critical_threshold(),
            status: temp.get_status(),
        })
        .collect();

    let gpios = inventory
        .gpios
        .iter()
        .map(|gpio| GpioSnapshot {
            name: gpio.name(),
            active_low: gpio.is_active_low(),
            active: gpio.is_active(),
        })
        .collect();

    let resets = inventory
        .resets
        .iter()
        .map(|reset| ResetSnapshot {
            name: reset.name(),
            asserted: reset.read(),
        })
        .collect();

    let rails = inventory
        .rails
        .iter()
        .map(|rail| RailSnapshot {
            name: rail.name(),
            voltage: rail.get_voltage(),
            current: rail.get_current(),
            power: rail.get_power(),
        })
        .collect();

    let snapshot = InventorySnapshot {
        timestamp_ms,
        fans,
        leds,
        temps,
        gpios,
        resets,
        rails,
    };
    debug!(entities = inventory.len(), "Captured inventory snapshot");
    snapshot
}

/// Export snapshot as pretty-printed JSON
pub fn snapshot_to_json(snapshot: &InventorySnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Export snapshot as compact JSON string
pub fn snapshot_to_json_compact(snapshot: &InventorySnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}
