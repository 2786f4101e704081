//! Fans driven through a hwmon PWM channel

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::{ColorLed, Component, FanControl, Polarized};
use crate::constants::{fan, prefix, NOT_AVAILABLE};
use crate::context::HalContext;
use crate::desc::FanDesc;
use crate::driver::SysfsDriver;
use crate::entry::{BoolEntry, IntEntry, LinearCodec, LinearEntry, LinearRange, RawEntry};
use crate::error::Result;

fn default_max_pwm() -> i64 {
    fan::DEFAULT_MAX_PWM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FanOptions {
    /// Raw PWM value meaning full speed
    #[serde(default = "default_max_pwm")]
    pub max_pwm: i64,
}

impl Default for FanOptions {
    fn default() -> Self {
        Self {
            max_pwm: default_max_pwm(),
        }
    }
}

/// Crossing of the full-speed boundary between two speed requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTransition {
    EnteringMax,
    LeavingMax,
}

pub fn speed_transition(last: Option<u32>, speed: u32) -> Option<SpeedTransition> {
    let was_max = last == Some(fan::MAX_FAN_SPEED);
    let is_max = speed == fan::MAX_FAN_SPEED;
    match (was_max, is_max) {
        (true, false) => Some(SpeedTransition::LeavingMax),
        (false, true) => Some(SpeedTransition::EnteringMax),
        _ => None,
    }
}

pub struct FanSysfs {
    desc: FanDesc,
    max_pwm: i64,
    pwm: LinearEntry,
    input: IntEntry,
    airflow: RawEntry,
    fault: BoolEntry,
    present: BoolEntry,
    model: RawEntry,
    led: Option<Arc<dyn ColorLed>>,
    fault_gpio: Option<Arc<dyn Polarized>>,
    last_speed: Mutex<Option<u32>>,
}

impl FanSysfs {
    pub fn new(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        desc: FanDesc,
        options: FanOptions,
    ) -> Result<Self> {
        let id = desc.fan_id;
        let codec = LinearCodec::new(LinearRange::new(0, options.max_pwm), LinearRange::PERCENT)?;
        let attr = |suffix: &str| format!("{}{}_{}", prefix::FAN, id, suffix);
        debug!(fan = id, max_pwm = options.max_pwm, "Creating fan");
        Ok(Self {
            pwm: LinearEntry::hwmon(ctx, driver, format!("{}{}", prefix::PWM, id), codec),
            input: IntEntry::int(ctx, driver, attr("input")),
            airflow: RawEntry::raw(ctx, driver, attr("airflow")),
            fault: BoolEntry::boolean(ctx, driver, attr("fault")),
            present: BoolEntry::boolean(ctx, driver, attr("present")),
            model: RawEntry::raw(ctx, driver, attr("model")),
            max_pwm: options.max_pwm,
            led: None,
            fault_gpio: None,
            last_speed: Mutex::new(None),
            desc,
        })
    }

    /// Attach the LED reflecting this fan's status
    pub fn with_led(mut self, led: Arc<dyn ColorLed>) -> Self {
        self.led = Some(led);
        self
    }

    /// Attach a GPIO that signals a fault independently of the hwmon driver
    pub fn with_fault_gpio(mut self, gpio: Arc<dyn Polarized>) -> Self {
        self.fault_gpio = Some(gpio);
        self
    }

    pub fn desc(&self) -> &FanDesc {
        &self.desc
    }

    pub fn max_pwm(&self) -> i64 {
        self.max_pwm
    }

    pub fn last_speed(&self) -> Option<u32> {
        *self.last_speed.lock()
    }
}

impl Component for FanSysfs {
    fn name(&self) -> String {
        self.desc.rendered_name()
    }
}

impl FanControl for FanSysfs {
    fn get_id(&self) -> u32 {
        self.desc.fan_id
    }

    fn get_model(&self) -> Option<String> {
        if self.model.exists() {
            return self.model.read();
        }
        self.desc.model.clone()
    }

    fn get_position(&self) -> String {
        self.desc
            .position
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn get_speed(&self) -> Option<u32> {
        if !self.pwm.exists() {
            return Some(0);
        }
        self.pwm.read().map(|pct| pct.clamp(0, i64::from(fan::MAX_FAN_SPEED)) as u32)
    }

    fn set_speed(&self, speed: u32) -> bool {
        let speed = if speed > fan::MAX_FAN_SPEED {
            warn!(fan = %self.name(), requested = speed, "Clamping fan speed to max");
            fan::MAX_FAN_SPEED
        } else {
            speed
        };

        let mut last = self.last_speed.lock();
        match speed_transition(*last, speed) {
            Some(SpeedTransition::LeavingMax) => {
                debug!("{} fan speed reduced from max", self.name())
            }
            Some(SpeedTransition::EnteringMax) => {
                warn!("{} fan speed set to max", self.name())
            }
            None => {}
        }
        *last = Some(speed);
        drop(last);

        self.pwm.write(&i64::from(speed))
    }

    fn get_rpm(&self) -> Option<u32> {
        if !self.input.exists() {
            return None;
        }
        self.input.read().and_then(|rpm| u32::try_from(rpm).ok())
    }

    fn get_fault(&self) -> bool {
        if let Some(gpio) = &self.fault_gpio {
            if gpio.is_active() {
                return true;
            }
        }
        if !self.fault.exists() {
            return false;
        }
        self.fault.read().unwrap_or(false)
    }

    fn get_presence(&self) -> bool {
        if self.present.exists() {
            return self.present.read().unwrap_or(false);
        }
        self.input.read() != Some(0)
    }

    fn get_direction(&self) -> Option<String> {
        if self.airflow.exists() {
            return self.airflow.read();
        }
        self.desc.airflow.clone()
    }

    fn get_led(&self) -> Option<Arc<dyn ColorLed>> {
        self.led.clone()
    }
}
