//! Constants and configuration values for switchhal
//!
//! Centralizes the sysfs naming conventions, fixed-point scales and default
//! limits used across the crate.

/// System paths
pub mod paths {
    /// Default configuration file
    pub const DEFAULT_CONFIG_FILE: &str = "/etc/switchhal/config.json";

    /// Environment variable overriding the configuration file location
    pub const CONFIG_ENV_VAR: &str = "SWITCHHAL_CONFIG";

    /// Directory holding the hwmon class devices of a driver
    pub const HWMON_DIR: &str = "hwmon";

    /// Prefix of every hwmon class device directory (hwmon0, hwmon1, ...)
    pub const HWMON_PREFIX: &str = "hwmon";

    /// Directory holding LED class devices of a driver
    pub const LEDS_DIR: &str = "leds";

    /// Attribute of an LED class device carrying its brightness
    pub const LED_BRIGHTNESS: &str = "brightness";
}

/// Fixed-point scales used by hwmon attributes
pub mod scale {
    /// Millidegrees, millivolts, milliamps
    pub const MILLI: f64 = 1_000.0;

    /// Microwatts
    pub const MICRO: f64 = 1_000_000.0;
}

/// hwmon attribute prefixes
pub mod prefix {
    pub const TEMP: &str = "temp";
    pub const FAN: &str = "fan";
    pub const PWM: &str = "pwm";
    pub const VOLTAGE: &str = "in";
    pub const CURRENT: &str = "curr";
    pub const POWER: &str = "power";
}

/// Fan control limits
pub mod fan {
    /// Full speed, in percent
    pub const MAX_FAN_SPEED: u32 = 100;

    /// Default full-scale PWM register value
    pub const DEFAULT_MAX_PWM: i64 = 255;
}

/// Raw value returned by every read in simulation mode
pub const SIMULATED_RAW_VALUE: &str = "1";

/// Placeholder for values with no source
pub const NOT_AVAILABLE: &str = "N/A";
