//! Typed accessors for single sysfs attributes
//!
//! A [`SysfsEntry`] names one attribute file and knows how to convert between
//! its text and a typed value. Access is best-effort:
//!
//! - a missing attribute is reported by [`SysfsEntry::exists`], never as an
//!   error
//! - a failed read yields `None`, a failed write yields `false`
//! - only discrete lookups that miss (an LED code with no color) surface as
//!   `Err`, through [`SysfsEntry::try_read`] / [`SysfsEntry::try_write`]
//!
//! In simulation mode reads return the raw text `"1"` and writes succeed
//! without touching the filesystem.

mod codec;
mod color;

pub use codec::{
    linear_rescale, BoolCodec, Codec, ConvertError, FloatCodec, IntCodec, LedColorCodec,
    LinearCodec, LinearRange, RawCodec,
};
pub use color::{LedColor, LedColorMap};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{error, trace, warn};

use crate::constants::{paths, SIMULATED_RAW_VALUE};
use crate::context::HalContext;
use crate::driver::SysfsDriver;
use crate::error::{HalError, Result};

/// Maps an attribute name to the file backing it
pub type PathResolver = Box<dyn Fn(&str) -> PathBuf + Send + Sync>;

/// Attribute under the driver's hwmon class device
pub fn hwmon_resolver(driver: &Arc<dyn SysfsDriver>) -> PathResolver {
    let driver = Arc::clone(driver);
    Box::new(move |name: &str| driver.hwmon_entry(name))
}

/// Attribute directly under the driver's sysfs directory (GPIOs, resets)
pub fn sysfs_resolver(driver: &Arc<dyn SysfsDriver>) -> PathResolver {
    let driver = Arc::clone(driver);
    Box::new(move |name: &str| driver.sysfs_path().join(name))
}

/// Brightness file of the LED class device `name`
pub fn led_resolver(driver: &Arc<dyn SysfsDriver>) -> PathResolver {
    let driver = Arc::clone(driver);
    Box::new(move |name: &str| {
        driver
            .sysfs_path()
            .join(paths::LEDS_DIR)
            .join(name)
            .join(paths::LED_BRIGHTNESS)
    })
}

pub struct SysfsEntry<C: Codec> {
    ctx: Arc<HalContext>,
    name: String,
    resolver: PathResolver,
    path: OnceLock<PathBuf>,
    codec: C,
}

pub type RawEntry = SysfsEntry<RawCodec>;
pub type IntEntry = SysfsEntry<IntCodec>;
pub type LinearEntry = SysfsEntry<LinearCodec>;
pub type FloatEntry = SysfsEntry<FloatCodec>;
pub type BoolEntry = SysfsEntry<BoolCodec>;
pub type ColorEntry = SysfsEntry<LedColorCodec>;

impl<C: Codec> SysfsEntry<C> {
    pub fn new(
        ctx: &Arc<HalContext>,
        name: impl Into<String>,
        resolver: PathResolver,
        codec: C,
    ) -> Self {
        Self {
            ctx: Arc::clone(ctx),
            name: name.into(),
            resolver,
            path: OnceLock::new(),
            codec,
        }
    }

    /// Entry living under the driver's hwmon directory
    pub fn hwmon(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
        codec: C,
    ) -> Self {
        Self::new(ctx, name, hwmon_resolver(driver), codec)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Backing file, resolved on first use and cached afterwards
    pub fn path(&self) -> &Path {
        self.path.get_or_init(|| (self.resolver)(&self.name))
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    fn read_raw(&self) -> Option<String> {
        if self.ctx.in_simulation() {
            return Some(SIMULATED_RAW_VALUE.to_string());
        }
        match fs::read_to_string(self.path()) {
            Ok(raw) => Some(raw.trim_end().to_string()),
            Err(e) => {
                error!(path = ?self.path(), error = %e, "read sysfs failed");
                None
            }
        }
    }

    fn write_raw(&self, raw: &str) -> bool {
        if self.ctx.in_simulation() {
            return true;
        }
        match fs::write(self.path(), raw) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = ?self.path(), error = %e, "write sysfs failed");
                false
            }
        }
    }

    /// Read and convert. `Ok(None)` means the value could not be obtained;
    /// `Err` means the raw value has no mapping.
    pub fn try_read(&self) -> Result<Option<C::Value>> {
        let Some(raw) = self.read_raw() else {
            return Ok(None);
        };
        match self.codec.decode(&raw) {
            Ok(value) => {
                trace!("{}.read(): {:?} -> {:?}", self, raw, value);
                Ok(Some(value))
            }
            Err(ConvertError::Parse(reason)) => {
                warn!(path = ?self.path(), raw = %raw, reason = %reason, "Unparseable sysfs value");
                Ok(None)
            }
            Err(ConvertError::Unmapped(value)) => Err(HalError::UnmappedValue {
                entry: self.to_string(),
                value,
            }),
        }
    }

    /// Read and convert, folding every failure into `None`
    pub fn read(&self) -> Option<C::Value> {
        self.try_read().unwrap_or_else(|e| {
            error!(error = %e, "Discarding unmapped sysfs value");
            None
        })
    }

    /// Convert and write. `Ok(false)` means the write did not go through;
    /// `Err` means the value has no mapping.
    pub fn try_write(&self, value: &C::Value) -> Result<bool> {
        let raw = match self.codec.encode(value) {
            Ok(raw) => raw,
            Err(ConvertError::Parse(reason)) => {
                warn!(entry = %self, ?value, reason = %reason, "Value cannot be encoded");
                return Ok(false);
            }
            Err(ConvertError::Unmapped(color)) => {
                return Err(HalError::UnmappedColor {
                    entry: self.to_string(),
                    color,
                })
            }
        };
        trace!("{}.write({:?}) -> {:?}", self, value, raw);
        Ok(self.write_raw(&raw))
    }

    /// Convert and write, folding every failure into `false`
    pub fn write(&self, value: &C::Value) -> bool {
        self.try_write(value).unwrap_or_else(|e| {
            error!(error = %e, "Dropping unmapped sysfs write");
            false
        })
    }
}

impl<C: Codec> fmt::Display for SysfsEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(path={})", C::KIND, self.path().display())
    }
}

impl<C: Codec + fmt::Debug> fmt::Debug for SysfsEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysfsEntry")
            .field("name", &self.name)
            .field("path", &self.path.get())
            .field("codec", &self.codec)
            .finish()
    }
}

impl RawEntry {
    pub fn raw(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
    ) -> Self {
        Self::hwmon(ctx, driver, name, RawCodec)
    }
}

impl IntEntry {
    pub fn int(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
    ) -> Self {
        Self::hwmon(ctx, driver, name, IntCodec)
    }

    /// Brightness of the LED class device `name`
    pub fn led(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(ctx, name, led_resolver(driver), IntCodec)
    }
}

impl FloatEntry {
    pub fn float(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
        scale: f64,
    ) -> Self {
        Self::hwmon(ctx, driver, name, FloatCodec::new(scale))
    }
}

impl BoolEntry {
    pub fn boolean(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
    ) -> Self {
        Self::hwmon(ctx, driver, name, BoolCodec)
    }
}

impl ColorEntry {
    /// Single brightness node whose code selects a color
    pub fn led_color(
        ctx: &Arc<HalContext>,
        driver: &Arc<dyn SysfsDriver>,
        name: impl Into<String>,
        map: LedColorMap,
    ) -> Self {
        Self::new(ctx, name, led_resolver(driver), LedColorCodec::new(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{KernelDriver, MockSysfsDriver};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<dyn SysfsDriver>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("hwmon/hwmon2")).unwrap();
        let driver: Arc<dyn SysfsDriver> = Arc::new(KernelDriver::new(dir.path()));
        (dir, driver)
    }

    fn hwmon_file(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join("hwmon/hwmon2").join(name), contents).unwrap();
    }

    #[test]
    fn test_path_resolved_once() {
        let mut mock = MockSysfsDriver::new();
        mock.expect_hwmon_entry()
            .times(1)
            .returning(|name| PathBuf::from("/nonexistent").join(name));
        let driver: Arc<dyn SysfsDriver> = Arc::new(mock);
        let ctx = HalContext::hardware();

        let entry = IntEntry::int(&ctx, &driver, "temp1_input");
        assert_eq!(entry.path(), Path::new("/nonexistent/temp1_input"));
        assert!(!entry.exists());
        assert_eq!(entry.read(), None);
        assert!(entry.to_string().starts_with("SysfsEntryInt(path="));
    }

    #[test]
    fn test_read_strips_trailing_newline() {
        let (dir, driver) = setup();
        hwmon_file(&dir, "fan1_input", "5400\n");
        let entry = IntEntry::int(&HalContext::hardware(), &driver, "fan1_input");
        assert!(entry.exists());
        assert_eq!(entry.read(), Some(5400));

        hwmon_file(&dir, "fan1_airflow", "forward\n");
        let raw = RawEntry::raw(&HalContext::hardware(), &driver, "fan1_airflow");
        assert_eq!(raw.read().as_deref(), Some("forward"));
    }

    #[test]
    fn test_missing_file_reads_none() {
        let (_dir, driver) = setup();
        let entry = FloatEntry::float(&HalContext::hardware(), &driver, "temp9_input", 1000.0);
        assert!(!entry.exists());
        assert_eq!(entry.read(), None);
        assert!(matches!(entry.try_read(), Ok(None)));
    }

    #[test]
    fn test_garbage_reads_none() {
        let (dir, driver) = setup();
        hwmon_file(&dir, "temp1_input", "not-a-number\n");
        let entry = FloatEntry::float(&HalContext::hardware(), &driver, "temp1_input", 1000.0);
        assert_eq!(entry.read(), None);
    }

    #[test]
    fn test_write_then_read_float() {
        let (dir, driver) = setup();
        hwmon_file(&dir, "temp1_max", "0\n");
        let entry = FloatEntry::float(&HalContext::hardware(), &driver, "temp1_max", 1000.0);
        assert!(entry.write(&85.5));
        assert_eq!(
            fs::read_to_string(dir.path().join("hwmon/hwmon2/temp1_max")).unwrap(),
            "85500"
        );
        assert_eq!(entry.read(), Some(85.5));
    }

    #[test]
    fn test_write_failure_is_false() {
        let ctx = HalContext::hardware();
        let entry = BoolEntry::new(
            &ctx,
            "reset",
            Box::new(|name: &str| PathBuf::from("/nonexistent/dir").join(name)),
            BoolCodec,
        );
        assert!(!entry.write(&true));
    }

    #[test]
    fn test_simulation_bypasses_io() {
        let (dir, driver) = setup();
        let ctx = HalContext::simulated();

        let entry = IntEntry::int(&ctx, &driver, "fan3_input");
        assert!(!entry.exists());
        assert_eq!(entry.read(), Some(1));

        let flag = BoolEntry::boolean(&ctx, &driver, "fan3_fault");
        assert_eq!(flag.read(), Some(true));
        assert!(flag.write(&false));
        assert!(!dir.path().join("hwmon/hwmon2/fan3_fault").exists());
    }

    #[test]
    fn test_linear_entry_writes_raw_pwm() {
        let (dir, driver) = setup();
        hwmon_file(&dir, "pwm1", "0\n");
        let codec = LinearCodec::new(LinearRange::new(0, 255), LinearRange::PERCENT).unwrap();
        let entry = LinearEntry::hwmon(&HalContext::hardware(), &driver, "pwm1", codec);
        assert!(entry.write(&100));
        assert_eq!(
            fs::read_to_string(dir.path().join("hwmon/hwmon2/pwm1")).unwrap(),
            "255"
        );
        assert_eq!(entry.read(), Some(100));
    }

    #[test]
    fn test_linear_entry_overflow_reads_none() {
        let (dir, driver) = setup();
        hwmon_file(&dir, "pwm1", "9223372036854775807\n");
        let codec = LinearCodec::new(LinearRange::new(0, 255), LinearRange::PERCENT).unwrap();
        let entry = LinearEntry::hwmon(&HalContext::hardware(), &driver, "pwm1", codec);
        assert!(matches!(entry.try_read(), Ok(None)));
        assert_eq!(entry.read(), None);
        assert!(!entry.write(&i64::MAX));
        assert_eq!(
            fs::read_to_string(dir.path().join("hwmon/hwmon2/pwm1")).unwrap(),
            "9223372036854775807\n"
        );
    }

    #[test]
    fn test_led_color_entry_path_and_lookup() {
        let (dir, driver) = setup();
        let led_dir = dir.path().join("leds/status");
        fs::create_dir_all(&led_dir).unwrap();
        fs::write(led_dir.join("brightness"), "2\n").unwrap();

        let entry = ColorEntry::led_color(
            &HalContext::hardware(),
            &driver,
            "status",
            LedColorMap::default(),
        );
        assert_eq!(entry.path(), led_dir.join("brightness"));
        assert_eq!(entry.try_read().unwrap(), Some(LedColor::Red));

        fs::write(led_dir.join("brightness"), "7\n").unwrap();
        assert!(matches!(
            entry.try_read(),
            Err(HalError::UnmappedValue { .. })
        ));
        assert_eq!(entry.read(), None);

        assert!(matches!(
            entry.try_write(&LedColor::Blue),
            Err(HalError::UnmappedColor { .. })
        ));
        assert!(entry.try_write(&LedColor::Amber).unwrap());
        assert_eq!(fs::read_to_string(led_dir.join("brightness")).unwrap(), "3");
    }
}
