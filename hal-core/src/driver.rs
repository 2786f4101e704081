//! Driver seam
//!
//! Entities never build attribute paths on their own. They ask the driver
//! that exposes them: hwmon attributes live under the driver's hwmon class
//! device, GPIOs, resets and LEDs under the driver's own sysfs directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::constants::paths;

/// A kernel driver exposing attributes through sysfs
#[cfg_attr(test, mockall::automock)]
pub trait SysfsDriver: Send + Sync {
    /// Full path of a hwmon attribute (e.g. `temp1_input`)
    fn hwmon_entry(&self, name: &str) -> PathBuf;

    /// Root sysfs directory of the device the driver is bound to
    fn sysfs_path(&self) -> PathBuf;
}

/// Driver bound to a device directory such as
/// `/sys/bus/pci/devices/0000:ff:0b.3`
#[derive(Debug)]
pub struct KernelDriver {
    sysfs_path: PathBuf,
    hwmon_dir: OnceLock<PathBuf>,
}

impl KernelDriver {
    pub fn new(sysfs_path: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_path: sysfs_path.into(),
            hwmon_dir: OnceLock::new(),
        }
    }

    /// hwmon class device of this driver. The first directory found is
    /// kept; until one appears the conventional `hwmon0` is returned and the
    /// lookup is retried on the next call.
    pub fn hwmon_dir(&self) -> PathBuf {
        if let Some(dir) = self.hwmon_dir.get() {
            return dir.clone();
        }
        let root = self.sysfs_path.join(paths::HWMON_DIR);
        match find_hwmon_dir(&root) {
            Some(dir) => self.hwmon_dir.get_or_init(|| dir).clone(),
            None => root.join(format!("{}0", paths::HWMON_PREFIX)),
        }
    }
}

impl SysfsDriver for KernelDriver {
    fn hwmon_entry(&self, name: &str) -> PathBuf {
        self.hwmon_dir().join(name)
    }

    fn sysfs_path(&self) -> PathBuf {
        self.sysfs_path.clone()
    }
}

/// Numeric suffix of `hwmonN`, so `hwmon10` sorts after `hwmon2`
fn hwmon_index(dir: &Path) -> Option<u32> {
    dir.file_name()?
        .to_str()?
        .strip_prefix(paths::HWMON_PREFIX)?
        .parse()
        .ok()
}

/// Lowest-numbered `hwmonN` directory under `root`. Names without a numeric
/// suffix sort last.
fn find_hwmon_dir(root: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = match fs::read_dir(root) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with(paths::HWMON_PREFIX)
            })
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect(),
        Err(e) => {
            trace!(root = ?root, error = %e, "No hwmon directory");
            Vec::new()
        }
    };
    candidates.sort_by_key(|p| (hwmon_index(p).unwrap_or(u32::MAX), p.clone()));

    let dir = candidates.into_iter().next()?;
    debug!(dir = ?dir, "Resolved hwmon directory");
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hwmon_entry_uses_first_hwmon_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("hwmon/hwmon7")).unwrap();
        fs::create_dir_all(dir.path().join("hwmon/hwmon3")).unwrap();

        let driver = KernelDriver::new(dir.path());
        assert_eq!(
            driver.hwmon_entry("temp1_input"),
            dir.path().join("hwmon/hwmon3/temp1_input")
        );
    }

    #[test]
    fn test_hwmon_dirs_sort_numerically() {
        let dir = TempDir::new().unwrap();
        for name in ["hwmon10", "hwmon2", "hwmon_old"] {
            fs::create_dir_all(dir.path().join("hwmon").join(name)).unwrap();
        }

        let driver = KernelDriver::new(dir.path());
        assert_eq!(driver.hwmon_dir(), dir.path().join("hwmon/hwmon2"));
        assert_eq!(hwmon_index(Path::new("/x/hwmon10")), Some(10));
        assert_eq!(hwmon_index(Path::new("/x/hwmon_old")), None);
    }

    #[test]
    fn test_hwmon_entry_without_hwmon_dir() {
        let dir = TempDir::new().unwrap();
        let driver = KernelDriver::new(dir.path());
        let path = driver.hwmon_entry("fan1_input");
        assert_eq!(path, dir.path().join("hwmon/hwmon0/fan1_input"));
        assert!(!path.exists());
    }

    #[test]
    fn test_late_hwmon_dir_is_picked_up() {
        let dir = TempDir::new().unwrap();
        let driver = KernelDriver::new(dir.path());
        assert_eq!(driver.hwmon_dir(), dir.path().join("hwmon/hwmon0"));

        fs::create_dir_all(dir.path().join("hwmon/hwmon5")).unwrap();
        assert_eq!(
            driver.hwmon_entry("temp1_input"),
            dir.path().join("hwmon/hwmon5/temp1_input")
        );

        fs::create_dir_all(dir.path().join("hwmon/hwmon1")).unwrap();
        assert_eq!(driver.hwmon_dir(), dir.path().join("hwmon/hwmon5"));
    }

    #[test]
    fn test_sysfs_path_is_root() {
        let driver = KernelDriver::new("/sys/devices/scd");
        assert_eq!(driver.sysfs_path(), PathBuf::from("/sys/devices/scd"));
    }
}
