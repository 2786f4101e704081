//! Shared runtime context
//!
//! Every entry and entity holds an `Arc<HalContext>`. Simulation mode and the
//! threshold reporting policy are looked up through it on each call, so they
//! can be flipped at runtime and injected per test.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::HalConfig;

#[derive(Debug, Default)]
pub struct HalContext {
    config: RwLock<HalConfig>,
}

impl HalContext {
    pub fn new(config: HalConfig) -> Arc<Self> {
        Arc::new(Self {
            config: RwLock::new(config),
        })
    }

    /// Context talking to real hardware with default settings
    pub fn hardware() -> Arc<Self> {
        Self::new(HalConfig::default())
    }

    /// Context with every I/O replaced by fixed responses
    pub fn simulated() -> Arc<Self> {
        Self::new(HalConfig {
            simulation: true,
            ..HalConfig::default()
        })
    }

    pub fn config(&self) -> HalConfig {
        *self.config.read()
    }

    pub fn in_simulation(&self) -> bool {
        self.config.read().simulation
    }

    pub fn set_simulation(&self, enabled: bool) {
        self.config.write().simulation = enabled;
    }

    pub fn report_hw_thresholds(&self) -> bool {
        self.config.read().report_hw_thresholds
    }

    pub fn set_report_hw_thresholds(&self, enabled: bool) {
        self.config.write().report_hw_thresholds = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_toggle_at_runtime() {
        let ctx = HalContext::hardware();
        assert!(!ctx.in_simulation());
        ctx.set_simulation(true);
        assert!(ctx.in_simulation());
        ctx.set_report_hw_thresholds(true);
        assert_eq!(
            ctx.config(),
            HalConfig {
                simulation: true,
                report_hw_thresholds: true
            }
        );
    }
}
