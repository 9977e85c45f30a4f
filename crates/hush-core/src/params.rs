//! Effect parameters writable from any thread.
//!
//! Each property is its own atomic cell so a host-side write never contends
//! with the push/pull path. The producer samples the cells once per batch,
//! so a change lands within one processing window.

use crate::lockfree::{AtomicFlag, AtomicUnitFloat};

/// Noise suppression on/off and strength.
#[derive(Debug)]
pub struct EffectParams {
    enabled: AtomicFlag,
    power: AtomicUnitFloat,
}

/// Values observed for one processing batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSnapshot {
    pub enabled: bool,
    pub power: f32,
}

impl EffectParams {
    pub fn new(enabled: bool, power: f32) -> Self {
        Self {
            enabled: AtomicFlag::new(enabled),
            power: AtomicUnitFloat::new(power),
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    #[inline]
    pub fn power(&self) -> f32 {
        self.power.get()
    }

    /// Values outside `[0, 1]` saturate; non-finite values are ignored.
    pub fn set_power(&self, power: f32) {
        if !self.power.set(power) {
            tracing::warn!("Ignoring non-finite noise suppression power {}", power);
        }
    }

    #[inline]
    pub fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            enabled: self.enabled(),
            power: self.power(),
        }
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self::new(true, 1.0)
    }
}
