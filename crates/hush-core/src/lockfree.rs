//! Lock-free property cells shared between the audio threads and the host.

use crate::compat::{AtomicBool, Ordering};
use atomic_float::AtomicF32;

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Cache-line aligned atomic `f32` confined to `[0, 1]`.
///
/// Out-of-range writes saturate; non-finite writes are refused and leave the
/// stored value untouched.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicUnitFloat {
    value: AtomicF32,
}

impl AtomicUnitFloat {
    pub fn new(value: f32) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    /// Returns `false` if `value` was refused.
    #[inline]
    pub fn set(&self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.value.store(value.clamp(0.0, 1.0), Ordering::Release);
        true
    }
}

impl Default for AtomicUnitFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}
