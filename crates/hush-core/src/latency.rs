//! Latency modes and the buffering policy derived from them.
//!
//! A [`LatencyMode`] picks a [`LatencyProfile`] from the pipeline's
//! [`LatencyTable`]; resolving the profile against a sample rate yields the
//! [`LatencyPolicy`] the pipeline runs with until its next reset.
//!
//! | mode      | target | capacity |
//! |-----------|--------|----------|
//! | File      | 0 ms   | 1000 ms  |
//! | Streaming | 20 ms  | 500 ms   |
//! | Playback  | 200 ms | 2000 ms  |

use crate::compat::{AtomicU8, Ordering};
use crate::{AudioFormat, Error, Result};
use serde::{Deserialize, Serialize};

/// Processing quantum handed to the effect, in milliseconds.
pub const WINDOW_MS: u32 = 10;

/// How much delay the pipeline may add in exchange for resilience against
/// producer/consumer jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum LatencyMode {
    /// Offline processing with no real-time consumer. No added buffering.
    File = 0,
    /// Balanced real-time I/O (e.g. WebRTC). Minimal buffering.
    #[default]
    Streaming = 1,
    /// Intermittent processing or loopback playback. Substantial buffering.
    Playback = 2,
}

impl LatencyMode {
    pub const ALL: [LatencyMode; 3] = [
        LatencyMode::File,
        LatencyMode::Streaming,
        LatencyMode::Playback,
    ];

    #[inline]
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LatencyMode::File,
            2 => LatencyMode::Playback,
            _ => LatencyMode::Streaming,
        }
    }
}

/// Buffering targets for one latency mode, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyProfile {
    /// Audio that must be buffered before output becomes available.
    pub target_ms: u32,
    /// Ring buffer capacity. Pushes past it drop frames.
    pub capacity_ms: u32,
}

impl LatencyProfile {
    pub const fn new(target_ms: u32, capacity_ms: u32) -> Self {
        Self {
            target_ms,
            capacity_ms,
        }
    }
}

/// Per-mode latency profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyTable {
    pub file: LatencyProfile,
    pub streaming: LatencyProfile,
    pub playback: LatencyProfile,
}

impl Default for LatencyTable {
    fn default() -> Self {
        Self {
            file: LatencyProfile::new(0, 1000),
            streaming: LatencyProfile::new(20, 500),
            playback: LatencyProfile::new(200, 2000),
        }
    }
}

impl LatencyTable {
    pub fn profile(&self, mode: LatencyMode) -> LatencyProfile {
        match mode {
            LatencyMode::File => self.file,
            LatencyMode::Streaming => self.streaming,
            LatencyMode::Playback => self.playback,
        }
    }

    pub fn with_profile(mut self, mode: LatencyMode, profile: LatencyProfile) -> Self {
        match mode {
            LatencyMode::File => self.file = profile,
            LatencyMode::Streaming => self.streaming = profile,
            LatencyMode::Playback => self.playback = profile,
        }
        self
    }

    /// Every profile must leave room for its target plus one processing
    /// window.
    pub fn validate(&self) -> Result<()> {
        for mode in LatencyMode::ALL {
            let profile = self.profile(mode);
            if profile.capacity_ms == 0 {
                return Err(Error::InvalidLatency {
                    mode,
                    reason: "capacity must be > 0 ms".into(),
                });
            }
            if profile.target_ms as u64 + WINDOW_MS as u64 > profile.capacity_ms as u64 {
                return Err(Error::InvalidLatency {
                    mode,
                    reason: format!(
                        "target {} ms + {} ms window exceeds capacity {} ms",
                        profile.target_ms, WINDOW_MS, profile.capacity_ms
                    ),
                });
            }
        }
        Ok(())
    }

    /// Resolve `mode` to frame counts at `format`'s sample rate.
    pub fn policy(&self, mode: LatencyMode, format: &AudioFormat) -> LatencyPolicy {
        LatencyPolicy::resolve(mode, self.profile(mode), format)
    }
}

/// Frame-level buffering policy for one latency mode at one sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyPolicy {
    pub mode: LatencyMode,
    /// Frames buffered before the consumer is served. Zero never gates.
    pub target_frames: usize,
    /// Ring buffer capacity in frames.
    pub capacity_frames: usize,
    /// Frames per effect batch.
    pub window_frames: usize,
}

impl LatencyPolicy {
    pub fn resolve(mode: LatencyMode, profile: LatencyProfile, format: &AudioFormat) -> Self {
        let window_frames = format.frames_for_millis(WINDOW_MS).max(1);
        let target_frames = format.frames_for_millis(profile.target_ms);
        let capacity_frames = format
            .frames_for_millis(profile.capacity_ms)
            .max(target_frames + window_frames);

        Self {
            mode,
            target_frames,
            capacity_frames,
            window_frames,
        }
    }

    /// Whether a consumer that has not yet been primed may be served with
    /// `buffered` frames on hand.
    #[inline]
    pub fn is_primed(&self, buffered: usize) -> bool {
        buffered > 0 && buffered >= self.target_frames
    }
}

/// Thread-safe latency mode cell.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicLatencyMode {
    value: AtomicU8,
}

impl AtomicLatencyMode {
    pub fn new(mode: LatencyMode) -> Self {
        Self {
            value: AtomicU8::new(mode as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> LatencyMode {
        LatencyMode::from_u8(self.value.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, mode: LatencyMode) {
        self.value.store(mode as u8, Ordering::Release);
    }
}
