//! Sample encoding of the frames crossing the pipeline boundary.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Encoding of a single frame in a raw buffer.
///
/// Single-channel only: one frame is one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SampleFormat {
    /// Native-endian `f32`.
    #[default]
    Float32 = 1,
    /// Native-endian `i16`.
    SignedInt16 = 2,
}

impl SampleFormat {
    #[inline]
    pub const fn bytes_per_frame(self) -> usize {
        match self {
            SampleFormat::Float32 => 4,
            SampleFormat::SignedInt16 => 2,
        }
    }
}

/// Description of an audio stream: encoding and sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
}

impl AudioFormat {
    pub const fn new(sample_format: SampleFormat, sample_rate: u32) -> Self {
        Self {
            sample_format,
            sample_rate,
        }
    }

    #[inline]
    pub const fn bytes_per_frame(&self) -> usize {
        self.sample_format.bytes_per_frame()
    }

    /// Whole frames contained in `byte_len` bytes. A trailing partial frame
    /// is not counted.
    #[inline]
    pub const fn frames_in(&self, byte_len: usize) -> usize {
        byte_len / self.bytes_per_frame()
    }

    /// Frames covering `millis` milliseconds at this sample rate.
    pub fn frames_for_millis(&self, millis: u32) -> usize {
        (self.sample_rate as u64 * millis as u64 / 1000) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidFormat("sample_rate must be > 0".into()));
        }
        Ok(())
    }
}
