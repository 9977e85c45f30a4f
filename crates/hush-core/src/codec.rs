//! Conversion between raw caller buffers and the pipeline's `f32` frames.
//!
//! Frames are kept in the stream's own units: integer streams hold the exact
//! `i16` value, float streams hold the caller's float untouched. This keeps
//! the bypass path bit-exact. The effect sees audio scaled to `[-1, 1]`
//! through [`SampleCodec::normalize`] / [`SampleCodec::denormalize`].

use crate::SampleFormat;

/// Decoder/encoder for one stream format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleCodec {
    format: SampleFormat,
    /// Output clamp bound for float streams.
    float_max: f32,
}

impl SampleCodec {
    /// `float_max` is only used for [`SampleFormat::Float32`].
    pub fn new(format: SampleFormat, float_max: f32) -> Self {
        Self { format, float_max }
    }

    #[inline]
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    #[inline]
    pub fn bytes_per_frame(&self) -> usize {
        self.format.bytes_per_frame()
    }

    /// Magnitude that maps to 1.0 for the effect.
    #[inline]
    pub fn full_scale(&self) -> f32 {
        match self.format {
            SampleFormat::Float32 => self.float_max,
            SampleFormat::SignedInt16 => 32768.0,
        }
    }

    /// Decode whole frames from `bytes` into `frames`; returns frames written.
    pub fn decode(&self, bytes: &[u8], frames: &mut [f32]) -> usize {
        let bpf = self.bytes_per_frame();
        let count = (bytes.len() / bpf).min(frames.len());

        match self.format {
            SampleFormat::Float32 => {
                for (frame, chunk) in frames[..count].iter_mut().zip(bytes.chunks_exact(4)) {
                    *frame = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                }
            }
            SampleFormat::SignedInt16 => {
                for (frame, chunk) in frames[..count].iter_mut().zip(bytes.chunks_exact(2)) {
                    *frame = i16::from_ne_bytes([chunk[0], chunk[1]]) as f32;
                }
            }
        }

        count
    }

    /// Encode `frames` into `bytes`, clamping float output to the configured
    /// range and saturating integer output. NaN encodes as silence. Returns
    /// frames written.
    pub fn encode(&self, frames: &[f32], bytes: &mut [u8]) -> usize {
        let bpf = self.bytes_per_frame();
        let count = frames.len().min(bytes.len() / bpf);

        match self.format {
            SampleFormat::Float32 => {
                let max = self.float_max;
                for (&frame, chunk) in frames[..count].iter().zip(bytes.chunks_exact_mut(4)) {
                    let sample = if frame.is_nan() { 0.0 } else { frame.clamp(-max, max) };
                    chunk.copy_from_slice(&sample.to_ne_bytes());
                }
            }
            SampleFormat::SignedInt16 => {
                for (&frame, chunk) in frames[..count].iter().zip(bytes.chunks_exact_mut(2)) {
                    // `as` saturates and maps NaN to 0.
                    let sample = frame.round() as i16;
                    chunk.copy_from_slice(&sample.to_ne_bytes());
                }
            }
        }

        count
    }

    #[inline]
    pub fn normalize(&self, frames: &mut [f32]) {
        let scale = 1.0 / self.full_scale();
        frames.iter_mut().for_each(|frame| *frame *= scale);
    }

    #[inline]
    pub fn denormalize(&self, frames: &mut [f32]) {
        let scale = self.full_scale();
        frames.iter_mut().for_each(|frame| *frame *= scale);
    }
}
