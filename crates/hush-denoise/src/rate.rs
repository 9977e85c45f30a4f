//! Streaming mono sample rate conversion.
//!
//! `rubato` resamplers work on fixed-size chunks. [`RateConverter`] stages
//! arbitrary-sized input until a chunk is complete, so callers can feed it
//! whatever the pipeline hands them.

use crate::error::Result;
use rubato::{FastFixedIn, PolynomialDegree, Resampler};

pub struct RateConverter {
    resampler: FastFixedIn<f32>,
    from_rate: u32,
    to_rate: u32,
    chunk_size: usize,
    /// Input waiting for a full chunk. Always shorter than `chunk_size`.
    staged: Vec<f32>,
    /// Preallocated single-channel output.
    converted: Vec<Vec<f32>>,
}

impl RateConverter {
    /// Convert from `from_rate` to `to_rate` in chunks of `chunk_size` input
    /// frames.
    pub fn new(from_rate: u32, to_rate: u32, chunk_size: usize) -> Result<Self> {
        let chunk_size = chunk_size.max(1);
        let ratio = to_rate as f64 / from_rate as f64;
        let resampler = FastFixedIn::<f32>::new(ratio, 1.0, PolynomialDegree::Cubic, chunk_size, 1)?;
        let converted = resampler.output_buffer_allocate(true);

        tracing::debug!(
            "Rate converter {} Hz -> {} Hz, chunk {} frames, delay {} frames",
            from_rate,
            to_rate,
            chunk_size,
            resampler.output_delay()
        );

        Ok(Self {
            resampler,
            from_rate,
            to_rate,
            chunk_size,
            staged: Vec::with_capacity(chunk_size),
            converted,
        })
    }

    #[inline]
    pub fn from_rate(&self) -> u32 {
        self.from_rate
    }

    #[inline]
    pub fn to_rate(&self) -> u32 {
        self.to_rate
    }

    /// Output frames the resampler lags behind its input.
    pub fn delay(&self) -> usize {
        self.resampler.output_delay()
    }

    /// Input frames waiting for a complete chunk.
    #[inline]
    pub fn staged_frames(&self) -> usize {
        self.staged.len()
    }

    /// Feed `input`, appending every completed chunk's output to `out`.
    /// Returns frames appended.
    pub fn process(&mut self, mut input: &[f32], out: &mut Vec<f32>) -> Result<usize> {
        let mut appended = 0;
        while !input.is_empty() {
            let take = (self.chunk_size - self.staged.len()).min(input.len());
            self.staged.extend_from_slice(&input[..take]);
            input = &input[take..];

            if self.staged.len() == self.chunk_size {
                appended += self.convert_staged(out)?;
            }
        }
        Ok(appended)
    }

    pub fn reset(&mut self) {
        self.resampler.reset();
        self.staged.clear();
    }

    fn convert_staged(&mut self, out: &mut Vec<f32>) -> Result<usize> {
        let (_, produced) = self.resampler.process_into_buffer(
            core::slice::from_ref(&self.staged),
            &mut self.converted,
            None,
        )?;
        out.extend_from_slice(&self.converted[0][..produced]);
        self.staged.clear();
        Ok(produced)
    }
}
