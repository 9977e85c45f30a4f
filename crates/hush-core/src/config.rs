//! Pipeline construction parameters.

use crate::{AudioFormat, Error, LatencyMode, LatencyTable, Result, SampleFormat};
use serde::{Deserialize, Serialize};

/// Configuration consumed once by pipeline creation.
///
/// The output format is always the input format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub input_format: AudioFormat,
    /// Lower bound for PCM float output. Only used with [`SampleFormat::Float32`].
    pub pcm_float_min: f32,
    /// Upper bound for PCM float output; must equal `-pcm_float_min`.
    pub pcm_float_max: f32,
    #[serde(default)]
    pub latency_table: LatencyTable,
    #[serde(default)]
    pub latency_mode: LatencyMode,
}

impl PipelineConfig {
    pub fn new(input_format: AudioFormat) -> Self {
        Self {
            input_format,
            pcm_float_min: -1.0,
            pcm_float_max: 1.0,
            latency_table: LatencyTable::default(),
            latency_mode: LatencyMode::default(),
        }
    }

    pub fn with_format(sample_format: SampleFormat, sample_rate: u32) -> Self {
        Self::new(AudioFormat::new(sample_format, sample_rate))
    }

    pub fn with_pcm_float_range(mut self, min: f32, max: f32) -> Self {
        self.pcm_float_min = min;
        self.pcm_float_max = max;
        self
    }

    pub fn with_latency_table(mut self, table: LatencyTable) -> Self {
        self.latency_table = table;
        self
    }

    /// Default: [`LatencyMode::Streaming`]
    pub fn with_latency_mode(mut self, mode: LatencyMode) -> Self {
        self.latency_mode = mode;
        self
    }

    /// Symmetric output clamp for float streams, `None` for integer streams.
    pub fn float_clamp(&self) -> Option<f32> {
        match self.input_format.sample_format {
            SampleFormat::Float32 => Some(self.pcm_float_max),
            SampleFormat::SignedInt16 => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.input_format.validate()?;

        if self.input_format.sample_format == SampleFormat::Float32 {
            let (min, max) = (self.pcm_float_min, self.pcm_float_max);
            if !min.is_finite() || !max.is_finite() || max <= 0.0 || min != -max {
                return Err(Error::InvalidClampRange { min, max });
            }
        }

        self.latency_table.validate()
    }
}
