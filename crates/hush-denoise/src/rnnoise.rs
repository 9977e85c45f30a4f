//! RNNoise noise suppression as a pipeline [`Effect`].
//!
//! The model runs at 48 kHz on 480-frame frames of `i16`-scaled floats.
//! Streams at other rates are converted to the model rate and back. Every
//! frame received is eventually emitted exactly once: the processed signal
//! is blended with the matching dry frame at the requested power.
//!
//! The model and the converters delay the processed signal. That delay is
//! measured once and the first [`RnnoiseEffect::latency`] processed frames
//! after every reset are discarded, so `wet[t]` always belongs to `dry[t]`.

use crate::error::{Error, Result};
use crate::mix::{blend, PowerRamp};
use crate::rate::RateConverter;
use hush_core::Effect;
use nnnoiseless::DenoiseState;
use std::collections::VecDeque;

/// Rate the model was trained at.
pub const MODEL_SAMPLE_RATE: u32 = 48000;

/// Frames per model step (10 ms at 48 kHz).
pub const MODEL_FRAME: usize = DenoiseState::FRAME_SIZE;

pub const MIN_SAMPLE_RATE: u32 = 8000;
pub const MAX_SAMPLE_RATE: u32 = 192000;

const MODEL_SCALE: f32 = 32768.0;
const POWER_RAMP_SECS: f32 = 0.010;
/// Silence windows fed through the chain to push out the last real frames.
const MAX_TAIL_ROUNDS: usize = 16;

pub struct RnnoiseEffect {
    sample_rate: u32,
    denoiser: Box<DenoiseState<'static>>,
    to_model: Option<RateConverter>,
    from_model: Option<RateConverter>,
    /// Model-rate input awaiting a full frame, `i16` scale.
    model_in: Vec<f32>,
    model_out: Vec<f32>,
    scratch: Vec<f32>,
    /// Processed frames at the stream rate, normalized.
    wet: VecDeque<f32>,
    /// Received frames not yet emitted.
    dry: VecDeque<f32>,
    /// Chain delay in stream frames.
    latency: usize,
    /// Warm-up frames still to discard from the processed stream.
    skip: usize,
    ramp: PowerRamp,
    silence: Vec<f32>,
    voice_probability: f32,
}

impl RnnoiseEffect {
    pub fn new(sample_rate: u32) -> Result<Self> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            return Err(Error::UnsupportedSampleRate(sample_rate));
        }

        let window = (sample_rate / 100).max(1) as usize;
        let (to_model, from_model) = if sample_rate == MODEL_SAMPLE_RATE {
            (None, None)
        } else {
            (
                Some(RateConverter::new(sample_rate, MODEL_SAMPLE_RATE, window)?),
                Some(RateConverter::new(MODEL_SAMPLE_RATE, sample_rate, MODEL_FRAME)?),
            )
        };

        tracing::debug!(
            "RNNoise at {} Hz ({})",
            sample_rate,
            if to_model.is_some() { "resampled" } else { "native" }
        );

        let mut effect = Self {
            sample_rate,
            denoiser: DenoiseState::new(),
            to_model,
            from_model,
            model_in: Vec::with_capacity(MODEL_FRAME * 2),
            model_out: vec![0.0; MODEL_FRAME],
            scratch: Vec::with_capacity(MODEL_FRAME * 2),
            wet: VecDeque::with_capacity(window * 4),
            dry: VecDeque::with_capacity(window * 4),
            latency: 0,
            skip: 0,
            ramp: PowerRamp::new(1.0, POWER_RAMP_SECS, sample_rate),
            silence: vec![0.0; window],
            voice_probability: 0.0,
        };
        effect.latency = effect.chain_latency();
        effect.skip = effect.latency;
        tracing::debug!("RNNoise chain latency {} frames", effect.latency);
        Ok(effect)
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Voice activity estimate from the most recent model frame, `0..=1`.
    #[inline]
    pub fn voice_probability(&self) -> f32 {
        self.voice_probability
    }

    /// Frames of delay added by rate conversion, at the stream rate.
    pub fn conversion_delay(&self) -> usize {
        let inbound = self.to_model.as_ref().map_or(0, |c| {
            (c.delay() as u64 * self.sample_rate as u64 / MODEL_SAMPLE_RATE as u64) as usize
        });
        let outbound = self.from_model.as_ref().map_or(0, RateConverter::delay);
        inbound + outbound
    }

    /// Frames the processed signal lags its input, at the stream rate.
    #[inline]
    pub fn latency(&self) -> usize {
        self.latency
    }

    fn chain_latency(&self) -> usize {
        let model_rate = MODEL_SAMPLE_RATE as u64;
        let at_model_rate = self.to_model.as_ref().map_or(0, RateConverter::delay) + MODEL_FRAME;
        let inbound = (at_model_rate as u64 * self.sample_rate as u64 + model_rate / 2) / model_rate;
        inbound as usize + self.from_model.as_ref().map_or(0, RateConverter::delay)
    }

    /// Run stream-rate `input` through the model; processed frames land in
    /// `wet`.
    fn feed(&mut self, input: &[f32]) {
        self.scratch.clear();
        match self.to_model.as_mut() {
            Some(converter) => {
                if let Err(e) = converter.process(input, &mut self.scratch) {
                    tracing::warn!("Dropping {} frames: {}", input.len(), e);
                }
            }
            None => self.scratch.extend_from_slice(input),
        }
        self.model_in
            .extend(self.scratch.iter().map(|s| s * MODEL_SCALE));

        let mut offset = 0;
        while self.model_in.len() - offset >= MODEL_FRAME {
            let frame = &self.model_in[offset..offset + MODEL_FRAME];
            self.voice_probability = self.denoiser.process_frame(&mut self.model_out, frame);
            offset += MODEL_FRAME;
            self.emit_model_frame();
        }
        self.model_in.drain(..offset);
    }

    fn emit_model_frame(&mut self) {
        self.model_out
            .iter_mut()
            .for_each(|s| *s /= MODEL_SCALE);

        match self.from_model.as_mut() {
            Some(converter) => {
                self.scratch.clear();
                if let Err(e) = converter.process(&self.model_out, &mut self.scratch) {
                    tracing::warn!("Dropping model frame: {}", e);
                }
                Self::extend_wet(&mut self.wet, &mut self.skip, &self.scratch);
            }
            None => Self::extend_wet(&mut self.wet, &mut self.skip, &self.model_out),
        }
    }

    fn extend_wet(wet: &mut VecDeque<f32>, skip: &mut usize, frames: &[f32]) {
        let skipped = (*skip).min(frames.len());
        *skip -= skipped;
        wet.extend(frames[skipped..].iter().copied());
    }

    /// Pair processed frames with their dry counterparts and write the blend.
    fn emit(&mut self, output: &mut [f32]) -> usize {
        let n = output.len().min(self.wet.len()).min(self.dry.len());
        let frames = self.wet.drain(..n).zip(self.dry.drain(..n));
        for (slot, (wet, dry)) in output[..n].iter_mut().zip(frames) {
            *slot = blend(dry, wet, self.ramp.next_frame());
        }
        n
    }

    /// Feed silence until every held dry frame has a processed partner.
    /// The chain holds up to `latency` frames plus staged partial chunks, so
    /// this takes a few windows.
    fn finish(&mut self) {
        let silence = std::mem::take(&mut self.silence);
        let mut rounds = 0;
        while self.wet.len() < self.dry.len() && rounds < MAX_TAIL_ROUNDS {
            self.feed(&silence);
            rounds += 1;
        }
        self.silence = silence;

        if self.wet.len() < self.dry.len() {
            tracing::warn!(
                "Model tail short by {} frames, padding",
                self.dry.len() - self.wet.len()
            );
            self.wet.resize(self.dry.len(), 0.0);
        }
    }
}

impl Effect for RnnoiseEffect {
    fn name(&self) -> &str {
        "rnnoise"
    }

    fn process(&mut self, input: &[f32], power: f32, output: &mut [f32]) -> usize {
        self.ramp.set_target(power);
        self.dry.extend(input.iter().copied());
        self.feed(input);
        self.emit(output)
    }

    fn drain(&mut self, output: &mut [f32]) -> usize {
        if self.dry.is_empty() {
            return 0;
        }
        if self.wet.len() < self.dry.len() {
            self.finish();
        }
        let n = self.emit(output);
        if self.dry.is_empty() {
            self.reset();
        }
        n
    }

    fn pending_frames(&self) -> usize {
        self.dry.len()
    }

    fn reset(&mut self) {
        self.denoiser = DenoiseState::new();
        if let Some(converter) = self.to_model.as_mut() {
            converter.reset();
        }
        if let Some(converter) = self.from_model.as_mut() {
            converter.reset();
        }
        self.model_in.clear();
        self.wet.clear();
        self.dry.clear();
        self.skip = self.latency;
        self.ramp.skip_to_target();
        self.voice_probability = 0.0;
    }
}
