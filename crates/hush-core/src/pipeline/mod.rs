//! The push → effect → ring → pull pipeline.
//!
//! A [`Pipeline`] is shared by reference between one producer thread calling
//! [`Pipeline::push`] and one consumer thread calling [`Pipeline::pull`], or
//! driven from a single thread with [`Pipeline::process`]. Each role's state
//! sits behind its own lock, so the two roles never wait on each other; the
//! ring between them is wait-free. Properties are atomics and may be set from
//! any thread at any time.
//!
//! [`Pipeline::flush`] takes both role locks and must not overlap with
//! `process`/`push`/`pull` calls.

mod consumer;
mod producer;
mod state;

pub use state::{PipelineEvent, PipelineState};

use consumer::Consumer;
use producer::Producer;
use state::AtomicPipelineState;

use crate::auth::AuthorizationContext;
use crate::compat::Mutex;
use crate::effect::Effect;
use crate::latency::{AtomicLatencyMode, LatencyMode, LatencyPolicy, LatencyTable};
use crate::params::EffectParams;
use crate::ring::RingBuffer;
use crate::stats::{PipelineMetrics, PipelineStats};
use crate::{AudioFormat, Error, PipelineConfig, Result, SampleCodec};

pub struct Pipeline {
    format: AudioFormat,
    codec: SampleCodec,
    latency_table: LatencyTable,
    /// Mode set by the host; becomes active at the next reset.
    requested_mode: AtomicLatencyMode,
    active_mode: AtomicLatencyMode,
    params: EffectParams,
    state: AtomicPipelineState,
    producer: Mutex<Producer>,
    consumer: Mutex<Consumer>,
    stats: PipelineStats,
}

impl Pipeline {
    /// Build a pipeline around `effect`.
    ///
    /// Fails with [`Error::NotAuthorized`] unless `auth` currently reports
    /// an active license, and with a configuration error if `config` does
    /// not validate.
    pub fn new(
        config: PipelineConfig,
        effect: Box<dyn Effect>,
        auth: &AuthorizationContext,
    ) -> Result<Self> {
        let status = auth.status();
        if !auth.is_active() {
            return Err(Error::NotAuthorized { status });
        }
        config.validate()?;

        let format = config.input_format;
        let mode = config.latency_mode;
        let policy = config.latency_table.policy(mode, &format);
        let codec = SampleCodec::new(format.sample_format, config.pcm_float_max);
        let params = EffectParams::default();

        let (writer, reader) = RingBuffer::new(policy.capacity_frames).split();
        let producer = Producer::new(writer, effect, policy.window_frames, params.enabled());
        let consumer = Consumer::new(reader, policy);

        tracing::debug!(
            "Created pipeline: {:?} @ {} Hz, effect '{}', {:?} (target {} / capacity {} frames)",
            format.sample_format,
            format.sample_rate,
            producer.effect_name(),
            mode,
            policy.target_frames,
            policy.capacity_frames
        );

        Ok(Self {
            format,
            codec,
            latency_table: config.latency_table,
            requested_mode: AtomicLatencyMode::new(mode),
            active_mode: AtomicLatencyMode::new(mode),
            params,
            state: AtomicPipelineState::new(),
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
            stats: PipelineStats::new(),
        })
    }

    /// Push `input` and/or pull into `output` in one call.
    ///
    /// Input is fully consumed before output is produced. Returns frames
    /// written to `output`; `(None, None)` is a no-op returning 0.
    pub fn process(&self, input: Option<&[u8]>, output: Option<&mut [u8]>) -> usize {
        if let Some(input) = input {
            self.push(input);
        }
        match output {
            Some(output) => self.pull(output),
            None => 0,
        }
    }

    /// Variant of [`process`](Self::process) where input and output share
    /// `buffer`. The first `input_frames` frames are pushed, then up to
    /// `output_frames` frames are pulled into the front of `buffer`. Counts
    /// are clamped to the frames `buffer` holds.
    pub fn process_in_place(
        &self,
        buffer: &mut [u8],
        input_frames: usize,
        output_frames: usize,
    ) -> usize {
        let bpf = self.format.bytes_per_frame();
        let frames = self.format.frames_in(buffer.len());

        let input_frames = input_frames.min(frames);
        if input_frames > 0 {
            self.push(&buffer[..input_frames * bpf]);
        }

        let output_frames = output_frames.min(frames);
        if output_frames == 0 {
            return 0;
        }
        self.pull(&mut buffer[..output_frames * bpf])
    }

    /// Producer half. Returns frames accepted; the rest were dropped because
    /// the buffer was full. A trailing partial frame is ignored.
    ///
    /// Frames the effect is still holding count as accepted: the buffer keeps
    /// room for them, so they reach the consumer on a later push or flush.
    pub fn push(&self, input: &[u8]) -> usize {
        self.settle();

        let outcome = {
            let mut producer = self.producer.lock();
            let outcome = producer.push(input, &self.codec, &self.params);
            if outcome.offered == 0 {
                return 0;
            }
            // Buffered frames and an Idle state are never observable together
            self.state.transition(PipelineEvent::Io);
            outcome
        };

        self.stats.record_push(outcome.offered, outcome.dropped);
        outcome.accepted()
    }

    /// Consumer half. Returns frames written to the front of `output`, which
    /// may be fewer than it holds (never padded).
    pub fn pull(&self, output: &mut [u8]) -> usize {
        self.settle();

        let requested = self.format.frames_in(output.len());
        if requested == 0 {
            return 0;
        }

        let delivered = {
            let mut consumer = self.consumer.lock();
            let delivered = consumer.pull(output, requested, &self.codec);
            self.state.transition(PipelineEvent::Io);
            delivered
        };
        self.stats.record_pull(requested, delivered);
        delivered
    }

    /// Drain buffered audio without accepting input.
    ///
    /// Call repeatedly with the same output size: every call that fills
    /// `output` leaves the pipeline [`Draining`](PipelineState::Draining);
    /// the first call that returns fewer frames than `output` holds resets
    /// it to [`Idle`](PipelineState::Idle). `None` or an empty buffer
    /// discards everything and resets immediately.
    pub fn flush(&self, output: Option<&mut [u8]>) -> usize {
        let mut producer = self.producer.lock();
        let mut consumer = self.consumer.lock();

        let requested = output
            .as_deref()
            .map_or(0, |output| self.format.frames_in(output.len()));
        let output = match output {
            Some(output) if requested > 0 => output,
            _ => {
                self.reset_locked(&mut producer, &mut consumer);
                return 0;
            }
        };

        if self.state.get() != PipelineState::Draining {
            let dropped = producer.drain_effect(&self.codec);
            self.stats.record_push(0, dropped);
        }

        let delivered = consumer.flush(output, requested, &self.codec);
        self.stats.record_flush_output(delivered);

        if delivered < requested {
            self.reset_locked(&mut producer, &mut consumer);
        } else {
            self.state.transition(PipelineEvent::DrainStarted);
        }
        delivered
    }

    /// Apply deferred work before I/O: discard a half-finished drain, or
    /// switch to a latency mode requested while idle.
    fn settle(&self) {
        if !self.needs_reset() {
            return;
        }
        let mut producer = self.producer.lock();
        let mut consumer = self.consumer.lock();
        if self.needs_reset() {
            self.reset_locked(&mut producer, &mut consumer);
        }
    }

    #[inline]
    fn needs_reset(&self) -> bool {
        match self.state.get() {
            PipelineState::Draining => true,
            PipelineState::Idle => self.requested_mode.get() != self.active_mode.get(),
            PipelineState::Active => false,
        }
    }

    /// Both role locks must be held.
    fn reset_locked(&self, producer: &mut Producer, consumer: &mut Consumer) {
        let mode = self.requested_mode.get();
        let policy = self.latency_table.policy(mode, &self.format);

        let discarded = if policy.capacity_frames != consumer.capacity() {
            let discarded = consumer.available_frames();
            let (writer, reader) = RingBuffer::new(policy.capacity_frames).split();
            producer.replace_writer(writer);
            consumer.replace_reader(reader);
            discarded
        } else {
            0
        };
        let discarded = discarded + consumer.reset(policy);
        producer.reset(self.params.enabled());

        let previous = self.active_mode.get();
        if previous != mode {
            self.active_mode.set(mode);
            tracing::debug!(
                "Latency mode {:?} -> {:?} (target {} / capacity {} frames)",
                previous,
                mode,
                policy.target_frames,
                policy.capacity_frames
            );
        }

        self.state.transition(PipelineEvent::Reset);
        self.stats.record_reset();
        tracing::debug!("Pipeline reset, discarded {} frames", discarded);
    }

    pub fn noise_suppression_enabled(&self) -> bool {
        self.params.enabled()
    }

    /// Applied from the next processing batch. Disabling first flushes the
    /// effect's held output into the buffer.
    pub fn set_noise_suppression_enabled(&self, enabled: bool) {
        self.params.set_enabled(enabled);
    }

    pub fn noise_suppression_power(&self) -> f32 {
        self.params.power()
    }

    /// Clamped to `[0, 1]`; non-finite values are ignored.
    pub fn set_noise_suppression_power(&self, power: f32) {
        self.params.set_power(power);
    }

    /// The most recently requested mode, which may not be active yet.
    pub fn latency_mode(&self) -> LatencyMode {
        self.requested_mode.get()
    }

    /// Takes effect on the next call if the pipeline is idle, otherwise at
    /// the reset that ends the next flush.
    pub fn set_latency_mode(&self, mode: LatencyMode) {
        self.requested_mode.set(mode);
        if mode != self.active_mode.get() {
            tracing::debug!("Latency mode {:?} requested in state {:?}", mode, self.state());
        }
    }

    pub fn active_latency_mode(&self) -> LatencyMode {
        self.active_mode.get()
    }

    pub fn latency_policy(&self) -> LatencyPolicy {
        self.latency_table
            .policy(self.active_mode.get(), &self.format)
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state.get()
    }

    #[inline]
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    /// Takes the consumer lock briefly; not meant for the audio thread.
    pub fn buffered_frames(&self) -> usize {
        self.consumer.lock().available_frames()
    }

    /// Counter snapshot. Takes the consumer lock briefly.
    pub fn metrics(&self) -> PipelineMetrics {
        self.stats.snapshot(self.buffered_frames())
    }
}

impl core::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pipeline")
            .field("format", &self.format)
            .field("state", &self.state())
            .field("latency_mode", &self.active_latency_mode())
            .field("params", &self.params.snapshot())
            .finish_non_exhaustive()
    }
}
