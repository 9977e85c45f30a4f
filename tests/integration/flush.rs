//! Flush protocol: draining residue, reset, and effect tails.

use crate::helpers::*;
use hush::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Effect with a fixed delay: holds the last `delay` frames back until
/// drained.
struct DelayLine {
    delay: usize,
    held: Vec<f32>,
    resets: Arc<AtomicUsize>,
}

impl DelayLine {
    fn new(delay: usize) -> (Self, Arc<AtomicUsize>) {
        let resets = Arc::new(AtomicUsize::new(0));
        let effect = Self {
            delay,
            held: Vec::new(),
            resets: Arc::clone(&resets),
        };
        (effect, resets)
    }
}

impl Effect for DelayLine {
    fn name(&self) -> &str {
        "delay-line"
    }

    fn process(&mut self, input: &[f32], _power: f32, output: &mut [f32]) -> usize {
        self.held.extend_from_slice(input);
        let ready = self.held.len().saturating_sub(self.delay).min(output.len());
        output[..ready].copy_from_slice(&self.held[..ready]);
        self.held.drain(..ready);
        ready
    }

    fn drain(&mut self, output: &mut [f32]) -> usize {
        let n = self.held.len().min(output.len());
        output[..n].copy_from_slice(&self.held[..n]);
        self.held.drain(..n);
        n
    }

    fn pending_frames(&self) -> usize {
        self.held.len()
    }

    fn reset(&mut self) {
        self.held.clear();
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}

fn delay_pipeline(delay: usize) -> (Pipeline, Arc<AtomicUsize>) {
    let (effect, resets) = DelayLine::new(delay);
    let config = PipelineConfig::with_format(SampleFormat::SignedInt16, TEST_SAMPLE_RATE)
        .with_latency_mode(LatencyMode::File);
    let pipeline = test_factory()
        .new_pipeline_with_effect(config, Box::new(effect))
        .unwrap();
    (pipeline, resets)
}

#[test]
fn test_flush_none_is_idempotent() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Streaming);
    pipeline.push(&i16_to_bytes(&generate_staircase(0, 5000)));

    assert_eq!(pipeline.flush(None), 0);
    assert_eq!(pipeline.state(), PipelineState::Idle);
    assert_eq!(pipeline.buffered_frames(), 0);

    assert_eq!(pipeline.flush(None), 0);
    assert_eq!(pipeline.state(), PipelineState::Idle);
    assert_eq!(pipeline.buffered_frames(), 0);
}

#[test]
fn test_flush_empty_output_resets() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    pipeline.push(&f32_to_bytes(&[0.1; 64]));

    let mut empty: [u8; 0] = [];
    assert_eq!(pipeline.flush(Some(&mut empty)), 0);
    assert_eq!(pipeline.buffered_frames(), 0);

    // Shorter than one frame counts as empty too
    pipeline.push(&f32_to_bytes(&[0.1; 64]));
    assert_eq!(pipeline.flush(Some(&mut [0u8; 3])), 0);
    assert_eq!(pipeline.state(), PipelineState::Idle);
}

/// Repeated flushes hand out full chunks, then the remainder, then reset.
#[test]
fn test_flush_drains_in_order() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Playback);
    let input = generate_staircase(0, 1000);
    pipeline.push(&i16_to_bytes(&input));

    let k = 300;
    let mut out = vec![0u8; k * 2];
    let mut drained = Vec::new();
    for _ in 0..3 {
        assert_eq!(pipeline.flush(Some(&mut out)), k);
        assert_eq!(pipeline.state(), PipelineState::Draining);
        drained.extend(bytes_to_i16(&out));
    }

    assert_eq!(pipeline.flush(Some(&mut out)), 100);
    drained.extend(bytes_to_i16(&out[..200]));
    assert_eq!(pipeline.state(), PipelineState::Idle);
    assert_eq!(drained, input);

    // Already drained
    assert_eq!(pipeline.flush(Some(&mut out)), 0);
}

/// Flush ignores priming: buffered audio below the target still comes out.
#[test]
fn test_flush_bypasses_priming() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Playback);
    pipeline.push(&i16_to_bytes(&[5, 6, 7]));

    let mut out = vec![0u8; 20];
    assert_eq!(pipeline.pull(&mut out), 0);
    assert_eq!(pipeline.flush(Some(&mut out)), 3);
    assert_eq!(bytes_to_i16(&out[..6]), vec![5, 6, 7]);
}

#[test]
fn test_io_while_draining_discards_residue() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::File);
    pipeline.push(&i16_to_bytes(&generate_staircase(0, 100)));

    let mut out = vec![0u8; 20];
    assert_eq!(pipeline.flush(Some(&mut out)), 10);
    assert_eq!(pipeline.state(), PipelineState::Draining);

    let mut out = vec![0u8; 20];
    assert_eq!(pipeline.process(Some(&i16_to_bytes(&[-9, -8])), Some(&mut out)), 2);
    assert_eq!(bytes_to_i16(&out[..4]), vec![-9, -8]);
    assert_eq!(pipeline.state(), PipelineState::Active);
}

/// Frames the effect still holds come out of flush after everything else.
#[test]
fn test_flush_emits_effect_tail() {
    let (pipeline, resets) = delay_pipeline(64);
    let input = generate_staircase(100, 1000);
    pipeline.push(&i16_to_bytes(&input));
    assert_eq!(pipeline.buffered_frames(), 1000 - 64);

    let drained = drain_i16(&pipeline, 128);
    assert_eq!(drained, input);
    assert_eq!(pipeline.state(), PipelineState::Idle);
    assert!(resets.load(Ordering::Relaxed) >= 1);
}

/// Overrun is decided when frames are pushed: whatever the effect still
/// holds already has its place in the buffer.
#[test]
fn test_overrun_with_effect_tail_reports_exact_acceptance() {
    let (pipeline, _) = delay_pipeline(64);
    let capacity = pipeline.latency_policy().capacity_frames;
    let input = generate_staircase(0, capacity + 500);

    assert_eq!(pipeline.push(&i16_to_bytes(&input)), capacity);
    assert_eq!(pipeline.buffered_frames(), capacity - 64);
    assert_eq!(pipeline.metrics().frames_dropped, 500);

    let drained = drain_i16(&pipeline, 4096);
    assert_eq!(drained, input[..capacity]);
}

/// Turning suppression off mid-stream flushes the held frames first, so
/// nothing is lost or reordered.
#[test]
fn test_disable_preserves_order() {
    let (pipeline, _) = delay_pipeline(200);
    let first = generate_staircase(0, 500);
    let second = generate_staircase(500, 500);

    pipeline.push(&i16_to_bytes(&first));
    assert_eq!(pipeline.buffered_frames(), 300);

    pipeline.set_noise_suppression_enabled(false);
    pipeline.push(&i16_to_bytes(&second));
    assert_eq!(pipeline.buffered_frames(), 1000);

    let drained = drain_i16(&pipeline, 256);
    let expected: Vec<i16> = first.iter().chain(&second).copied().collect();
    assert_eq!(drained, expected);
}

/// Turning suppression back on starts the effect from a clean slate.
#[test]
fn test_enable_resets_effect() {
    let (pipeline, resets) = delay_pipeline(10);
    pipeline.set_noise_suppression_enabled(false);
    pipeline.push(&i16_to_bytes(&[1, 2, 3]));
    let before = resets.load(Ordering::Relaxed);

    pipeline.set_noise_suppression_enabled(true);
    pipeline.push(&i16_to_bytes(&generate_staircase(4, 20)));
    assert_eq!(resets.load(Ordering::Relaxed), before + 1);
    assert_eq!(pipeline.buffered_frames(), 3 + 10);
}
