//! Push/pull flow control through the public pipeline API.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use hush::prelude::*;

/// With suppression disabled, float audio comes back bit-exact.
#[test]
fn test_float_identity_round_trip() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    let input: Vec<f32> = generate_sine(440.0, TEST_SAMPLE_RATE, 2048)
        .iter()
        .map(|s| s * 0.9)
        .collect();
    let bytes = f32_to_bytes(&input);

    let mut out = vec![0u8; bytes.len()];
    let n = pipeline.process(Some(&bytes), Some(&mut out));
    assert_eq!(n, input.len());
    assert_eq!(out, bytes);
}

#[test]
fn test_int16_identity_round_trip() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::File);
    let mut input = generate_staircase(-1000, 3000);
    input.extend_from_slice(&[i16::MIN, i16::MAX, 0, -1, 1]);
    let bytes = i16_to_bytes(&input);

    assert_eq!(pipeline.push(&bytes), input.len());
    let mut out = vec![0u8; bytes.len()];
    assert_eq!(pipeline.pull(&mut out), input.len());
    assert_eq!(bytes_to_i16(&out), input);
}

/// Passthrough engaged still round-trips int16 exactly through
/// normalization.
#[test]
fn test_int16_round_trip_with_effect_engaged() {
    let config = PipelineConfig::with_format(SampleFormat::SignedInt16, TEST_SAMPLE_RATE)
        .with_latency_mode(LatencyMode::File);
    let pipeline = test_factory()
        .new_pipeline_with_effect(config, Box::new(Passthrough))
        .unwrap();
    assert!(pipeline.noise_suppression_enabled());

    let input = generate_staircase(i16::MIN, 4000);
    let bytes = i16_to_bytes(&input);
    let mut out = vec![0u8; bytes.len()];
    assert_eq!(pipeline.process(Some(&bytes), Some(&mut out)), input.len());
    assert_eq!(bytes_to_i16(&out), input);
}

/// The same signal carried as int16 and as float agrees to within one
/// quantization step.
#[test]
fn test_int16_matches_float_within_quantization() {
    let signal: Vec<f32> = generate_sine(1000.0, TEST_SAMPLE_RATE, 4800)
        .iter()
        .map(|s| s * 0.5)
        .collect();
    let quantized: Vec<i16> = signal
        .iter()
        .map(|s| (s * 32768.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect();

    let float_pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    let mut float_out = vec![0u8; signal.len() * 4];
    let n = float_pipeline.process(Some(&f32_to_bytes(&signal)), Some(&mut float_out));
    assert_eq!(n, signal.len());

    let int_pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::File);
    let mut int_out = vec![0u8; quantized.len() * 2];
    let n = int_pipeline.process(Some(&i16_to_bytes(&quantized)), Some(&mut int_out));
    assert_eq!(n, quantized.len());

    let widened: Vec<f32> = bytes_to_i16(&int_out)
        .iter()
        .map(|&s| s as f32 / 32768.0)
        .collect();
    assert_signals_close(&widened, &bytes_to_f32(&float_out), INT16_EPSILON);
}

#[test]
fn test_float_output_is_clamped() {
    let config = PipelineConfig::with_format(SampleFormat::Float32, TEST_SAMPLE_RATE)
        .with_pcm_float_range(-0.5, 0.5)
        .with_latency_mode(LatencyMode::File);
    let pipeline = identity_pipeline(config);

    let bytes = f32_to_bytes(&[0.8, -0.9, 0.25, 0.5, -0.5]);
    let mut out = vec![0u8; bytes.len()];
    assert_eq!(pipeline.process(Some(&bytes), Some(&mut out)), 5);
    assert_signals_close(
        &bytes_to_f32(&out),
        &[0.5, -0.5, 0.25, 0.5, -0.5],
        FLOAT_EPSILON,
    );
}

#[test]
fn test_overrun_drops_excess() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::File);
    let capacity = pipeline.latency_policy().capacity_frames;
    assert_eq!(capacity, 48000);

    let k = 123;
    let input = generate_staircase(0, capacity + k);
    assert_eq!(pipeline.push(&i16_to_bytes(&input)), capacity);

    let metrics = pipeline.metrics();
    assert_eq!(metrics.frames_pushed, (capacity + k) as u64);
    assert_eq!(metrics.frames_dropped, k as u64);
    assert_eq!(metrics.buffered_frames, capacity);

    // Full buffer: the next push is dropped entirely
    assert_eq!(pipeline.push(&i16_to_bytes(&[1, 2, 3])), 0);

    // What survived is the head of the stream
    let drained = drain_i16(&pipeline, 4096);
    assert_eq!(drained, input[..capacity].to_vec());
}

#[test]
fn test_underrun_returns_available() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    let input = generate_noise(100, 7);
    pipeline.push(&f32_to_bytes(&input));

    let mut out = vec![0u8; 512 * 4];
    assert_eq!(pipeline.pull(&mut out), 100);
    assert_eq!(bytes_to_f32(&out[..400]), input);

    // Never padded: the rest of the buffer is untouched
    assert!(out[400..].iter().all(|&b| b == 0));
    assert_eq!(pipeline.pull(&mut out), 0);
    assert_eq!(pipeline.metrics().underruns, 2);
}

/// Playback mode holds output back until 200 ms are buffered.
#[test]
fn test_playback_priming() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Playback);
    let target = pipeline.latency_policy().target_frames;
    assert_eq!(target, 9600);

    let mut out = vec![0u8; 10 * 2];
    pipeline.push(&i16_to_bytes(&[42]));
    assert_eq!(pipeline.pull(&mut out), 0);

    let rest = generate_staircase(1, target - 2);
    pipeline.push(&i16_to_bytes(&rest));
    assert_eq!(pipeline.buffered_frames(), target - 1);
    assert_eq!(pipeline.pull(&mut out), 0);

    pipeline.push(&i16_to_bytes(&[7]));
    assert_eq!(pipeline.pull(&mut out), 10);
    assert_eq!(bytes_to_i16(&out)[0], 42);

    // Primed: keeps serving below the target
    assert_eq!(pipeline.pull(&mut out), 10);
}

/// In-place processing matches separate input and output buffers.
#[test]
fn test_in_place_matches_separate_buffers() {
    let separate = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Streaming);
    let in_place = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::Streaming);

    let signal = generate_staircase(0, 20_000);
    let mut sizes = [480usize, 512, 333, 1024, 7].iter().cycle();
    let mut offset = 0;

    while offset < signal.len() {
        let frames = (*sizes.next().unwrap()).min(signal.len() - offset);
        let chunk = i16_to_bytes(&signal[offset..offset + frames]);
        offset += frames;

        let mut out = vec![0u8; chunk.len()];
        let a = separate.process(Some(&chunk), Some(&mut out));

        let mut buffer = chunk.clone();
        let b = in_place.process_in_place(&mut buffer, frames, frames);

        assert_eq!(a, b);
        assert_eq!(out[..a * 2], buffer[..b * 2]);
    }

    assert_eq!(drain_i16(&separate, 256), drain_i16(&in_place, 256));
}

#[test]
fn test_in_place_counts_are_clamped() {
    let pipeline = identity_pipeline_in(SampleFormat::SignedInt16, LatencyMode::File);
    let mut buffer = i16_to_bytes(&[1, 2, 3, 4]);

    assert_eq!(pipeline.process_in_place(&mut buffer, 100, 100), 4);
    assert_eq!(bytes_to_i16(&buffer), vec![1, 2, 3, 4]);
    assert_eq!(pipeline.process_in_place(&mut buffer, 0, 0), 0);
}

#[test]
fn test_partial_frames_are_ignored() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    let mut bytes = f32_to_bytes(&[0.25, 0.5]);
    bytes.push(0xff);
    assert_eq!(pipeline.push(&bytes), 2);

    let mut out = vec![0u8; 11];
    assert_eq!(pipeline.pull(&mut out), 2);
    assert_eq!(out[8..], [0, 0, 0]);
}

#[test]
fn test_noop_process() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    assert_eq!(pipeline.process(None, None), 0);
    assert_eq!(pipeline.process(Some(&[]), None), 0);
    assert_eq!(pipeline.state(), PipelineState::Idle);
    assert_eq!(pipeline.metrics(), PipelineMetrics::default());
}

#[test]
fn test_power_is_clamped_and_finite() {
    let pipeline = identity_pipeline_in(SampleFormat::Float32, LatencyMode::File);
    pipeline.set_noise_suppression_power(-3.0);
    assert_eq!(pipeline.noise_suppression_power(), 0.0);
    pipeline.set_noise_suppression_power(0.4);
    pipeline.set_noise_suppression_power(f32::INFINITY);
    assert_relative_eq!(pipeline.noise_suppression_power(), 0.4);
}
