//! The audio effect the pipeline runs over buffered input.

/// Streaming transform applied to each processing batch.
///
/// Frames arrive normalized to `[-1, 1]` full scale. An implementation may
/// keep history across calls (and therefore emit fewer frames than it
/// receives while it fills a window, or more while it catches up), but it
/// must never write more than `output.len()` frames in one call. The
/// pipeline always passes an `output` at least as long as `input`.
///
/// All calls come from the producer thread, or from `flush` while the
/// producer is quiescent.
pub trait Effect: Send {
    fn name(&self) -> &str;

    /// Transform `input` at strength `power` (`0.0..=1.0`) and return the
    /// number of frames written to `output`.
    fn process(&mut self, input: &[f32], power: f32, output: &mut [f32]) -> usize;

    /// Emit frames still held from earlier `process` calls. Called
    /// repeatedly until it returns 0.
    fn drain(&mut self, _output: &mut [f32]) -> usize {
        0
    }

    /// Frames received but not yet emitted. The producer keeps this much
    /// buffer room free, so an effect never emits more frames than it received.
    fn pending_frames(&self) -> usize {
        0
    }

    /// Forget all streaming history.
    fn reset(&mut self);
}

/// Identity effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Effect for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn process(&mut self, input: &[f32], _power: f32, output: &mut [f32]) -> usize {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        n
    }

    fn reset(&mut self) {}
}
