//! Flow-control counters for a pipeline.
//!
//! Overruns and underruns are policy, not errors, so they are only visible
//! here. Counters are relaxed atomics: cheap on the audio path, readable
//! from any thread, and only eventually consistent with each other.

use crate::compat::{AtomicU64, Ordering};

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineMetrics {
    /// Frames offered by the producer.
    pub frames_pushed: u64,
    /// Frames discarded because the buffer was full.
    pub frames_dropped: u64,
    /// Frames delivered to the consumer, including by flush.
    pub frames_pulled: u64,
    /// Pulls that returned fewer frames than requested.
    pub underruns: u64,
    /// Buffer resets (completed flushes and latency mode changes).
    pub resets: u64,
    /// Frames currently buffered.
    pub buffered_frames: usize,
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    frames_pushed: AtomicU64,
    frames_dropped: AtomicU64,
    frames_pulled: AtomicU64,
    underruns: AtomicU64,
    resets: AtomicU64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_push(&self, offered: usize, dropped: usize) {
        self.frames_pushed.fetch_add(offered as u64, Ordering::Relaxed);
        if dropped > 0 {
            self.frames_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
            tracing::trace!("Overrun: dropped {} of {} frames", dropped, offered);
        }
    }

    #[inline]
    pub fn record_pull(&self, requested: usize, delivered: usize) {
        self.frames_pulled.fetch_add(delivered as u64, Ordering::Relaxed);
        if delivered < requested {
            self.underruns.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Underrun: delivered {} of {} frames", delivered, requested);
        }
    }

    #[inline]
    pub fn record_flush_output(&self, delivered: usize) {
        self.frames_pulled.fetch_add(delivered as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, buffered_frames: usize) -> PipelineMetrics {
        PipelineMetrics {
            frames_pushed: self.frames_pushed.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            frames_pulled: self.frames_pulled.load(Ordering::Relaxed),
            underruns: self.underruns.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            buffered_frames,
        }
    }
}
