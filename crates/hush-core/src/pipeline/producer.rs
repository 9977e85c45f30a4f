//! Push side: decode, run the effect in window-sized batches, store.

use crate::effect::Effect;
use crate::params::EffectParams;
use crate::ring::RingWriter;
use crate::SampleCodec;

/// Frames offered by a push and frames lost to overrun.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PushOutcome {
    pub offered: usize,
    pub dropped: usize,
}

impl PushOutcome {
    #[inline]
    pub fn accepted(&self) -> usize {
        self.offered.saturating_sub(self.dropped)
    }
}

pub(crate) struct Producer {
    writer: RingWriter,
    effect: Box<dyn Effect>,
    /// One window of decoded input.
    decoded: Vec<f32>,
    /// Effect output. Twice the window so a lagging effect can catch up.
    processed: Vec<f32>,
    /// Whether the effect is currently in the signal path.
    engaged: bool,
}

impl Producer {
    pub fn new(
        writer: RingWriter,
        effect: Box<dyn Effect>,
        window_frames: usize,
        engaged: bool,
    ) -> Self {
        let window_frames = window_frames.max(1);
        Self {
            writer,
            effect,
            decoded: vec![0.0; window_frames],
            processed: vec![0.0; window_frames * 2],
            engaged,
        }
    }

    pub fn effect_name(&self) -> &str {
        self.effect.name()
    }

    pub fn replace_writer(&mut self, writer: RingWriter) {
        self.writer = writer;
    }

    /// Drop effect history and resynchronize with the enable flag.
    pub fn reset(&mut self, engaged: bool) {
        self.effect.reset();
        self.engaged = engaged;
    }

    pub fn push(&mut self, input: &[u8], codec: &SampleCodec, params: &EffectParams) -> PushOutcome {
        let mut outcome = PushOutcome::default();
        let batch_bytes = self.decoded.len() * codec.bytes_per_frame();

        for chunk in input.chunks(batch_bytes) {
            let frames = codec.decode(chunk, &mut self.decoded);
            if frames == 0 {
                continue;
            }
            outcome.offered += frames;

            let snapshot = params.snapshot();
            outcome.dropped += self.engage(snapshot.enabled, codec);

            if self.engaged {
                // Admit only what fits alongside the frames the effect holds
                let room = self.writer.free_frames().saturating_sub(self.effect.pending_frames());
                let admitted = frames.min(room);
                outcome.dropped += frames - admitted;
                if admitted == 0 {
                    continue;
                }
                let batch = &mut self.decoded[..admitted];
                codec.normalize(batch);
                let produced = self.effect.process(batch, snapshot.power, &mut self.processed);
                outcome.dropped += self.store_processed(produced, codec);
            } else {
                let stored = self.writer.push(&self.decoded[..frames]);
                outcome.dropped += frames - stored;
            }
        }

        outcome
    }

    /// Move whatever the effect still holds into the ring. Returns frames
    /// lost to overrun.
    pub fn drain_effect(&mut self, codec: &SampleCodec) -> usize {
        if !self.engaged {
            return 0;
        }
        let mut dropped = 0;
        loop {
            let produced = self.effect.drain(&mut self.processed);
            if produced == 0 {
                break;
            }
            dropped += self.store_processed(produced, codec);
        }
        dropped
    }

    fn engage(&mut self, enabled: bool, codec: &SampleCodec) -> usize {
        if enabled == self.engaged {
            return 0;
        }
        let dropped = if enabled {
            self.effect.reset();
            0
        } else {
            self.drain_effect(codec)
        };
        self.engaged = enabled;
        tracing::trace!("{} {}", self.effect.name(), if enabled { "engaged" } else { "bypassed" });
        dropped
    }

    fn store_processed(&mut self, produced: usize, codec: &SampleCodec) -> usize {
        let produced = produced.min(self.processed.len());
        let frames = &mut self.processed[..produced];
        codec.denormalize(frames);
        produced - self.writer.push(frames)
    }
}
