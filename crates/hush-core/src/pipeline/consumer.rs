//! Pull side: priming gate, then encode straight out of the ring.

use crate::latency::LatencyPolicy;
use crate::ring::RingReader;
use crate::SampleCodec;

pub(crate) struct Consumer {
    reader: RingReader,
    scratch: Vec<f32>,
    policy: LatencyPolicy,
    primed: bool,
}

impl Consumer {
    pub fn new(reader: RingReader, policy: LatencyPolicy) -> Self {
        Self {
            reader,
            scratch: vec![0.0; policy.window_frames.max(1)],
            policy,
            primed: false,
        }
    }

    #[inline]
    pub fn available_frames(&self) -> usize {
        self.reader.available_frames()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.reader.capacity()
    }

    #[cfg(test)]
    pub fn policy(&self) -> LatencyPolicy {
        self.policy
    }

    pub fn replace_reader(&mut self, reader: RingReader) {
        self.reader = reader;
    }

    /// Empty the ring and re-arm priming under `policy`.
    ///
    /// The producer lock must be held.
    pub fn reset(&mut self, policy: LatencyPolicy) -> usize {
        let discarded = self.reader.reset();
        self.policy = policy;
        self.primed = false;
        discarded
    }

    /// Serve up to `requested` frames once primed. A short read re-arms
    /// priming.
    pub fn pull(&mut self, output: &mut [u8], requested: usize, codec: &SampleCodec) -> usize {
        if requested == 0 {
            return 0;
        }
        if !self.primed {
            if !self.policy.is_primed(self.reader.available_frames()) {
                return 0;
            }
            self.primed = true;
        }

        let delivered = self.copy_out(output, requested, codec);
        if delivered < requested {
            self.primed = false;
        }
        delivered
    }

    /// Serve up to `requested` frames regardless of priming.
    pub fn flush(&mut self, output: &mut [u8], requested: usize, codec: &SampleCodec) -> usize {
        self.copy_out(output, requested, codec)
    }

    fn copy_out(&mut self, output: &mut [u8], requested: usize, codec: &SampleCodec) -> usize {
        let bpf = codec.bytes_per_frame();
        let mut delivered = 0;

        while delivered < requested {
            let want = (requested - delivered).min(self.scratch.len());
            let n = self.reader.pull(&mut self.scratch[..want]);
            if n == 0 {
                break;
            }
            codec.encode(&self.scratch[..n], &mut output[delivered * bpf..]);
            delivered += n;
        }

        delivered
    }
}
