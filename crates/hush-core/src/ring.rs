//! Fixed-capacity SPSC frame ring.
//!
//! [`RingBuffer`] owns both ends for single-threaded use. [`RingBuffer::split`]
//! hands the write end to the producer thread and the read end to the
//! consumer thread. Each end owns its own cursor; the only cross-thread state
//! is the pair of atomic indices inside `ringbuf`, so neither end ever waits
//! on the other.
//!
//! Overrun drops the frames that do not fit. Underrun returns what is there.

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

/// Write end. Exactly one thread may hold it.
pub struct RingWriter {
    producer: HeapProd<f32>,
}

impl RingWriter {
    /// Store as many of `frames` as fit and return how many were stored.
    #[inline]
    pub fn push(&mut self, frames: &[f32]) -> usize {
        self.producer.push_slice(frames)
    }

    #[inline]
    pub fn free_frames(&self) -> usize {
        self.producer.vacant_len()
    }

    #[inline]
    pub fn available_frames(&self) -> usize {
        self.producer.occupied_len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.producer.capacity().get()
    }
}

/// Read end. Exactly one thread may hold it.
pub struct RingReader {
    consumer: HeapCons<f32>,
}

impl RingReader {
    /// Move up to `out.len()` frames into `out`. Never waits for more.
    #[inline]
    pub fn pull(&mut self, out: &mut [f32]) -> usize {
        self.consumer.pop_slice(out)
    }

    #[inline]
    pub fn available_frames(&self) -> usize {
        self.consumer.occupied_len()
    }

    #[inline]
    pub fn free_frames(&self) -> usize {
        self.consumer.vacant_len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.consumer.capacity().get()
    }

    /// Discard every stored frame.
    ///
    /// Must not race a [`RingWriter::push`] on the same ring; the pipeline
    /// only calls it while holding both role locks.
    pub fn reset(&mut self) -> usize {
        self.consumer.clear()
    }
}

/// Both ends of a frame ring.
pub struct RingBuffer {
    writer: RingWriter,
    reader: RingReader,
}

impl RingBuffer {
    /// `capacity` is raised to 1 if zero.
    pub fn new(capacity: usize) -> Self {
        let (producer, consumer) = HeapRb::<f32>::new(capacity.max(1)).split();
        Self {
            writer: RingWriter { producer },
            reader: RingReader { consumer },
        }
    }

    #[inline]
    pub fn push(&mut self, frames: &[f32]) -> usize {
        self.writer.push(frames)
    }

    #[inline]
    pub fn pull(&mut self, out: &mut [f32]) -> usize {
        self.reader.pull(out)
    }

    #[inline]
    pub fn available_frames(&self) -> usize {
        self.reader.available_frames()
    }

    #[inline]
    pub fn free_frames(&self) -> usize {
        self.writer.free_frames()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.writer.capacity()
    }

    pub fn reset(&mut self) {
        self.reader.reset();
    }

    pub fn split(self) -> (RingWriter, RingReader) {
        (self.writer, self.reader)
    }
}
