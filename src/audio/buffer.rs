use parking_lot::Mutex;
use ringbuf::{traits::*, HeapRb};
use std::sync::Arc;

struct Inner {
    samples: HeapRb<f32>,
    /// Samples pushed out by newer ones since the last drain or clear
    evicted: usize,
}

/// Recording buffer bounded to the longest allowed question
///
/// Keeps the most recent `capacity` samples. When a recording runs past the
/// limit its beginning is dropped, and `evicted` says how much was lost.
pub struct AudioRingBuffer {
    inner: Arc<Mutex<Inner>>,
}

impl AudioRingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                samples: HeapRb::new(capacity.max(1)),
                evicted: 0,
            })),
        }
    }

    /// Buffer sized for `seconds` of mono audio at `sample_rate`
    pub fn for_duration(seconds: u32, sample_rate: u32) -> Self {
        Self::new(seconds as usize * sample_rate as usize)
    }

    /// Append samples, evicting the oldest when full
    ///
    /// Returns the number of samples accepted, which is always `samples.len()`.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        let mut inner = self.inner.lock();
        let overflow = samples.len().saturating_sub(inner.samples.vacant_len());
        if overflow > 0 {
            let dropped = inner.samples.skip(overflow);
            inner.evicted += dropped;
        }

        // A chunk larger than the whole buffer only keeps its tail
        let capacity = inner.samples.capacity().get();
        let tail = &samples[samples.len().saturating_sub(capacity)..];
        inner.evicted += samples.len() - tail.len();
        inner.samples.push_slice(tail);

        samples.len()
    }

    /// Take every buffered sample, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<f32> {
        let mut inner = self.inner.lock();
        inner.evicted = 0;
        inner.samples.pop_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().samples.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().samples.is_empty()
    }

    pub fn clear(&mut self) {
        let mut inner = self.inner.lock();
        inner.samples.clear();
        inner.evicted = 0;
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().samples.capacity().get()
    }

    /// Samples lost to the length limit since the last drain or clear
    pub fn evicted(&self) -> usize {
        self.inner.lock().evicted
    }
}

impl Clone for AudioRingBuffer {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_drain() {
        let mut buffer = AudioRingBuffer::new(1024);
        let data: Vec<f32> = (0..100).map(|i| i as f32).collect();

        assert_eq!(buffer.write(&data), 100);
        assert_eq!(buffer.len(), 100);

        let drained = buffer.drain();
        assert_eq!(drained, data);
        assert!(buffer.is_empty());
        assert_eq!(buffer.evicted(), 0);
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let mut buffer = AudioRingBuffer::new(10);
        buffer.write(&(0..6).map(|i| i as f32).collect::<Vec<_>>());
        buffer.write(&(6..14).map(|i| i as f32).collect::<Vec<_>>());

        assert_eq!(buffer.evicted(), 4);
        let drained = buffer.drain();
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[0], 4.0);
        assert_eq!(drained[9], 13.0);
    }

    #[test]
    fn test_chunk_larger_than_capacity() {
        let mut buffer = AudioRingBuffer::new(10);
        let data: Vec<f32> = (0..20).map(|i| i as f32).collect();

        assert_eq!(buffer.write(&data), 20);
        assert_eq!(buffer.evicted(), 10);

        let drained = buffer.drain();
        assert_eq!(drained.first(), Some(&10.0));
        assert_eq!(drained.last(), Some(&19.0));
    }

    #[test]
    fn test_for_duration_capacity() {
        let buffer = AudioRingBuffer::for_duration(2, 16000);
        assert_eq!(buffer.capacity(), 32000);
    }

    #[test]
    fn test_clear_resets_eviction() {
        let mut buffer = AudioRingBuffer::new(2);
        buffer.write(&[0.1, 0.2, 0.3]);
        assert_eq!(buffer.evicted(), 1);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.evicted(), 0);
    }
}
