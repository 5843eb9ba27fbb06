// Fixed-capacity rolling window of timestamped samples
use crate::domain::sample::Timestamped;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 20;

/// Chronological buffer that evicts its oldest entry once full.
#[derive(Debug, Clone)]
pub struct RollingWindowBuffer<S> {
    samples: VecDeque<Timestamped<S>>,
    capacity: usize,
}

impl<S: Clone> RollingWindowBuffer<S> {
    /// A zero capacity is bumped to one so the buffer can always hold the latest sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Timestamped<S>> {
        self.samples.back()
    }

    /// Append, evicting the oldest entry when full. A timestamp older than the
    /// newest entry (wall clock stepping back) is pulled forward to keep order.
    pub fn push(&mut self, mut entry: Timestamped<S>) {
        if let Some(last) = self.samples.back() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(entry);
    }

    /// Swap in a whole new series. Only the newest `capacity` entries are kept.
    ///
    /// Callers build the replacement completely before calling this, so readers
    /// see either the old series or the new one.
    pub fn replace(&mut self, entries: Vec<Timestamped<S>>) {
        debug_assert!(
            entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "replacement series out of order"
        );
        let skip = entries.len().saturating_sub(self.capacity);
        self.samples = entries.into_iter().skip(skip).collect();
    }

    /// Owned copy, oldest first.
    pub fn snapshot(&self) -> Vec<Timestamped<S>> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timestamped<S>> {
        self.samples.iter()
    }
}

impl<S: Clone> Default for RollingWindowBuffer<S> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn values(buffer: &RollingWindowBuffer<u32>) -> Vec<u32> {
        buffer.snapshot().into_iter().map(|e| e.sample).collect()
    }

    #[test]
    fn test_length_is_min_of_pushes_and_capacity() {
        let mut buffer = RollingWindowBuffer::new(5);
        for i in 0..12u32 {
            buffer.push(Timestamped::new(at(i as i64), i));
            assert_eq!(buffer.len(), (i as usize + 1).min(5));
            assert!(buffer.snapshot().len() <= buffer.capacity());
        }
    }

    #[test]
    fn test_fifo_eviction_drops_first_sample() {
        let mut buffer = RollingWindowBuffer::new(DEFAULT_CAPACITY);
        for i in 1..=21u32 {
            buffer.push(Timestamped::new(at(i as i64), i));
        }

        assert_eq!(values(&buffer), (2..=21).collect::<Vec<u32>>());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut buffer = RollingWindowBuffer::new(3);
        buffer.push(Timestamped::new(at(0), 7u32));

        let mut copy = buffer.snapshot();
        copy[0].sample = 99;
        copy.clear();

        assert_eq!(values(&buffer), vec![7]);
    }

    #[test]
    fn test_replace_keeps_newest_entries() {
        let mut buffer = RollingWindowBuffer::new(3);
        buffer.push(Timestamped::new(at(0), 1u32));

        let series = (10..15u32)
            .map(|i| Timestamped::new(at(i as i64), i))
            .collect();
        buffer.replace(series);

        assert_eq!(values(&buffer), vec![12, 13, 14]);
    }

    #[test]
    fn test_late_timestamp_is_pulled_forward() {
        let mut buffer = RollingWindowBuffer::new(3);
        buffer.push(Timestamped::new(at(10), 1u32));
        buffer.push(Timestamped::new(at(4), 2u32));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot[1].timestamp, at(10));
        assert_eq!(snapshot[1].sample, 2);
    }

    #[test]
    fn test_zero_capacity_holds_latest() {
        let mut buffer = RollingWindowBuffer::new(0);
        buffer.push(Timestamped::new(at(0), 1u32));
        buffer.push(Timestamped::new(at(1), 2u32));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(values(&buffer), vec![2]);
    }
}
