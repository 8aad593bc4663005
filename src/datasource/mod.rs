//! Sample sources.
//!
//! Every component reads sample data through the [`SampleSource`] capability:
//! a random-access window read plus total count, sample rate, and an
//! invalidation channel. The root source is supplied by the host; derived
//! sources (pipelines, the tuner output) implement the same trait.

mod notify;
mod store;

pub use notify::{Listener, Publisher, Subscription};
pub use store::MemorySource;

use crate::view::SampleRange;

/// Random-access window of samples of type `T`.
pub trait SampleSource<T>: Send + Sync {
    /// Total number of samples available.
    fn count(&self) -> i64;

    /// Sample rate in Hz.
    fn rate(&self) -> f64;

    /// Read up to `count` samples starting at absolute `offset`.
    ///
    /// Never fails: the result is the part of `[offset, offset + count)` that
    /// lies inside `[0, self.count())`, so it is shorter near the end of the
    /// stream and empty when the window lies outside it.
    fn read(&self, offset: i64, count: i64) -> Vec<T>;

    /// Register a listener called whenever previously read data may have
    /// changed. The listener stays registered while the handle lives.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Index range of `[offset, offset + count)` clipped to `[0, total)`.
pub fn available_window(offset: i64, count: i64, total: i64) -> std::ops::Range<usize> {
    if count <= 0 || total <= 0 {
        return 0..0;
    }
    let start = offset.max(0);
    let end = offset.saturating_add(count).min(total);
    if start >= end {
        return 0..0;
    }
    start as usize..end as usize
}

/// Samples read for a requested range, tagged with the index of the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow<T> {
    /// Absolute index of `samples[0]`.
    pub start: i64,
    /// The samples that were available.
    pub samples: Vec<T>,
}

impl<T> SampleWindow<T> {
    /// Check whether no samples were available.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Read the available part of `range`, remembering where it starts.
///
/// Callers use this to render only the portion of the view that has data.
pub fn read_window<T>(source: &dyn SampleSource<T>, range: SampleRange) -> SampleWindow<T> {
    let start = range.minimum.max(0);
    let count = range.maximum - start;
    if count <= 0 {
        return SampleWindow {
            start,
            samples: Vec::new(),
        };
    }
    SampleWindow {
        start,
        samples: source.read(start, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_window_truncates_at_end() {
        assert_eq!(available_window(90, 20, 100), 90..100);
        assert_eq!(available_window(100, 20, 100), 0..0);
        assert_eq!(available_window(150, 20, 100), 0..0);
    }

    #[test]
    fn available_window_drops_negative_prefix() {
        assert_eq!(available_window(-5, 10, 100), 0..5);
        assert_eq!(available_window(-20, 10, 100), 0..0);
    }

    #[test]
    fn available_window_degenerate_inputs() {
        assert_eq!(available_window(0, 0, 100), 0..0);
        assert_eq!(available_window(0, 10, 0), 0..0);
        assert_eq!(available_window(0, -3, 100), 0..0);
    }

    #[test]
    fn read_window_reports_start() {
        let source = MemorySource::new(100.0, (0..50).map(|i| i as f32)).expect("valid source");
        let window = read_window(&source, SampleRange::new(-10, 5));
        assert_eq!(window.start, 0);
        assert_eq!(window.samples, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let tail = read_window(&source, SampleRange::new(45, 60));
        assert_eq!((tail.start, tail.samples.len()), (45, 5));
        assert!(read_window(&source, SampleRange::new(60, 70)).is_empty());
    }
}
