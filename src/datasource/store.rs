//! In-memory sample storage that notifies subscribers when it grows.

use std::sync::RwLock;

use log::debug;

use super::{Listener, Publisher, SampleSource, Subscription, available_window};
use crate::error::SourceError;

/// Append-only in-memory sample source.
///
/// Stands in for a file or device loader: hosts push samples in as they
/// arrive and every append notifies subscribers.
#[derive(Debug)]
pub struct MemorySource<T> {
    samples: RwLock<Vec<T>>,
    rate: f64,
    publisher: Publisher,
}

impl<T: Clone + Send + Sync> MemorySource<T> {
    /// Create a source from existing samples.
    pub fn new(rate: f64, samples: impl IntoIterator<Item = T>) -> Result<Self, SourceError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SourceError::InvalidSampleRate(rate));
        }
        Ok(Self {
            samples: RwLock::new(samples.into_iter().collect()),
            rate,
            publisher: Publisher::new(),
        })
    }

    /// Create an empty source.
    pub fn empty(rate: f64) -> Result<Self, SourceError> {
        Self::new(rate, std::iter::empty())
    }

    /// Create a source by evaluating `f` for each sample index.
    pub fn from_fn(rate: f64, len: usize, f: impl FnMut(usize) -> T) -> Result<Self, SourceError> {
        Self::new(rate, (0..len).map(f))
    }

    /// Append samples and notify subscribers. Returns the number appended.
    pub fn extend(&self, values: impl IntoIterator<Item = T>) -> usize {
        let added = {
            let mut samples = self.samples.write().expect("sample store lock");
            let before = samples.len();
            samples.extend(values);
            samples.len() - before
        };
        if added > 0 {
            debug!("memory source grew by {added} samples");
            self.publisher.notify();
        }
        added
    }

    /// Replace all samples and notify subscribers.
    pub fn replace(&self, values: impl IntoIterator<Item = T>) {
        {
            let mut samples = self.samples.write().expect("sample store lock");
            samples.clear();
            samples.extend(values);
        }
        self.publisher.notify();
    }

    /// Number of samples stored.
    pub fn len(&self) -> usize {
        self.samples.read().expect("sample store lock").len()
    }

    /// Check if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> SampleSource<T> for MemorySource<T> {
    fn count(&self) -> i64 {
        self.len() as i64
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn read(&self, offset: i64, count: i64) -> Vec<T> {
        let samples = self.samples.read().expect("sample store lock");
        let window = available_window(offset, count, samples.len() as i64);
        samples[window].to_vec()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.publisher.subscribe(listener)
    }
}
