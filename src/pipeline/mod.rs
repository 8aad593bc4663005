//! Derived sample sources.
//!
//! A [`PipelineSource`] presents a small, fixed chain of [`Stage`]s as a
//! plain [`SampleSource`]. Each read evaluates the chain synchronously over
//! the matching window of the upstream source; nothing is computed in the
//! background and no derived stream is materialized beyond the last window.

mod stages;

pub use stages::{FirFilter, MultiplyConst, QuadratureDemod};
pub(crate) use stages::mixer;

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use log::trace;

use crate::datasource::{
    Listener, Publisher, SampleSource, SampleWindow, Subscription, available_window,
};

/// One block-processing step of a pipeline.
///
/// A stage is a pure function of its input block. It consumes `history()`
/// samples of lead-in, so `n` input samples yield `n - history()` outputs;
/// input shorter than the lead-in yields nothing.
pub trait Stage<I, O>: Send + Sync {
    /// Input samples consumed ahead of the first output sample.
    fn history(&self) -> usize {
        0
    }

    /// Transform a block of input samples.
    fn process(&self, input: &[I]) -> Vec<O>;

    /// Chain another stage after this one.
    fn then<S, P>(self, next: S) -> Chain<Self, S, O>
    where
        Self: Sized,
        S: Stage<O, P>,
    {
        Chain {
            first: self,
            second: next,
            _mid: PhantomData,
        }
    }
}

/// Two stages run back to back.
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

impl<I, M, O, A, B> Stage<I, O> for Chain<A, B, M>
where
    A: Stage<I, M>,
    B: Stage<M, O>,
{
    fn history(&self) -> usize {
        self.first.history() + self.second.history()
    }

    fn process(&self, input: &[I]) -> Vec<O> {
        let mid = self.first.process(input);
        self.second.process(&mid)
    }
}

/// Read `count` samples at `offset` plus `history` samples of lead-in.
///
/// Lead-in before the start of the stream is padded with `T::default()`, so
/// the returned window always starts at `offset - history`. The tail is
/// whatever the upstream could provide.
pub(crate) fn read_with_history<T: Default + Clone>(
    upstream: &dyn SampleSource<T>,
    offset: i64,
    count: i64,
    history: usize,
) -> SampleWindow<T> {
    let start = offset - history as i64;
    let end = offset + count;
    let read_from = start.max(0);
    let padding = (read_from - start) as usize;
    let mut samples = Vec::with_capacity(padding + (end - read_from).max(0) as usize);
    samples.resize(padding, T::default());
    if end > read_from {
        samples.extend(upstream.read(read_from, end - read_from));
    }
    SampleWindow { start, samples }
}

#[derive(Debug)]
struct CachedWindow<O> {
    offset: i64,
    count: i64,
    samples: Vec<O>,
}

/// Transform pipeline adapter: a [`SampleSource`] computed on demand.
///
/// Count and rate are forwarded from upstream. Upstream invalidations clear
/// the cached window and are forwarded to this source's subscribers.
pub struct PipelineSource<I, O> {
    upstream: Arc<dyn SampleSource<I>>,
    stage: Box<dyn Stage<I, O>>,
    cache: Arc<Mutex<Option<CachedWindow<O>>>>,
    publisher: Publisher,
    _upstream_subscription: Subscription,
}

impl<I, O> PipelineSource<I, O>
where
    I: Default + Clone + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    /// Wrap `stage` around `upstream`.
    pub fn new(upstream: Arc<dyn SampleSource<I>>, stage: impl Stage<I, O> + 'static) -> Self {
        let cache: Arc<Mutex<Option<CachedWindow<O>>>> = Arc::new(Mutex::new(None));
        let publisher = Publisher::new();
        let listener: Listener = {
            let cache = Arc::clone(&cache);
            let publisher = publisher.clone();
            Arc::new(move || {
                if let Ok(mut cache) = cache.lock() {
                    *cache = None;
                }
                publisher.notify();
            })
        };
        let subscription = upstream.subscribe(listener);
        Self {
            upstream,
            stage: Box::new(stage),
            cache,
            publisher,
            _upstream_subscription: subscription,
        }
    }

    /// Upstream samples consumed ahead of each output window.
    pub fn history(&self) -> usize {
        self.stage.history()
    }

    fn evaluate(&self, offset: i64, count: i64) -> Vec<O> {
        let history = self.stage.history();
        let input = read_with_history(self.upstream.as_ref(), offset, count, history);
        let mut output = self.stage.process(&input.samples);
        output.truncate(count as usize);
        trace!(
            "pipeline evaluated {} outputs at offset {offset} ({} inputs, history {history})",
            output.len(),
            input.samples.len()
        );
        output
    }
}

impl<I, O> SampleSource<O> for PipelineSource<I, O>
where
    I: Default + Clone + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    fn count(&self) -> i64 {
        self.upstream.count()
    }

    fn rate(&self) -> f64 {
        self.upstream.rate()
    }

    fn read(&self, offset: i64, count: i64) -> Vec<O> {
        let window = available_window(offset, count, self.count());
        if window.is_empty() {
            return Vec::new();
        }
        let offset = window.start as i64;
        let count = window.len() as i64;

        let mut cache = self.cache.lock().expect("pipeline cache lock");
        if let Some(cached) = cache.as_ref()
            && cached.offset == offset
            && cached.count == count
        {
            return cached.samples.clone();
        }
        let samples = self.evaluate(offset, count);
        *cache = Some(CachedWindow {
            offset,
            count,
            samples: samples.clone(),
        });
        samples
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.publisher.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MemorySource;
    use rustfft::num_complex::Complex32;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn constant_store(count: usize) -> Arc<MemorySource<Complex32>> {
        Arc::new(MemorySource::new(1000.0, vec![Complex32::new(1.0, 0.0); count]).unwrap())
    }

    fn constant(count: usize) -> Arc<dyn SampleSource<Complex32>> {
        constant_store(count)
    }

    #[test]
    fn multiply_adapter_scales_constant() {
        let upstream = constant(100);
        let adapter = PipelineSource::new(upstream, MultiplyConst::new(Complex32::new(20.0, 0.0)));
        for (offset, count) in [(0, 1), (13, 40), (60, 40)] {
            let out = adapter.read(offset, count);
            assert_eq!(out.len(), count as usize);
            assert!(out.iter().all(|s| *s == Complex32::new(20.0, 0.0)));
        }
        assert_eq!(adapter.count(), 100);
        assert_eq!(adapter.rate(), 1000.0);
    }

    #[test]
    fn adapter_truncates_at_end_of_stream() {
        let adapter = PipelineSource::new(constant(100), QuadratureDemod::new(1.0));
        assert_eq!(adapter.read(90, 20).len(), 10);
        assert!(adapter.read(100, 20).is_empty());
        assert!(adapter.read(-30, 20).is_empty());
    }

    #[test]
    fn demod_adapter_returns_requested_count() {
        let step = 0.2_f32;
        let upstream: Arc<dyn SampleSource<Complex32>> = Arc::new(
            MemorySource::from_fn(1000.0, 64, |n| Complex32::from_polar(1.0, step * n as f32))
                .unwrap(),
        );
        let adapter = PipelineSource::new(upstream, QuadratureDemod::new(1.0));
        let out = adapter.read(10, 16);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|v| (v - step).abs() < 1e-4));
        // Lead-in before sample 0 is padded, so the first output is aligned and defined.
        let head = adapter.read(0, 4);
        assert_eq!(head.len(), 4);
        assert_eq!(head[0], 0.0);
        assert!((head[1] - step).abs() < 1e-4);
    }

    #[test]
    fn chained_history_adds_up() {
        let chain = MultiplyConst::new(Complex32::new(2.0, 0.0))
            .then(FirFilter::low_pass(0.25, 5))
            .then(QuadratureDemod::new(1.0));
        assert_eq!(Stage::<Complex32, f32>::history(&chain), 5);
        let adapter = PipelineSource::new(constant(50), chain);
        assert_eq!(adapter.history(), 5);
        assert_eq!(adapter.read(20, 10).len(), 10);
    }

    #[test]
    fn upstream_changes_invalidate_cache_and_propagate() {
        let upstream = constant_store(10);
        let adapter = PipelineSource::new(
            Arc::clone(&upstream) as Arc<dyn SampleSource<Complex32>>,
            MultiplyConst::new(Complex32::new(3.0, 0.0)),
        );
        let hits = Arc::new(AtomicUsize::new(0));
        let captured = Arc::clone(&hits);
        let _subscription = adapter.subscribe(Arc::new(move || {
            captured.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(adapter.read(0, 2)[0], Complex32::new(3.0, 0.0));
        upstream.replace(vec![Complex32::new(2.0, 0.0); 10]);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.read(0, 2)[0], Complex32::new(6.0, 0.0));
    }

    #[test]
    fn read_with_history_pads_lead_in() {
        let upstream = MemorySource::from_fn(10.0, 10, |i| i as f32).unwrap();
        let window = read_with_history(&upstream, 1, 3, 3);
        assert_eq!(window.start, -2);
        assert_eq!(window.samples, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }
}
