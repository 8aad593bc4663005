//! Frequency tuner: the spectrogram's tunable output.

use std::sync::{Arc, Mutex, RwLock};

use log::debug;
use rustfft::num_complex::Complex32;

use crate::datasource::{Listener, Publisher, SampleSource, Subscription, available_window};
use crate::pipeline::{FirFilter, Stage, mixer, read_with_history};

const MIN_DEVIATION: f64 = 1e-4;

/// Centre frequency and half-bandwidth, both in cycles per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunerSettings {
    /// Centre frequency in `[-0.5, 0.5]`.
    pub centre: f64,
    /// Half-bandwidth in `(0, 0.5]`.
    pub deviation: f64,
}

impl TunerSettings {
    /// Create settings clamped into their valid ranges.
    pub fn new(centre: f64, deviation: f64) -> Self {
        Self {
            centre: centre.clamp(-0.5, 0.5),
            deviation: deviation.clamp(MIN_DEVIATION, 0.5),
        }
    }
}

/// Upstream samples mixed down by the tuner centre and low-passed to the
/// tuner band.
///
/// The mixer phase comes from the absolute sample index, so any window reads
/// the same values regardless of where a request starts. The low-pass filter
/// reads `taps - 1` samples of lead-in from upstream.
pub struct TunerOutput {
    upstream: Arc<dyn SampleSource<Complex32>>,
    settings: RwLock<TunerSettings>,
    taps: usize,
    filter: Mutex<Option<(f64, Arc<FirFilter>)>>,
    publisher: Publisher,
    _upstream_subscription: Subscription,
}

impl TunerOutput {
    /// Create a tuner over `upstream`.
    pub fn new(
        upstream: Arc<dyn SampleSource<Complex32>>,
        settings: TunerSettings,
        taps: usize,
    ) -> Self {
        let publisher = Publisher::new();
        let forward = publisher.clone();
        let listener: Listener = Arc::new(move || forward.notify());
        let subscription = upstream.subscribe(listener);
        Self {
            upstream,
            settings: RwLock::new(settings),
            taps,
            filter: Mutex::new(None),
            publisher,
            _upstream_subscription: subscription,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> TunerSettings {
        *self.settings.read().expect("tuner settings lock")
    }

    /// Replace the settings and notify subscribers if they changed.
    pub fn set_settings(&self, settings: TunerSettings) {
        let settings = TunerSettings::new(settings.centre, settings.deviation);
        {
            let mut current = self.settings.write().expect("tuner settings lock");
            if *current == settings {
                return;
            }
            *current = settings;
        }
        debug!(
            "tuner moved to centre {:.4}, deviation {:.4}",
            settings.centre, settings.deviation
        );
        self.publisher.notify();
    }

    fn filter_for(&self, deviation: f64) -> Arc<FirFilter> {
        let mut cached = self.filter.lock().expect("tuner filter lock");
        if let Some((cached_deviation, filter)) = cached.as_ref()
            && *cached_deviation == deviation
        {
            return Arc::clone(filter);
        }
        let filter = Arc::new(FirFilter::low_pass(deviation, self.taps));
        *cached = Some((deviation, Arc::clone(&filter)));
        filter
    }
}

impl SampleSource<Complex32> for TunerOutput {
    fn count(&self) -> i64 {
        self.upstream.count()
    }

    fn rate(&self) -> f64 {
        self.upstream.rate()
    }

    fn read(&self, offset: i64, count: i64) -> Vec<Complex32> {
        let window = available_window(offset, count, self.count());
        if window.is_empty() {
            return Vec::new();
        }
        let offset = window.start as i64;
        let count = window.len() as i64;
        let settings = self.settings();
        let filter = self.filter_for(settings.deviation);

        let input = read_with_history(self.upstream.as_ref(), offset, count, filter.history());
        let mixed: Vec<Complex32> = input
            .samples
            .iter()
            .enumerate()
            .map(|(k, sample)| *sample * mixer(settings.centre, input.start + k as i64))
            .collect();
        let mut output = filter.process(&mixed);
        output.truncate(count as usize);
        output
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.publisher.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MemorySource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tone(frequency: f32, len: usize) -> Arc<dyn SampleSource<Complex32>> {
        Arc::new(
            MemorySource::from_fn(1000.0, len, |n| {
                Complex32::from_polar(1.0, 2.0 * std::f32::consts::PI * frequency * n as f32)
            })
            .unwrap(),
        )
    }

    #[test]
    fn settings_are_clamped() {
        let settings = TunerSettings::new(0.9, 0.0);
        assert_eq!(settings.centre, 0.5);
        assert_eq!(settings.deviation, MIN_DEVIATION);
    }

    #[test]
    fn tuned_tone_becomes_dc() {
        let output = TunerOutput::new(tone(0.125, 400), TunerSettings::new(0.125, 0.05), 31);
        let samples = output.read(100, 50);
        assert_eq!(samples.len(), 50);
        for sample in samples {
            assert!((sample.re - 1.0).abs() < 0.02);
            assert!(sample.im.abs() < 0.02);
        }
    }

    #[test]
    fn off_band_tone_is_attenuated() {
        let output = TunerOutput::new(tone(0.3, 400), TunerSettings::new(0.0, 0.02), 63);
        let samples = output.read(200, 50);
        assert!(samples.iter().all(|sample| sample.norm() < 0.1));
    }

    #[test]
    fn read_near_end_is_truncated() {
        let output = TunerOutput::new(tone(0.1, 100), TunerSettings::new(0.0, 0.1), 15);
        assert_eq!(output.read(90, 20).len(), 10);
        assert_eq!(output.read(0, 5).len(), 5);
    }

    #[test]
    fn moving_the_tuner_notifies() {
        let output = TunerOutput::new(tone(0.1, 10), TunerSettings::new(0.0, 0.1), 15);
        let hits = Arc::new(AtomicUsize::new(0));
        let captured = Arc::clone(&hits);
        let _subscription = output.subscribe(Arc::new(move || {
            captured.fetch_add(1, Ordering::SeqCst);
        }));
        output.set_settings(TunerSettings::new(0.2, 0.1));
        output.set_settings(TunerSettings::new(0.2, 0.1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(output.settings().centre, 0.2);
    }
}
