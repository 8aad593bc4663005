//! Concrete pipeline stages.

use std::f32::consts::PI;
use std::ops::Mul;

use rustfft::num_complex::Complex32;

use super::Stage;

/// Multiplies every sample by a constant.
#[derive(Debug, Clone, Copy)]
pub struct MultiplyConst<T> {
    factor: T,
}

impl<T> MultiplyConst<T> {
    /// Create a stage scaling by `factor`.
    pub fn new(factor: T) -> Self {
        Self { factor }
    }
}

impl<T> Stage<T, T> for MultiplyConst<T>
where
    T: Mul<Output = T> + Copy + Send + Sync,
{
    fn process(&self, input: &[T]) -> Vec<T> {
        input.iter().map(|sample| *sample * self.factor).collect()
    }
}

/// Instantaneous frequency estimate from consecutive complex samples.
///
/// Each output is `gain * arg(x[n] * conj(x[n - 1]))`, so one sample of
/// history is consumed ahead of the first output.
#[derive(Debug, Clone, Copy)]
pub struct QuadratureDemod {
    gain: f32,
}

impl QuadratureDemod {
    /// Create a demodulator with the given output gain.
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }
}

impl Stage<Complex32, f32> for QuadratureDemod {
    fn history(&self) -> usize {
        1
    }

    fn process(&self, input: &[Complex32]) -> Vec<f32> {
        input
            .windows(2)
            .map(|pair| self.gain * (pair[1] * pair[0].conj()).arg())
            .collect()
    }
}

/// Finite impulse response filter over complex samples.
#[derive(Debug, Clone)]
pub struct FirFilter {
    taps: Vec<f32>,
}

impl FirFilter {
    /// Create a filter from explicit taps. An empty tap list passes through.
    pub fn new(taps: Vec<f32>) -> Self {
        if taps.is_empty() {
            return Self { taps: vec![1.0] };
        }
        Self { taps }
    }

    /// Hamming-windowed sinc low-pass with unity DC gain.
    ///
    /// `cutoff` is in cycles per sample and is clamped into `(0, 0.5]`.
    /// `taps` is forced odd so the filter has an integer group delay.
    pub fn low_pass(cutoff: f64, taps: usize) -> Self {
        let taps = taps.max(1) | 1;
        let cutoff = cutoff.clamp(1e-6, 0.5);
        let centre = (taps / 2) as f64;
        let mut coefficients: Vec<f64> = (0..taps)
            .map(|n| {
                let t = n as f64 - centre;
                let sinc = if t == 0.0 {
                    2.0 * cutoff
                } else {
                    (2.0 * std::f64::consts::PI * cutoff * t).sin() / (std::f64::consts::PI * t)
                };
                let window = if taps == 1 {
                    1.0
                } else {
                    0.54 - 0.46
                        * (2.0 * std::f64::consts::PI * n as f64 / (taps - 1) as f64).cos()
                };
                sinc * window
            })
            .collect();
        let sum: f64 = coefficients.iter().sum();
        if sum.abs() > f64::EPSILON {
            for coefficient in &mut coefficients {
                *coefficient /= sum;
            }
        }
        Self::new(coefficients.into_iter().map(|c| c as f32).collect())
    }

    /// Filter coefficients.
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }
}

impl Stage<Complex32, Complex32> for FirFilter {
    fn history(&self) -> usize {
        self.taps.len() - 1
    }

    fn process(&self, input: &[Complex32]) -> Vec<Complex32> {
        input
            .windows(self.taps.len())
            .map(|window| {
                window
                    .iter()
                    .rev()
                    .zip(&self.taps)
                    .fold(Complex32::new(0.0, 0.0), |acc, (sample, tap)| {
                        acc + *sample * *tap
                    })
            })
            .collect()
    }
}

/// Complex exponential `e^{-j 2 pi f n}` used to mix a signal down by `f`.
pub(crate) fn mixer(frequency: f64, index: i64) -> Complex32 {
    let cycles = (frequency * index as f64).rem_euclid(1.0);
    Complex32::from_polar(1.0, -2.0 * PI * cycles as f32)
}
