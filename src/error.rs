//! Error types.

use thiserror::Error;

/// Errors raised when constructing a sample source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The sample rate is zero, negative, or not finite.
    #[error("sample rate must be finite and greater than zero, got {0}")]
    InvalidSampleRate(f64),
}

/// Errors raised when validating view parameters from a host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// FFT size must be at least one.
    #[error("fft size must be positive, got {0}")]
    InvalidFftSize(i64),
    /// Zoom level must be at least one.
    #[error("zoom level must be at least 1, got {0}")]
    InvalidZoom(i64),
    /// Zoom may not exceed the FFT size, otherwise a column holds no samples.
    #[error("zoom level {zoom} exceeds fft size {fft_size}")]
    ZoomExceedsFftSize {
        /// Requested FFT size.
        fft_size: i64,
        /// Requested zoom level.
        zoom: i64,
    },
}
