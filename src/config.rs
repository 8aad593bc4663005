//! View configuration.

use crate::error::ViewError;
use crate::style::Theme;

/// Configuration for a [`PlotView`](crate::plot_view::PlotView).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// FFT size used until the host sets one.
    pub fft_size: i64,
    /// Zoom level used until the host sets one.
    pub zoom_level: i64,
    /// Lower bound of the spectrogram power range in dB.
    pub power_min: f32,
    /// Upper bound of the spectrogram power range in dB.
    pub power_max: f32,
    /// Pixel tolerance for grabbing a cursor handle or tuner line.
    pub grab_tolerance_px: i32,
    /// Horizontal single step, in columns.
    pub single_step_columns: i64,
    /// Horizontal page step, in columns.
    pub page_step_columns: i64,
    /// Amplitude gain applied to the IQ trace.
    pub iq_gain: f32,
    /// Gain applied by the quadrature demodulator.
    pub demod_gain: f32,
    /// Height of each trace plot in pixels.
    pub trace_height: i32,
    /// Tap count of the tuner's low-pass filter. Forced odd.
    pub tuner_taps: usize,
    /// Initial tuner half-bandwidth in cycles per sample.
    pub tuner_deviation: f64,
    /// Colors for plots and the selection overlay.
    pub theme: Theme,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            zoom_level: 1,
            power_min: -100.0,
            power_max: -20.0,
            grab_tolerance_px: 5,
            single_step_columns: 10,
            page_step_columns: 100,
            iq_gain: 20.0,
            demod_gain: 5.0,
            trace_height: 200,
            tuner_taps: 63,
            tuner_deviation: 0.05,
            theme: Theme::default(),
        }
    }
}

impl ViewConfig {
    /// The initial FFT size and zoom level, validated.
    ///
    /// Panics on an invalid pair; there is no sample mapping to fall back to.
    pub fn initial_zoom(&self) -> ZoomSettings {
        match ZoomSettings::new(self.fft_size, self.zoom_level) {
            Ok(settings) => settings,
            Err(err) => panic!("invalid view config: {err}"),
        }
    }
}

/// A validated FFT size and zoom level pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomSettings {
    fft_size: i64,
    zoom_level: i64,
}

impl ZoomSettings {
    /// Validate user input before handing it to the controller.
    pub fn new(fft_size: i64, zoom_level: i64) -> Result<Self, ViewError> {
        if fft_size < 1 {
            return Err(ViewError::InvalidFftSize(fft_size));
        }
        if zoom_level < 1 {
            return Err(ViewError::InvalidZoom(zoom_level));
        }
        if zoom_level > fft_size {
            return Err(ViewError::ZoomExceedsFftSize {
                fft_size,
                zoom: zoom_level,
            });
        }
        Ok(Self {
            fft_size,
            zoom_level,
        })
    }

    /// FFT size.
    pub fn fft_size(&self) -> i64 {
        self.fft_size
    }

    /// Zoom level.
    pub fn zoom_level(&self) -> i64 {
        self.zoom_level
    }

    /// Samples represented by one screen column.
    pub fn samples_per_column(&self) -> i64 {
        self.fft_size / self.zoom_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_settings_validate() {
        assert_eq!(ZoomSettings::new(0, 1), Err(ViewError::InvalidFftSize(0)));
        assert_eq!(ZoomSettings::new(64, 0), Err(ViewError::InvalidZoom(0)));
        assert!(matches!(
            ZoomSettings::new(4, 8),
            Err(ViewError::ZoomExceedsFftSize { .. })
        ));
        let settings = ZoomSettings::new(1024, 4).expect("valid settings");
        assert_eq!(settings.samples_per_column(), 256);
        assert_eq!(ViewConfig::default().initial_zoom().samples_per_column(), 512);
    }
}
