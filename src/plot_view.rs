//! The view controller.
//!
//! [`PlotView`] owns the plot stack, the horizontal (time) and vertical
//! scroll positions, the zoom, and the selection. Every paint and input
//! pass receives an immutable [`ViewSnapshot`] built from that state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use rustfft::num_complex::Complex32;

use crate::config::ViewConfig;
use crate::cursors::{CursorResponse, Cursors};
use crate::datasource::{Listener, SampleSource, Subscription};
use crate::geom::ScreenRect;
use crate::interaction::{PointerEvent, ViewEvent, WheelEvent};
use crate::pipeline::{MultiplyConst, PipelineSource, QuadratureDemod};
use crate::plot::{PaintLayer, Plot, SpectrogramPlot, TracePlot};
use crate::render::RenderList;
use crate::scroll::ScrollBar;
use crate::transform::{column_to_sample, sample_to_column};
use crate::view::{PixelRange, SampleRange, ViewSnapshot};

/// Navigable view over one complex sample source.
pub struct PlotView {
    source: Arc<dyn SampleSource<Complex32>>,
    plots: Vec<Plot>,
    cursors: Cursors,
    cursors_enabled: bool,
    selected_samples: SampleRange,
    fft_size: i64,
    zoom_level: i64,
    view_range: SampleRange,
    viewport_width: i32,
    viewport_height: i32,
    hscroll: ScrollBar,
    vscroll: ScrollBar,
    invalidated: Arc<AtomicBool>,
    events: Vec<ViewEvent>,
    repaint_requested: bool,
    config: ViewConfig,
    _subscription: Subscription,
}

impl PlotView {
    /// Create a view with the default plot stack: spectrogram, IQ trace of
    /// the tuned output, and frequency trace of the tuned output.
    pub fn new(source: Arc<dyn SampleSource<Complex32>>, config: ViewConfig) -> Self {
        let spectrogram = SpectrogramPlot::new(Arc::clone(&source), &config);
        let tuned = spectrogram.output();
        let iq: Arc<dyn SampleSource<Complex32>> = Arc::new(PipelineSource::new(
            Arc::clone(&tuned),
            MultiplyConst::new(Complex32::new(config.iq_gain, 0.0)),
        ));
        let demod: Arc<dyn SampleSource<f32>> = Arc::new(PipelineSource::new(
            tuned,
            QuadratureDemod::new(config.demod_gain),
        ));
        let plots = vec![
            Plot::from(spectrogram),
            Plot::from(TracePlot::complex(iq, config.trace_height, config.theme.clone())),
            Plot::from(TracePlot::real(demod, config.trace_height, config.theme.clone())),
        ];
        Self::with_plots(source, plots, config)
    }

    /// Create a view over an explicit plot stack, top to bottom.
    ///
    /// Panics if the config's FFT size or zoom level is invalid.
    pub fn with_plots(
        source: Arc<dyn SampleSource<Complex32>>,
        plots: Vec<Plot>,
        config: ViewConfig,
    ) -> Self {
        let invalidated = Arc::new(AtomicBool::new(false));
        let listener: Listener = {
            let invalidated = Arc::clone(&invalidated);
            Arc::new(move || invalidated.store(true, Ordering::Release))
        };
        let zoom = config.initial_zoom();
        let subscription = source.subscribe(listener);
        let mut view = Self {
            source,
            plots,
            cursors: Cursors::new(config.grab_tolerance_px, config.theme.clone()),
            cursors_enabled: false,
            selected_samples: SampleRange::default(),
            fft_size: zoom.fft_size(),
            zoom_level: zoom.zoom_level(),
            view_range: SampleRange::default(),
            viewport_width: 0,
            viewport_height: 0,
            hscroll: ScrollBar::new(),
            vscroll: ScrollBar::new(),
            invalidated,
            events: Vec::new(),
            repaint_requested: false,
            config,
            _subscription: subscription,
        };
        view.apply_zoom_to_plots();
        view.update_steps();
        view.update_view(false);
        view
    }

    /// Samples represented by one pixel column.
    pub fn samples_per_column(&self) -> i64 {
        self.fft_size / self.zoom_level
    }

    /// Current FFT size.
    pub fn fft_size(&self) -> i64 {
        self.fft_size
    }

    /// Current zoom level.
    pub fn zoom_level(&self) -> i64 {
        self.zoom_level
    }

    /// Absolute sample interval mapped across the viewport.
    pub fn view_range(&self) -> SampleRange {
        self.view_range
    }

    /// Snapshot handed to paint and input passes.
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::new(self.view_range, self.samples_per_column())
    }

    /// Horizontal (time) scrollbar.
    pub fn horizontal_scroll(&self) -> &ScrollBar {
        &self.hscroll
    }

    /// Vertical (plot stack) scrollbar.
    pub fn vertical_scroll(&self) -> &ScrollBar {
        &self.vscroll
    }

    /// Viewport size in pixels.
    pub fn viewport_size(&self) -> (i32, i32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Plots, top to bottom.
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    /// The first spectrogram in the stack, if any.
    pub fn spectrogram(&self) -> Option<&SpectrogramPlot> {
        self.plots.iter().find_map(Plot::as_spectrogram)
    }

    /// Mutable access to the first spectrogram in the stack, if any.
    pub fn spectrogram_mut(&mut self) -> Option<&mut SpectrogramPlot> {
        self.plots.iter_mut().find_map(Plot::as_spectrogram_mut)
    }

    /// Total height of the plot stack in pixels.
    pub fn plots_height(&self) -> i64 {
        self.plots.iter().map(|plot| plot.height() as i64).sum()
    }

    /// The configuration the view was built with.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Change FFT size and zoom together, keeping the view centred.
    ///
    /// Panics if `size < 1`, `zoom < 1`, or `zoom > size`; use
    /// [`ZoomSettings`](crate::config::ZoomSettings) to validate user input.
    pub fn set_fft_and_zoom(&mut self, size: i64, zoom: i64) {
        assert!(size >= 1, "fft size must be positive, got {size}");
        assert!(zoom >= 1, "zoom level must be at least 1, got {zoom}");
        assert!(zoom <= size, "zoom level {zoom} exceeds fft size {size}");
        debug!("fft size {size}, zoom {zoom}");
        self.fft_size = size;
        self.zoom_level = zoom;
        self.apply_zoom_to_plots();
        self.update_steps();
        self.update_view(true);
    }

    fn apply_zoom_to_plots(&mut self) {
        let (size, zoom) = (self.fft_size, self.zoom_level);
        if let Some(spectrogram) = self.spectrogram_mut() {
            spectrogram.set_fft_size(size);
            spectrogram.set_zoom_level(zoom);
        }
    }

    fn update_steps(&mut self) {
        let spc = self.samples_per_column();
        self.hscroll.set_steps(
            self.config.single_step_columns * spc,
            self.config.page_step_columns * spc,
        );
    }

    /// Recompute the view range and scroll bounds from the current state,
    /// then move the cursors to match the stored selection.
    ///
    /// With `recenter`, the scroll position shifts so the sample at the
    /// centre of the previous view range stays centred, then is clamped to
    /// the new bounds. An empty source gives an empty view range.
    pub fn update_view(&mut self, recenter: bool) {
        let spc = self.samples_per_column();
        let width = self.viewport_width.max(0) as i64;
        let count = self.source.count().max(0);
        let previous = self.view_range;
        let length = width * spc;

        let target = if recenter {
            self.hscroll.value() + (previous.length() - length) / 2
        } else {
            self.hscroll.value()
        };
        let max_scroll = (count - (width - 1).max(0) * spc).clamp(0, count);
        self.hscroll.set_range(0, max_scroll);
        self.hscroll.set_value(target);
        let stack = self.plots_height();
        self.vscroll
            .set_range(0, (stack - self.viewport_height.max(0) as i64).max(0));

        let scroll = self.hscroll.value();
        let end = if count == 0 { scroll } else { scroll + length };
        self.view_range = SampleRange::new(scroll, end);
        self.cursors.set_selection(PixelRange::new(
            sample_to_column(scroll, self.selected_samples.minimum, spc),
            sample_to_column(scroll, self.selected_samples.maximum, spc),
        ));
        debug!(
            "view [{}, {}) spc {spc}, hscroll max {max_scroll}, vscroll max {}",
            self.view_range.minimum,
            self.view_range.maximum,
            self.vscroll.maximum()
        );
        self.repaint_requested = true;
    }

    /// Reset the horizontal bounds after the source's data changed.
    pub fn invalidate(&mut self) {
        let count = self.source.count().max(0);
        debug!("source invalidated, {count} samples");
        self.hscroll.set_range(0, count);
        self.update_view(false);
    }

    /// Apply a pending source invalidation, if any. Returns whether one was
    /// pending.
    pub fn poll_invalidation(&mut self) -> bool {
        if self.invalidated.swap(false, Ordering::AcqRel) {
            self.invalidate();
            return true;
        }
        false
    }

    /// Re-derive the absolute selection from the cursor columns and report
    /// its duration. The selection never extends past the source's samples.
    pub fn cursors_moved(&mut self) {
        let spc = self.samples_per_column();
        let scroll = self.hscroll.value();
        let selection = self.cursors.selection();
        let available = SampleRange::new(0, self.source.count().max(0));
        self.selected_samples = SampleRange::new(
            available.clamp(column_to_sample(scroll, selection.minimum, spc)),
            available.clamp(column_to_sample(scroll, selection.maximum, spc)),
        );
        let duration = self.selection_duration();
        self.events.push(ViewEvent::TimeSelectionChanged(duration));
        self.repaint_requested = true;
    }

    /// Selected sample range.
    pub fn selection(&self) -> SampleRange {
        self.selected_samples
    }

    /// Cursor positions in pixel columns.
    pub fn cursor_selection(&self) -> PixelRange {
        self.cursors.selection()
    }

    /// Move the cursors to the given columns, as a drag would.
    pub fn set_cursor_selection(&mut self, selection: PixelRange) {
        self.cursors.set_selection(selection);
        self.cursors_moved();
    }

    /// Selected duration in seconds; zero if the source has no valid rate.
    pub fn selection_duration(&self) -> f64 {
        let rate = self.source.rate();
        if !rate.is_finite() || rate <= 0.0 {
            warn!("source rate {rate} is not usable, reporting zero selection time");
            return 0.0;
        }
        self.selected_samples.length() as f64 / rate
    }

    /// Duration of one selection segment in seconds.
    pub fn segment_period(&self) -> f64 {
        self.selection_duration() / self.cursors.segments() as f64
    }

    /// Repetition rate implied by one segment per period, in Hz; zero for
    /// an empty selection.
    pub fn segment_rate(&self) -> f64 {
        let period = self.segment_period();
        if period > 0.0 { 1.0 / period } else { 0.0 }
    }

    /// Check whether selection mode is on.
    pub fn cursors_enabled(&self) -> bool {
        self.cursors_enabled
    }

    /// Turn selection mode on or off. Turning it on selects the middle
    /// third of the viewport.
    pub fn enable_cursors(&mut self, enabled: bool) {
        self.cursors_enabled = enabled;
        if enabled {
            let margin = self.viewport_width / 3;
            let right = (self.viewport_width - 1 - margin).max(margin);
            self.cursors.set_selection(PixelRange::new(margin, right));
            self.cursors_moved();
        }
        self.repaint_requested = true;
    }

    /// Split the selection into `segments` equal parts.
    pub fn set_cursor_segments(&mut self, segments: u32) {
        self.cursors.set_segments(segments);
        self.cursors_moved();
    }

    /// Number of selection segments.
    pub fn cursor_segments(&self) -> u32 {
        self.cursors.segments()
    }

    /// Set the power (dB) drawn darkest by the spectrogram.
    pub fn set_power_min(&mut self, power: f32) {
        if let Some(spectrogram) = self.spectrogram_mut() {
            spectrogram.set_power_min(power);
        }
        self.update_view(false);
    }

    /// Set the power (dB) drawn brightest by the spectrogram.
    pub fn set_power_max(&mut self, power: f32) {
        if let Some(spectrogram) = self.spectrogram_mut() {
            spectrogram.set_power_max(power);
        }
        self.update_view(false);
    }

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, width: i32, height: i32) {
        self.viewport_width = width.max(0);
        self.viewport_height = height.max(0);
        self.update_view(false);
    }

    /// Scroll to an absolute sample offset (clamped).
    pub fn set_horizontal_scroll(&mut self, value: i64) {
        self.hscroll.set_value(value);
        self.update_view(false);
    }

    /// Scroll the plot stack to a pixel offset (clamped).
    pub fn set_vertical_scroll(&mut self, value: i64) {
        self.vscroll.set_value(value);
        self.update_view(false);
    }

    /// Paint the whole viewport.
    ///
    /// Every plot runs its back pass, then every plot its mid pass, then
    /// every plot its front pass; the selection overlay goes on top.
    pub fn paint(&mut self, out: &mut RenderList) {
        self.poll_invalidation();
        let viewport = ScreenRect::from_origin_size(
            0.0,
            0.0,
            self.viewport_width as f32,
            self.viewport_height as f32,
        );
        out.fill_rect(viewport, self.config.theme.background);
        let snapshot = self.snapshot();
        let width = self.viewport_width as f32;
        let top = -(self.vscroll.value() as f32);
        for layer in PaintLayer::ALL {
            let mut y = top;
            for plot in &mut self.plots {
                let height = plot.height() as f32;
                let rect = ScreenRect::from_origin_size(0.0, y, width, height);
                if rect.intersects(&viewport) {
                    out.with_clip(rect, |out| plot.paint(layer, out, rect, &snapshot));
                }
                y += height;
            }
        }
        if self.cursors_enabled {
            out.with_clip(viewport, |out| self.cursors.paint_front(out, viewport));
        }
        self.repaint_requested = false;
    }

    /// Route a pointer event in viewport coordinates. The overlay sees it
    /// first, then each plot in stacking order with the position made
    /// plot-local. Returns whether anything consumed it.
    pub fn pointer_event(&mut self, event: PointerEvent) -> bool {
        if self.cursors_enabled {
            let response = self.cursors.mouse_event(&event, self.viewport_width);
            if response == CursorResponse::Moved {
                self.cursors_moved();
            }
            if response.consumed() {
                return true;
            }
        }

        let mut plot_y = -self.vscroll.value();
        for plot in &mut self.plots {
            let local = event.translated(0.0, -(plot_y as f32));
            if plot.mouse_event(&local) {
                self.repaint_requested = true;
                return true;
            }
            plot_y += plot.height() as i64;
        }
        false
    }

    /// Handle a wheel event. With control held it becomes a zoom intent;
    /// otherwise it scrolls. Returns whether the view handled it.
    pub fn wheel_event(&mut self, event: WheelEvent) -> bool {
        if event.modifiers.control {
            if event.delta.y > 0.0 {
                self.events.push(ViewEvent::ZoomIn);
            } else if event.delta.y < 0.0 {
                self.events.push(ViewEvent::ZoomOut);
            }
            return true;
        }

        let (dx, dy) = if event.modifiers.shift {
            (event.delta.y, 0.0)
        } else {
            (event.delta.x, event.delta.y)
        };
        let mut changed = false;
        if dy != 0.0 {
            changed |= self
                .vscroll
                .set_value(self.vscroll.value() - dy.round() as i64);
        }
        if dx != 0.0 {
            changed |= self.hscroll.step_by(if dx > 0.0 { -1 } else { 1 });
        }
        if changed {
            self.update_view(false);
        }
        changed
    }

    /// Take the queued outbound events.
    pub fn drain_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the repaint request flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MemorySource;
    use crate::geom::ScreenPoint;
    use crate::interaction::Modifiers;
    use crate::render::RenderCommand;

    fn zeros(count: usize, rate: f64) -> Arc<MemorySource<Complex32>> {
        Arc::new(MemorySource::new(rate, vec![Complex32::new(0.0, 0.0); count]).unwrap())
    }

    fn config(fft_size: i64) -> ViewConfig {
        ViewConfig {
            fft_size,
            ..ViewConfig::default()
        }
    }

    fn bare_view(count: usize, fft_size: i64) -> PlotView {
        PlotView::with_plots(zeros(count, 1000.0), Vec::new(), config(fft_size))
    }

    fn wheel(y: f32, control: bool) -> WheelEvent {
        WheelEvent {
            delta: ScreenPoint::new(0.0, y),
            modifiers: Modifiers {
                control,
                ..Modifiers::default()
            },
        }
    }

    #[test]
    fn selection_scenario() {
        let mut view = bare_view(1000, 64);
        view.set_viewport_size(10, 100);
        assert_eq!(view.view_range(), SampleRange::new(0, 640));
        assert_eq!(view.horizontal_scroll().maximum(), 424);

        view.set_cursor_selection(PixelRange::new(2, 5));
        assert_eq!(view.selection(), SampleRange::new(128, 320));
        match view.drain_events().as_slice() {
            [ViewEvent::TimeSelectionChanged(seconds)] => assert!((seconds - 0.192).abs() < 1e-9),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn view_range_follows_scroll_and_width() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(100, 10);
        for scroll in [0, 17, 5000, 93_600] {
            view.set_horizontal_scroll(scroll);
            let range = view.view_range();
            assert_eq!(range.minimum, scroll);
            assert_eq!(range.length(), 100 * 64);
        }
    }

    #[test]
    fn zoom_keeps_centre_sample() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(100, 10);
        view.set_horizontal_scroll(10_000);
        let centre = view.view_range().minimum + view.view_range().length() / 2;

        view.set_fft_and_zoom(64, 4);
        let spc = view.samples_per_column();
        let mid = view.view_range().minimum + 50 * spc;
        assert!((mid - centre).abs() <= spc);
        assert_eq!(view.horizontal_scroll().single_step(), 10 * spc);
        assert_eq!(view.horizontal_scroll().page_step(), 100 * spc);

        view.set_fft_and_zoom(64, 1);
        assert_eq!(view.view_range().minimum, 10_000);
    }

    #[test]
    fn zoom_out_at_end_clamps_to_new_maximum() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(100, 10);
        view.set_horizontal_scroll(i64::MAX);
        assert_eq!(view.horizontal_scroll().value(), 93_664);

        view.set_fft_and_zoom(512, 1);
        assert_eq!(view.horizontal_scroll().maximum(), 49_312);
        assert_eq!(view.view_range().minimum, 49_312);
    }

    #[test]
    fn zoom_in_at_end_keeps_centre() {
        let mut view = bare_view(100_000, 512);
        view.set_viewport_size(100, 10);
        view.set_horizontal_scroll(i64::MAX);
        assert_eq!(view.horizontal_scroll().value(), 49_312);

        view.set_fft_and_zoom(64, 1);
        assert_eq!(view.view_range().minimum, 49_312 + 22_400);
    }

    #[test]
    fn zoom_at_start_clamps_to_zero() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(100, 10);
        view.set_fft_and_zoom(512, 1);
        assert_eq!(view.view_range().minimum, 0);

        view.set_fft_and_zoom(64, 1);
        assert_eq!(view.view_range().minimum, 22_400);
    }

    #[test]
    #[should_panic(expected = "invalid view config")]
    fn invalid_initial_zoom_is_rejected() {
        let config = ViewConfig {
            zoom_level: 0,
            ..ViewConfig::default()
        };
        PlotView::with_plots(zeros(100, 1000.0), Vec::new(), config);
    }

    #[test]
    #[should_panic(expected = "invalid view config")]
    fn zoom_above_initial_fft_size_is_rejected() {
        let config = ViewConfig {
            fft_size: 4,
            zoom_level: 8,
            ..ViewConfig::default()
        };
        PlotView::new(zeros(100, 1000.0), config);
    }

    #[test]
    fn selection_survives_view_changes() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(100, 10);
        view.set_horizontal_scroll(640);
        view.set_cursor_selection(PixelRange::new(2, 5));
        let selection = view.selection();
        assert_eq!(selection, SampleRange::new(768, 960));

        view.update_view(false);
        assert_eq!(view.cursor_selection(), PixelRange::new(2, 5));
        view.set_horizontal_scroll(704);
        assert_eq!(view.cursor_selection(), PixelRange::new(1, 4));
        assert_eq!(view.selection(), selection);
    }

    #[test]
    fn horizontal_maximum_is_bounded() {
        for count in [0usize, 1, 100, 1000, 5000] {
            for width in [1, 2, 10, 300] {
                for (fft, zoom) in [(64, 1), (64, 8), (1, 1), (512, 2)] {
                    let mut view = bare_view(count, fft);
                    view.set_viewport_size(width, 50);
                    view.set_fft_and_zoom(fft, zoom);
                    let spc = fft / zoom;
                    let expected = (count as i64 - (width as i64 - 1) * spc).max(0);
                    let maximum = view.horizontal_scroll().maximum();
                    assert_eq!(maximum, expected);
                    assert!(maximum <= count as i64);
                }
            }
        }
    }

    #[test]
    fn empty_source_has_empty_view_and_selection() {
        let mut view = bare_view(0, 64);
        view.set_viewport_size(10, 10);
        view.update_view(true);
        assert!(view.view_range().is_empty());
        assert_eq!(view.horizontal_scroll().maximum(), 0);
        assert_eq!(view.vertical_scroll().maximum(), 0);

        view.enable_cursors(true);
        assert!(view.selection().is_empty());
        assert_eq!(view.selection_duration(), 0.0);
        assert_eq!(view.drain_events(), vec![ViewEvent::TimeSelectionChanged(0.0)]);
        let mut list = RenderList::new();
        view.paint(&mut list);
        view.enable_cursors(false);
        assert!(!view.pointer_event(PointerEvent::press(0.0, 0.0)));
    }

    #[test]
    fn zero_sized_viewport_does_not_panic() {
        let mut view = bare_view(0, 64);
        view.set_viewport_size(0, 0);
        view.update_view(true);
        assert!(view.view_range().is_empty());
        view.enable_cursors(true);
        assert_eq!(view.selection_duration(), 0.0);
        let mut list = RenderList::new();
        view.paint(&mut list);
    }

    #[test]
    fn selection_is_limited_to_available_samples() {
        let mut view = bare_view(1000, 64);
        view.set_viewport_size(100, 10);
        view.set_cursor_selection(PixelRange::new(10, 40));
        assert_eq!(view.selection(), SampleRange::new(640, 1000));
        assert!((view.selection_duration() - 0.36).abs() < 1e-9);
    }

    #[test]
    fn appended_data_extends_scroll_range() {
        let source = zeros(1000, 1000.0);
        let mut view = PlotView::with_plots(
            Arc::clone(&source) as Arc<dyn SampleSource<Complex32>>,
            Vec::new(),
            config(64),
        );
        view.set_viewport_size(10, 10);
        assert_eq!(view.horizontal_scroll().maximum(), 424);
        source.extend(vec![Complex32::new(0.0, 0.0); 1000]);
        assert!(view.poll_invalidation());
        assert!(!view.poll_invalidation());
        assert_eq!(view.horizontal_scroll().maximum(), 1424);
    }

    #[test]
    fn enabling_cursors_selects_middle_third() {
        let mut view = bare_view(100_000, 64);
        view.set_viewport_size(300, 10);
        view.enable_cursors(true);
        assert_eq!(view.cursor_selection(), PixelRange::new(100, 199));
        assert_eq!(view.selection(), SampleRange::new(6400, 199 * 64));
        assert_eq!(view.drain_events().len(), 1);
    }

    #[test]
    fn segments_divide_selection_time() {
        let mut view = bare_view(1000, 64);
        view.set_viewport_size(10, 10);
        view.set_cursor_selection(PixelRange::new(2, 5));
        view.set_cursor_segments(4);
        assert!((view.segment_period() - 0.048).abs() < 1e-9);
        assert!((view.segment_rate() - 1.0 / 0.048).abs() < 1e-6);
    }

    #[test]
    fn default_stack_has_three_plots() {
        let view = PlotView::new(zeros(4096, 1000.0), ViewConfig::default());
        let heights: Vec<i32> = view.plots().iter().map(Plot::height).collect();
        assert_eq!(heights, vec![512, 200, 200]);
        assert!(view.spectrogram().is_some());
    }

    #[test]
    fn fft_size_changes_vertical_range() {
        let mut view = PlotView::new(zeros(4096, 1000.0), ViewConfig::default());
        view.set_viewport_size(100, 500);
        assert_eq!(view.vertical_scroll().maximum(), 512 + 400 - 500);
        view.set_fft_and_zoom(128, 1);
        assert_eq!(view.vertical_scroll().maximum(), 128 + 400 - 500);
        assert_eq!(view.spectrogram().map(SpectrogramPlot::fft_size), Some(128));
    }

    #[test]
    fn pointer_goes_to_cursors_before_plots() {
        let source: Arc<dyn SampleSource<Complex32>> = zeros(4096, 1000.0);
        let config = config(100);
        let spectrogram = SpectrogramPlot::new(Arc::clone(&source), &config);
        let mut view = PlotView::with_plots(source, vec![spectrogram.into()], config);
        view.set_viewport_size(300, 60);
        view.enable_cursors(true);

        // On the left cursor handle and on the tuner centre line at once.
        assert!(view.pointer_event(PointerEvent::press(100.0, 50.0)));
        assert!(view.pointer_event(PointerEvent::drag(110.0, 20.0)));
        assert!(view.pointer_event(PointerEvent::release(110.0, 20.0)));
        assert_eq!(view.cursor_selection().minimum, 110);
        let tuner = view.spectrogram().map(|s| s.tuner().centre);
        assert_eq!(tuner, Some(0.0));
    }

    #[test]
    fn pointer_is_translated_into_plot_coordinates() {
        let source: Arc<dyn SampleSource<Complex32>> = zeros(4096, 1000.0);
        let config = config(100);
        let trace = TracePlot::real(
            Arc::new(MemorySource::from_fn(1000.0, 10, |n| n as f32).unwrap()),
            40,
            config.theme.clone(),
        );
        let spectrogram = SpectrogramPlot::new(Arc::clone(&source), &config);
        let mut view =
            PlotView::with_plots(source, vec![trace.into(), spectrogram.into()], config);
        view.set_viewport_size(300, 100);
        assert_eq!(view.vertical_scroll().maximum(), 40);
        view.set_vertical_scroll(30);

        // Spectrogram starts at 40 - 30 = 10 on screen; its centre line at local 50.
        assert!(!view.pointer_event(PointerEvent::press(5.0, 30.0)));
        assert!(view.pointer_event(PointerEvent::press(5.0, 60.0)));
        assert!(view.pointer_event(PointerEvent::drag(5.0, 35.0)));
        view.pointer_event(PointerEvent::release(5.0, 35.0));
        let centre = view.spectrogram().map(|s| s.tuner().centre).unwrap_or_default();
        assert!((centre - 0.25).abs() < 1e-9);
        assert!(view.take_repaint());
    }

    #[test]
    fn control_wheel_emits_zoom_intents() {
        let mut view = bare_view(1000, 64);
        assert!(view.wheel_event(wheel(120.0, true)));
        assert!(view.wheel_event(wheel(-120.0, true)));
        assert_eq!(view.drain_events(), vec![ViewEvent::ZoomIn, ViewEvent::ZoomOut]);
    }

    #[test]
    fn plain_wheel_scrolls() {
        let mut view = PlotView::new(zeros(100_000, 1000.0), config(512));
        view.set_viewport_size(100, 300);
        assert!(view.wheel_event(wheel(-50.0, false)));
        assert_eq!(view.vertical_scroll().value(), 50);
        let shifted = WheelEvent {
            delta: ScreenPoint::new(0.0, -10.0),
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        };
        assert!(view.wheel_event(shifted));
        assert_eq!(view.horizontal_scroll().value(), 10 * 512);
        assert_eq!(view.view_range().minimum, 10 * 512);
        assert!(view.drain_events().is_empty());
    }

    #[test]
    fn paint_orders_layers_and_overlay() {
        let source: Arc<dyn SampleSource<Complex32>> = zeros(4096, 1000.0);
        let config = config(32);
        let theme = config.theme.clone();
        let trace = TracePlot::complex(Arc::clone(&source), 40, theme.clone());
        let spectrogram = SpectrogramPlot::new(Arc::clone(&source), &config);
        let mut view =
            PlotView::with_plots(source, vec![trace.into(), spectrogram.into()], config);
        view.set_viewport_size(50, 72);
        view.enable_cursors(true);
        let mut list = RenderList::new();
        view.paint(&mut list);

        let commands = list.commands();
        assert!(matches!(commands.first(), Some(RenderCommand::Rect { .. })));
        let raster = commands
            .iter()
            .position(|c| matches!(c, RenderCommand::Raster(_)))
            .expect("spectrogram raster");
        let trace_line = commands
            .iter()
            .position(|c| match c {
                RenderCommand::LineSegments { style, .. } => style.color == theme.trace_i,
                _ => false,
            })
            .expect("trace line");
        assert!(raster < trace_line);
        let last_drawn = commands
            .iter()
            .rev()
            .find(|c| !matches!(c, RenderCommand::ClipEnd))
            .expect("commands");
        assert!(matches!(
            last_drawn,
            RenderCommand::LineSegments { style, .. } if style.color == theme.cursor
        ));
        assert!(!view.take_repaint());
    }

    #[test]
    #[should_panic(expected = "zoom level must be at least 1")]
    fn zero_zoom_is_rejected() {
        bare_view(1000, 64).set_fft_and_zoom(64, 0);
    }

    #[test]
    #[should_panic(expected = "exceeds fft size")]
    fn zoom_beyond_fft_size_is_rejected() {
        bare_view(1000, 64).set_fft_and_zoom(8, 16);
    }
}
