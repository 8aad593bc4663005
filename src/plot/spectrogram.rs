//! Spectrogram plot: a time-frequency heat map with a draggable tuner.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::config::ViewConfig;
use crate::datasource::{Listener, SampleSource, Subscription};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::{PointerButton, PointerEvent, PointerKind, near};
use crate::pipeline::read_with_history;
use crate::render::{Color, LineStyle, Raster, RenderCommand, RenderList};
use crate::style::Theme;
use crate::view::ViewSnapshot;

use super::tuner::{TunerOutput, TunerSettings};

/// Screen columns computed together and cached as one unit.
const TILE_COLUMNS: i64 = 256;
/// Upper bound on cached tiles before the oldest are evicted.
const MAX_TILES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TileKey {
    index: i64,
    fft_size: i64,
    zoom_level: i64,
}

#[derive(Debug, Clone)]
struct Tile {
    /// Power in dB, row-major (`rows * TILE_COLUMNS`), top row = highest
    /// frequency. NaN marks columns past the end of the stream.
    powers: Vec<f32>,
    colors: Option<((f32, f32), Arc<Vec<Color>>)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TunerDrag {
    Idle,
    Centre,
    Edge,
}

/// Time-frequency view of a complex source.
///
/// The plot is `fft_size` pixels tall, one row per frequency bin with DC in
/// the middle. Its tuner narrows the band handed to downstream plots through
/// [`SpectrogramPlot::output`].
pub struct SpectrogramPlot {
    source: Arc<dyn SampleSource<Complex32>>,
    output: Arc<TunerOutput>,
    fft_size: i64,
    zoom_level: i64,
    power_min: f32,
    power_max: f32,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    window_gain: f32,
    tiles: HashMap<TileKey, Tile>,
    tile_order: VecDeque<TileKey>,
    stale: Arc<AtomicBool>,
    drag: TunerDrag,
    grab_tolerance: f32,
    theme: Theme,
    _subscription: Subscription,
}

impl SpectrogramPlot {
    /// Create a spectrogram over `source` using the config's initial parameters.
    pub fn new(source: Arc<dyn SampleSource<Complex32>>, config: &ViewConfig) -> Self {
        let stale = Arc::new(AtomicBool::new(false));
        let listener: Listener = {
            let stale = Arc::clone(&stale);
            Arc::new(move || stale.store(true, Ordering::Release))
        };
        let subscription = source.subscribe(listener);
        let output = Arc::new(TunerOutput::new(
            Arc::clone(&source),
            TunerSettings::new(0.0, config.tuner_deviation),
            config.tuner_taps,
        ));
        let zoom = config.initial_zoom();
        let fft_size = zoom.fft_size();
        let (fft, window, window_gain) = plan(fft_size);
        Self {
            source,
            output,
            fft_size,
            zoom_level: zoom.zoom_level(),
            power_min: config.power_min,
            power_max: config.power_max,
            fft,
            window,
            window_gain,
            tiles: HashMap::new(),
            tile_order: VecDeque::new(),
            stale,
            drag: TunerDrag::Idle,
            grab_tolerance: config.grab_tolerance_px as f32,
            theme: config.theme.clone(),
            _subscription: subscription,
        }
    }

    /// Plot height in pixels: one row per FFT bin.
    pub fn height(&self) -> i32 {
        self.fft_size.clamp(0, i32::MAX as i64) as i32
    }

    /// Current FFT size.
    pub fn fft_size(&self) -> i64 {
        self.fft_size
    }

    /// Current zoom level.
    pub fn zoom_level(&self) -> i64 {
        self.zoom_level
    }

    /// Current power range in dB.
    pub fn power_range(&self) -> (f32, f32) {
        (self.power_min, self.power_max)
    }

    /// Tuned output for downstream plots.
    pub fn output(&self) -> Arc<dyn SampleSource<Complex32>> {
        Arc::clone(&self.output) as Arc<dyn SampleSource<Complex32>>
    }

    /// Current tuner settings.
    pub fn tuner(&self) -> TunerSettings {
        self.output.settings()
    }

    /// Move the tuner; downstream sources are notified.
    pub fn set_tuner(&mut self, settings: TunerSettings) {
        self.output.set_settings(settings);
    }

    /// Change the FFT size. Panics if `size < 1`.
    pub fn set_fft_size(&mut self, size: i64) {
        assert!(size >= 1, "fft size must be positive, got {size}");
        if size == self.fft_size {
            return;
        }
        self.fft_size = size;
        let (fft, window, window_gain) = plan(size);
        self.fft = fft;
        self.window = window;
        self.window_gain = window_gain;
        self.clear_tiles();
    }

    /// Change the zoom level. Panics if `zoom < 1`.
    pub fn set_zoom_level(&mut self, zoom: i64) {
        assert!(zoom >= 1, "zoom level must be at least 1, got {zoom}");
        if zoom == self.zoom_level {
            return;
        }
        self.zoom_level = zoom;
        self.clear_tiles();
    }

    /// Set the power (dB) mapped to the darkest color.
    pub fn set_power_min(&mut self, power: f32) {
        self.power_min = power;
    }

    /// Set the power (dB) mapped to the brightest color.
    pub fn set_power_max(&mut self, power: f32) {
        self.power_max = power;
    }

    fn stride(&self) -> i64 {
        (self.fft_size / self.zoom_level).max(1)
    }

    fn clear_tiles(&mut self) {
        self.tiles.clear();
        self.tile_order.clear();
    }

    fn frequency_to_y(&self, rect: ScreenRect, frequency: f64) -> f32 {
        rect.min.y + ((0.5 - frequency) * rect.height() as f64) as f32
    }

    fn y_to_frequency(&self, y: f32) -> f64 {
        0.5 - y as f64 / self.fft_size as f64
    }

    pub(crate) fn paint_back(
        &mut self,
        out: &mut RenderList,
        rect: ScreenRect,
        view: &ViewSnapshot,
    ) {
        if self.stale.swap(false, Ordering::Acquire) {
            debug!("spectrogram source invalidated, dropping cached tiles");
            self.clear_tiles();
        }
        let stride = self.stride();
        let rows = self.fft_size as usize;
        let columns = rect.width().ceil() as i64 + 1;
        if columns <= 1 || rows == 0 {
            return;
        }
        let first_column = view.range.minimum.div_euclid(stride);
        let x_shift = (first_column * stride - view.range.minimum) as f32 / stride as f32;

        let mut cells = vec![self.theme.background; rows * columns as usize];
        let mut column = 0;
        while column < columns {
            let global = first_column + column;
            let tile_index = global.div_euclid(TILE_COLUMNS);
            let tile_column = global.rem_euclid(TILE_COLUMNS);
            let span = (TILE_COLUMNS - tile_column).min(columns - column);
            let colors = self.tile_colors(tile_index);
            for row in 0..rows {
                let src = row * TILE_COLUMNS as usize + tile_column as usize;
                let dst = row * columns as usize + column as usize;
                cells[dst..dst + span as usize].copy_from_slice(&colors[src..src + span as usize]);
            }
            column += span;
        }

        let raster_rect = ScreenRect::from_origin_size(
            rect.min.x + x_shift,
            rect.min.y,
            columns as f32,
            rect.height(),
        );
        out.push(RenderCommand::Raster(Raster {
            rect: raster_rect,
            columns: columns as usize,
            rows,
            cells: Arc::new(cells),
        }));
    }

    pub(crate) fn paint_front(
        &mut self,
        out: &mut RenderList,
        rect: ScreenRect,
        _view: &ViewSnapshot,
    ) {
        let tuner = self.output.settings();
        let centre = self.frequency_to_y(rect, tuner.centre);
        let upper = self.frequency_to_y(rect, tuner.centre + tuner.deviation);
        let lower = self.frequency_to_y(rect, tuner.centre - tuner.deviation);
        out.hline(rect, upper, LineStyle::hairline(self.theme.tuner_edge));
        out.hline(rect, lower, LineStyle::hairline(self.theme.tuner_edge));
        out.hline(rect, centre, LineStyle::hairline(self.theme.tuner_centre));
    }

    pub(crate) fn mouse_event(&mut self, event: &PointerEvent) -> bool {
        let y = event.position.y;
        match event.kind {
            PointerKind::Press => {
                if event.button != PointerButton::Left {
                    return false;
                }
                let height = self.fft_size as f32;
                if y < -self.grab_tolerance || y > height + self.grab_tolerance {
                    return false;
                }
                let tuner = self.output.settings();
                let local =
                    ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, height));
                let centre = self.frequency_to_y(local, tuner.centre);
                let upper = self.frequency_to_y(local, tuner.centre + tuner.deviation);
                let lower = self.frequency_to_y(local, tuner.centre - tuner.deviation);
                self.drag = if near(y, centre, self.grab_tolerance) {
                    TunerDrag::Centre
                } else if near(y, upper, self.grab_tolerance)
                    || near(y, lower, self.grab_tolerance)
                {
                    TunerDrag::Edge
                } else {
                    TunerDrag::Idle
                };
                self.drag != TunerDrag::Idle
            }
            PointerKind::Move => {
                let tuner = self.output.settings();
                let frequency = self.y_to_frequency(y);
                match self.drag {
                    TunerDrag::Idle => return false,
                    TunerDrag::Centre => {
                        self.output
                            .set_settings(TunerSettings::new(frequency, tuner.deviation));
                    }
                    TunerDrag::Edge => {
                        let deviation = (frequency - tuner.centre)
                            .abs()
                            .max(1.0 / self.fft_size as f64);
                        self.output
                            .set_settings(TunerSettings::new(tuner.centre, deviation));
                    }
                }
                true
            }
            PointerKind::Release => {
                let was_dragging = self.drag != TunerDrag::Idle;
                self.drag = TunerDrag::Idle;
                was_dragging
            }
        }
    }

    fn tile_colors(&mut self, index: i64) -> Arc<Vec<Color>> {
        let key = TileKey {
            index,
            fft_size: self.fft_size,
            zoom_level: self.zoom_level,
        };
        if !self.tiles.contains_key(&key) {
            let powers = self.compute_tile(index);
            self.insert_tile(key, Tile {
                powers,
                colors: None,
            });
        } else if let Some(position) = self.tile_order.iter().position(|k| *k == key) {
            self.tile_order.remove(position);
            self.tile_order.push_back(key);
        }

        let power_range = (self.power_min, self.power_max);
        let background = self.theme.background;
        let Some(tile) = self.tiles.get_mut(&key) else {
            return Arc::new(Vec::new());
        };
        if let Some((range, colors)) = tile.colors.as_ref()
            && *range == power_range
        {
            return Arc::clone(colors);
        }
        let colors: Arc<Vec<Color>> = Arc::new(
            tile.powers
                .iter()
                .map(|power| {
                    if power.is_nan() {
                        background
                    } else {
                        heat_color(normalize_power(*power, power_range))
                    }
                })
                .collect(),
        );
        tile.colors = Some((power_range, Arc::clone(&colors)));
        colors
    }

    fn insert_tile(&mut self, key: TileKey, tile: Tile) {
        while self.tiles.len() >= MAX_TILES {
            let Some(oldest) = self.tile_order.pop_front() else {
                break;
            };
            self.tiles.remove(&oldest);
        }
        self.tiles.insert(key, tile);
        self.tile_order.push_back(key);
    }

    /// FFT every column of one tile. Each column's window is centred on the
    /// samples the column represents; data outside the stream reads as zero.
    fn compute_tile(&self, index: i64) -> Vec<f32> {
        let stride = self.stride();
        let size = self.fft_size as usize;
        let columns = TILE_COLUMNS as usize;
        let tile_start = index * TILE_COLUMNS * stride;
        let lead = self.fft_size / 2 - stride / 2;
        let block_start = tile_start - lead;
        let block_len = (TILE_COLUMNS - 1) * stride + self.fft_size;
        let total = self.source.count();
        let block = read_with_history(self.source.as_ref(), block_start, block_len, 0);

        let mut powers = vec![f32::NAN; size * columns];
        let mut buffer = vec![Complex32::new(0.0, 0.0); size];
        let mut scratch = vec![Complex32::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        let norm = self.window_gain * self.window_gain;
        for column in 0..columns {
            let column_sample = tile_start + column as i64 * stride;
            if column_sample >= total || column_sample < 0 {
                continue;
            }
            let offset = column * stride as usize;
            for (k, slot) in buffer.iter_mut().enumerate() {
                let sample = block
                    .samples
                    .get(offset + k)
                    .copied()
                    .unwrap_or_default();
                *slot = sample * self.window[k];
            }
            self.fft.process_with_scratch(&mut buffer, &mut scratch);
            for row in 0..size {
                // Row 0 is the highest frequency; DC lands at row size/2 - 1 after the shift.
                let shifted = size - 1 - row;
                let bin = (shifted + size / 2) % size;
                let power = buffer[bin].norm_sqr() / norm;
                powers[row * columns + column] = 10.0 * power.max(1e-30).log10();
            }
        }
        trace!("computed spectrogram tile {index} (fft {size}, stride {stride})");
        powers
    }
}

fn plan(fft_size: i64) -> (Arc<dyn Fft<f32>>, Vec<f32>, f32) {
    let size = fft_size.max(1) as usize;
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(size);
    let window: Vec<f32> = if size == 1 {
        vec![1.0]
    } else {
        (0..size)
            .map(|n| {
                let phase = 2.0 * std::f32::consts::PI * n as f32 / (size - 1) as f32;
                0.5 - 0.5 * phase.cos()
            })
            .collect()
    };
    let gain = window.iter().sum::<f32>().max(f32::EPSILON);
    (fft, window, gain)
}

fn normalize_power(power: f32, (min, max): (f32, f32)) -> f32 {
    let span = max - min;
    if span.abs() < f32::EPSILON {
        return if power >= max { 1.0 } else { 0.0 };
    }
    ((power - min) / span).clamp(0.0, 1.0)
}

/// Map `t` in `[0, 1]` onto a black-blue-cyan-yellow-white ramp.
pub(crate) fn heat_color(t: f32) -> Color {
    const STOPS: [(f32, [f32; 3]); 5] = [
        (0.0, [0.0, 0.0, 0.0]),
        (0.25, [0.0, 0.0, 0.8]),
        (0.5, [0.0, 0.8, 0.8]),
        (0.75, [1.0, 1.0, 0.0]),
        (1.0, [1.0, 1.0, 1.0]),
    ];
    let t = t.clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return Color::new(
                c0[0] + (c1[0] - c0[0]) * f,
                c0[1] + (c1[1] - c0[1]) * f,
                c0[2] + (c1[2] - c0[2]) * f,
                1.0,
            );
        }
    }
    Color::WHITE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MemorySource;
    use crate::view::SampleRange;

    fn config(fft_size: i64) -> ViewConfig {
        ViewConfig {
            fft_size,
            ..ViewConfig::default()
        }
    }

    fn tone_source(len: usize) -> Arc<MemorySource<Complex32>> {
        Arc::new(
            MemorySource::from_fn(1000.0, len, |n| {
                Complex32::from_polar(1.0, 2.0 * std::f32::consts::PI * 0.25 * n as f32)
            })
            .unwrap(),
        )
    }

    fn raster(list: &RenderList) -> &Raster {
        list.commands()
            .iter()
            .find_map(|command| match command {
                RenderCommand::Raster(raster) => Some(raster),
                _ => None,
            })
            .expect("raster command")
    }

    #[test]
    #[should_panic(expected = "invalid view config")]
    fn zero_fft_size_is_rejected() {
        SpectrogramPlot::new(tone_source(64), &config(0));
    }

    #[test]
    fn height_follows_fft_size() {
        let mut plot = SpectrogramPlot::new(tone_source(10), &config(64));
        assert_eq!(plot.height(), 64);
        plot.set_fft_size(128);
        assert_eq!(plot.height(), 128);
    }

    #[test]
    fn tone_lights_up_its_row() {
        let source = tone_source(4096);
        let mut plot = SpectrogramPlot::new(source, &config(16));
        plot.set_power_min(-60.0);
        plot.set_power_max(0.0);
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 8.0, 16.0);
        let view = ViewSnapshot::new(SampleRange::new(160, 160 + 8 * 16), 16);
        let mut list = RenderList::new();
        plot.paint_back(&mut list, rect, &view);
        let raster = raster(&list);
        assert_eq!(raster.rows, 16);
        // +0.25 cycles/sample sits a quarter of the height above the centre.
        let hot = raster.cells[3 * raster.columns + 2];
        let cold = raster.cells[12 * raster.columns + 2];
        assert!(hot.r + hot.g + hot.b > cold.r + cold.g + cold.b);
    }

    #[test]
    fn tiles_are_cached_and_cleared_on_zoom() {
        let mut plot = SpectrogramPlot::new(tone_source(2048), &config(32));
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 10.0, 32.0);
        let view = ViewSnapshot::new(SampleRange::new(0, 320), 32);
        let mut list = RenderList::new();
        plot.paint_back(&mut list, rect, &view);
        assert_eq!(plot.tiles.len(), 1);
        plot.paint_back(&mut list, rect, &view);
        assert_eq!(plot.tiles.len(), 1);
        plot.set_zoom_level(2);
        assert!(plot.tiles.is_empty());
    }

    #[test]
    fn source_invalidation_drops_tiles() {
        let source = tone_source(2048);
        let mut plot = SpectrogramPlot::new(
            Arc::clone(&source) as Arc<dyn SampleSource<Complex32>>,
            &config(32),
        );
        let rect = ScreenRect::from_origin_size(0.0, 0.0, 10.0, 32.0);
        let view = ViewSnapshot::new(SampleRange::new(0, 320), 32);
        let mut list = RenderList::new();
        plot.paint_back(&mut list, rect, &view);
        source.extend([Complex32::new(0.0, 0.0)]);
        assert!(plot.stale.load(Ordering::Acquire));
        plot.paint_back(&mut list, rect, &view);
        assert!(!plot.stale.load(Ordering::Acquire));
        assert_eq!(plot.tiles.len(), 1);
    }

    #[test]
    fn power_change_recolors_tile() {
        let mut plot = SpectrogramPlot::new(tone_source(1024), &config(16));
        let colors = plot.tile_colors(0);
        plot.set_power_max(100.0);
        let recolored = plot.tile_colors(0);
        assert!(!Arc::ptr_eq(&colors, &recolored));
    }

    #[test]
    fn dragging_centre_line_moves_tuner() {
        let mut plot = SpectrogramPlot::new(tone_source(1024), &config(100));
        // Centre 0.0 sits at y = 50 in a 100 px tall plot.
        assert!(plot.mouse_event(&PointerEvent::press(10.0, 52.0)));
        assert!(plot.mouse_event(&PointerEvent::drag(10.0, 25.0)));
        assert!(plot.mouse_event(&PointerEvent::release(10.0, 25.0)));
        assert!((plot.tuner().centre - 0.25).abs() < 1e-9);
        assert!(!plot.mouse_event(&PointerEvent::drag(10.0, 80.0)));
    }

    #[test]
    fn dragging_edge_changes_deviation() {
        let mut plot = SpectrogramPlot::new(tone_source(1024), &config(100));
        plot.set_tuner(TunerSettings::new(0.0, 0.1));
        // Upper edge (+0.1) sits at y = 40.
        assert!(plot.mouse_event(&PointerEvent::press(0.0, 40.0)));
        plot.mouse_event(&PointerEvent::drag(0.0, 30.0));
        plot.mouse_event(&PointerEvent::release(0.0, 30.0));
        assert!((plot.tuner().deviation - 0.2).abs() < 1e-9);
        assert!((plot.tuner().centre).abs() < 1e-9);
    }

    #[test]
    fn press_away_from_tuner_is_ignored() {
        let mut plot = SpectrogramPlot::new(tone_source(1024), &config(100));
        assert!(!plot.mouse_event(&PointerEvent::press(10.0, 5.0)));
        assert!(!plot.mouse_event(&PointerEvent::press(10.0, 500.0)));
    }

    #[test]
    fn heat_color_endpoints() {
        assert_eq!(heat_color(0.0), Color::BLACK);
        assert_eq!(heat_color(1.0), Color::WHITE);
        assert_eq!(normalize_power(-200.0, (-100.0, -20.0)), 0.0);
        assert_eq!(normalize_power(-60.0, (-100.0, -20.0)), 0.5);
    }
}
