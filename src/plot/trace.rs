//! Trace plot: sample amplitude over time.

use std::sync::Arc;

use rustfft::num_complex::Complex32;

use crate::datasource::{SampleSource, read_window};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::PointerEvent;
use crate::render::{Color, LineSegment, LineStyle, RenderList, build_line_segments};
use crate::style::Theme;
use crate::transform::ColumnTransform;
use crate::view::ViewSnapshot;

/// Data behind a trace plot.
#[derive(Clone)]
pub enum TraceData {
    /// Complex samples drawn as separate I and Q traces.
    Complex(Arc<dyn SampleSource<Complex32>>),
    /// Real samples drawn as one trace.
    Real(Arc<dyn SampleSource<f32>>),
}

impl std::fmt::Debug for TraceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complex(source) => write!(f, "TraceData::Complex(count: {})", source.count()),
            Self::Real(source) => write!(f, "TraceData::Real(count: {})", source.count()),
        }
    }
}

/// Fixed-height plot of one source drawn as line traces.
///
/// Amplitude `+1` maps to the top edge and `-1` to the bottom edge. When a
/// column covers several samples it is drawn as a vertical min/max span.
#[derive(Debug, Clone)]
pub struct TracePlot {
    data: TraceData,
    height: i32,
    theme: Theme,
}

impl TracePlot {
    /// Create a trace of complex samples.
    pub fn complex(source: Arc<dyn SampleSource<Complex32>>, height: i32, theme: Theme) -> Self {
        Self {
            data: TraceData::Complex(source),
            height: height.max(0),
            theme,
        }
    }

    /// Create a trace of real samples.
    pub fn real(source: Arc<dyn SampleSource<f32>>, height: i32, theme: Theme) -> Self {
        Self {
            data: TraceData::Real(source),
            height: height.max(0),
            theme,
        }
    }

    /// Plot height in pixels.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The source being drawn.
    pub fn data(&self) -> &TraceData {
        &self.data
    }

    pub(crate) fn paint_back(&self, out: &mut RenderList, rect: ScreenRect, _view: &ViewSnapshot) {
        let mid = (rect.min.y + rect.max.y) * 0.5;
        out.hline(rect, mid, LineStyle::hairline(self.theme.axis));
    }

    pub(crate) fn paint_mid(&self, out: &mut RenderList, rect: ScreenRect, view: &ViewSnapshot) {
        let Some(transform) = ColumnTransform::new(*view, rect) else {
            return;
        };
        let mut segments = Vec::new();
        match &self.data {
            TraceData::Complex(source) => {
                let window = read_window(source.as_ref(), view.range);
                let i: Vec<f32> = window.samples.iter().map(|s| s.re).collect();
                let q: Vec<f32> = window.samples.iter().map(|s| s.im).collect();
                let start = window.start;
                let theme = &self.theme;
                self.draw_channel(out, &transform, start, &i, theme.trace_i, &mut segments);
                self.draw_channel(out, &transform, start, &q, theme.trace_q, &mut segments);
            }
            TraceData::Real(source) => {
                let window = read_window(source.as_ref(), view.range);
                self.draw_channel(
                    out,
                    &transform,
                    window.start,
                    &window.samples,
                    self.theme.trace_real,
                    &mut segments,
                );
            }
        }
    }

    pub(crate) fn mouse_event(&mut self, _event: &PointerEvent) -> bool {
        false
    }

    fn draw_channel(
        &self,
        out: &mut RenderList,
        transform: &ColumnTransform,
        start: i64,
        values: &[f32],
        color: Color,
        segments: &mut Vec<LineSegment>,
    ) {
        let points = trace_points(transform, start, values);
        build_line_segments(&points, transform.screen(), segments);
        out.lines(std::mem::take(segments), LineStyle::hairline(color));
    }
}

/// Screen points for one channel starting at absolute sample `start`.
fn trace_points(transform: &ColumnTransform, start: i64, values: &[f32]) -> Vec<ScreenPoint> {
    let spc = transform.view().samples_per_column;
    if spc <= 1 {
        return values
            .iter()
            .enumerate()
            .map(|(k, value)| transform.to_screen(start + k as i64, *value))
            .collect();
    }

    // Bucket by column and draw each as a min/max pair.
    let mut points = Vec::with_capacity(2 * values.len() / spc as usize + 2);
    let origin = transform.view().range.minimum;
    let mut index = 0;
    while index < values.len() {
        let sample = start + index as i64;
        let column = (sample - origin).div_euclid(spc);
        let column_end = origin + (column + 1) * spc;
        let take = ((column_end - sample) as usize).min(values.len() - index);
        let bucket = &values[index..index + take];
        let (low, high) = bucket
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let x = transform.sample_to_x(origin + column * spc);
        points.push(ScreenPoint::new(x, transform.amplitude_to_y(low)));
        points.push(ScreenPoint::new(x, transform.amplitude_to_y(high)));
        index += take;
    }
    points
}
