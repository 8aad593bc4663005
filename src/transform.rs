//! Coordinate transforms between sample offsets and screen columns.

use crate::geom::{ScreenPoint, ScreenRect};
use crate::view::ViewSnapshot;

/// Maps absolute sample offsets onto the pixel columns of one rectangle.
///
/// Column 0 is the left edge of `screen`, and it shows the first sample of
/// the snapshot's view range.
#[derive(Debug, Clone, Copy)]
pub struct ColumnTransform {
    view: ViewSnapshot,
    screen: ScreenRect,
}

impl ColumnTransform {
    /// Create a transform for the given snapshot and screen rectangle.
    ///
    /// Returns `None` for degenerate geometry (no area or no zoom).
    pub fn new(view: ViewSnapshot, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || view.samples_per_column <= 0 {
            return None;
        }
        Some(Self { view, screen })
    }

    /// Access the view snapshot.
    pub fn view(&self) -> ViewSnapshot {
        self.view
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map an absolute sample offset into an X coordinate.
    pub fn sample_to_x(&self, sample: i64) -> f32 {
        let delta = (sample - self.view.range.minimum) as f64;
        self.screen.min.x + (delta / self.view.samples_per_column as f64) as f32
    }

    /// Map a value in `[-1, 1]` to a Y coordinate, +1 at the top edge.
    pub fn amplitude_to_y(&self, value: f32) -> f32 {
        let mid = (self.screen.min.y + self.screen.max.y) * 0.5;
        mid - value * self.screen.height() * 0.5
    }

    /// Map a sample offset and amplitude to a screen point.
    pub fn to_screen(&self, sample: i64, value: f32) -> ScreenPoint {
        ScreenPoint::new(self.sample_to_x(sample), self.amplitude_to_y(value))
    }
}

/// Convert a pixel column to the absolute sample it starts at.
pub fn column_to_sample(scroll: i64, column: i32, samples_per_column: i64) -> i64 {
    scroll + column as i64 * samples_per_column
}

/// Convert an absolute sample to the pixel column that shows it.
///
/// Samples left of `scroll` map to negative columns (floor division).
pub fn sample_to_column(scroll: i64, sample: i64, samples_per_column: i64) -> i32 {
    if samples_per_column <= 0 {
        return 0;
    }
    let column = (sample - scroll).div_euclid(samples_per_column);
    column.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
