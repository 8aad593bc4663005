//! Style and theming.

use crate::render::Color;

/// Visual theme for the plot stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Viewport background.
    pub background: Color,
    /// In-phase trace color.
    pub trace_i: Color,
    /// Quadrature trace color.
    pub trace_q: Color,
    /// Scalar trace color.
    pub trace_real: Color,
    /// Zero line drawn behind traces.
    pub axis: Color,
    /// Tuner centre line.
    pub tuner_centre: Color,
    /// Tuner band edges.
    pub tuner_edge: Color,
    /// Selection fill.
    pub selection_fill: Color,
    /// Selection handles.
    pub cursor: Color,
    /// Segment boundaries inside the selection.
    pub segment: Color,
}

impl Theme {
    /// Create the default (dark) theme.
    pub fn new() -> Self {
        Self::dark()
    }

    /// Dark theme matching a black viewport.
    pub fn dark() -> Self {
        Self {
            background: Color::BLACK,
            trace_i: Color::new(1.0, 0.0, 0.0, 1.0),
            trace_q: Color::new(0.0, 0.0, 1.0, 1.0),
            trace_real: Color::new(0.0, 1.0, 0.0, 1.0),
            axis: Color::new(0.3, 0.3, 0.3, 1.0),
            tuner_centre: Color::new(1.0, 1.0, 1.0, 0.8),
            tuner_edge: Color::new(1.0, 1.0, 1.0, 0.4),
            selection_fill: Color::new(1.0, 1.0, 1.0, 0.1),
            cursor: Color::new(1.0, 1.0, 0.0, 1.0),
            segment: Color::new(1.0, 1.0, 0.0, 0.5),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
