//! Rendering primitives and clipping helpers.
//!
//! These types are backend-agnostic. Plots describe what they draw by pushing
//! commands onto a [`RenderList`], and render backends (such as the GPUI
//! backend) turn the list into actual paint calls.

use std::sync::Arc;

use crate::geom::{ScreenPoint, ScreenRect};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl LineStyle {
    /// One pixel wide stroke in the given color.
    pub fn hairline(color: Color) -> Self {
        Self { color, width: 1.0 }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::hairline(Color::BLACK)
    }
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl RectStyle {
    /// Fill without a border.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// A grid of colored cells stretched over a rectangle.
///
/// Cells are stored row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Target rectangle.
    pub rect: ScreenRect,
    /// Number of cell columns.
    pub columns: usize,
    /// Number of cell rows.
    pub rows: usize,
    /// Cell colors, `rows * columns` entries.
    pub cells: Arc<Vec<Color>>,
}

/// Render command list.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw a color grid.
    Raster(Raster),
}

/// Aggregated render commands; the drawing surface handed to plots.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run `f` with drawing clipped to `rect`.
    pub fn with_clip(&mut self, rect: ScreenRect, f: impl FnOnce(&mut Self)) {
        self.push(RenderCommand::ClipRect(rect));
        f(self);
        self.push(RenderCommand::ClipEnd);
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: ScreenRect, color: Color) {
        self.push(RenderCommand::Rect {
            rect,
            style: RectStyle::filled(color),
        });
    }

    /// Draw segments, skipping the command when there is nothing to draw.
    pub fn lines(&mut self, segments: Vec<LineSegment>, style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        self.push(RenderCommand::LineSegments { segments, style });
    }

    /// Draw a horizontal line across `rect` at `y`, if it is inside.
    pub fn hline(&mut self, rect: ScreenRect, y: f32, style: LineStyle) {
        if y < rect.min.y || y > rect.max.y {
            return;
        }
        self.lines(
            vec![LineSegment::new(
                ScreenPoint::new(rect.min.x, y),
                ScreenPoint::new(rect.max.x, y),
            )],
            style,
        );
    }

    /// Draw a vertical line across `rect` at `x`, if it is inside.
    pub fn vline(&mut self, rect: ScreenRect, x: f32, style: LineStyle) {
        if x < rect.min.x || x > rect.max.x {
            return;
        }
        self.lines(
            vec![LineSegment::new(
                ScreenPoint::new(x, rect.min.y),
                ScreenPoint::new(x, rect.max.y),
            )],
            style,
        );
    }
}

/// Build clipped line segments joining consecutive screen points.
pub fn build_line_segments(points: &[ScreenPoint], clip: ScreenRect, out: &mut Vec<LineSegment>) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    for window in points.windows(2) {
        if let Some((start, end)) = clip_segment(window[0], window[1], clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const TOP: u8 = 4;
    const BOTTOM: u8 = 8;

    let mut out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
    let mut out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (mut x, mut y) = (0.0_f32, 0.0_f32);

        if (out_code & TOP) != 0 {
            x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            y = rect.min.y;
        } else if (out_code & BOTTOM) != 0 {
            x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            y = rect.max.y;
        } else if (out_code & RIGHT) != 0 {
            y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            x = rect.max.x;
        } else if (out_code & LEFT) != 0 {
            y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            x = rect.min.x;
        }

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect, LEFT, RIGHT, TOP, BOTTOM);
        } else {
            end = new_point;
            out_end = region_code(end, rect, LEFT, RIGHT, TOP, BOTTOM);
        }
    }
}

fn region_code(
    point: ScreenPoint,
    rect: ScreenRect,
    left: u8,
    right: u8,
    top: u8,
    bottom: u8,
) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= left;
    } else if point.x > rect.max.x {
        code |= right;
    }
    if point.y < rect.min.y {
        code |= top;
    } else if point.y > rect.max.y {
        code |= bottom;
    }
    code
}
