//! Selection overlay: a draggable pair of time cursors.
//!
//! The overlay works purely in pixel columns. It sees pointer events before
//! any plot and reports when the user moved the selection; the view
//! controller converts between columns and absolute samples.

use crate::geom::ScreenRect;
use crate::interaction::{PointerButton, PointerEvent, PointerKind, near};
use crate::render::{LineStyle, RenderList};
use crate::style::Theme;
use crate::view::PixelRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Idle,
    LeftHandle,
    RightHandle,
    /// Whole selection, grabbed `offset` columns right of its left edge.
    Whole { offset: i32 },
}

/// What the overlay did with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorResponse {
    /// Not for the overlay; offer it to the plots.
    Ignored,
    /// Consumed without changing the selection.
    Captured,
    /// Consumed and the selection moved.
    Moved,
}

impl CursorResponse {
    /// Check whether the event was consumed.
    pub fn consumed(self) -> bool {
        self != CursorResponse::Ignored
    }
}

/// Pixel-space selection with draggable edges.
#[derive(Debug, Clone)]
pub struct Cursors {
    selection: PixelRange,
    segments: u32,
    drag: DragMode,
    tolerance: i32,
    theme: Theme,
}

impl Cursors {
    /// Create an overlay with an empty selection at column 0.
    pub fn new(tolerance: i32, theme: Theme) -> Self {
        Self {
            selection: PixelRange::default(),
            segments: 1,
            drag: DragMode::Idle,
            tolerance: tolerance.max(0),
            theme,
        }
    }

    /// Current selection in pixel columns.
    pub fn selection(&self) -> PixelRange {
        self.selection
    }

    /// Replace the selection. Bounds are reordered if inverted.
    pub fn set_selection(&mut self, selection: PixelRange) {
        self.selection = PixelRange::new(selection.minimum, selection.maximum);
    }

    /// Number of equal sub-bands the selection is split into.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Split the selection into `segments` sub-bands (at least one).
    pub fn set_segments(&mut self, segments: u32) {
        self.segments = segments.max(1);
    }

    /// Columns of the inner boundaries between segments.
    pub fn segment_boundaries(&self) -> Vec<f32> {
        let width = self.selection.length() as f32;
        (1..self.segments)
            .map(|i| self.selection.minimum as f32 + width * i as f32 / self.segments as f32)
            .collect()
    }

    /// Check whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag != DragMode::Idle
    }

    /// Handle a pointer event in viewport coordinates. Positions are clamped
    /// to `[0, viewport_width]`.
    pub fn mouse_event(&mut self, event: &PointerEvent, viewport_width: i32) -> CursorResponse {
        let column = (event.position.x.round() as i32).clamp(0, viewport_width.max(0));
        match event.kind {
            PointerKind::Press => {
                if event.button != PointerButton::Left {
                    return CursorResponse::Ignored;
                }
                let x = event.position.x;
                let tolerance = self.tolerance as f32;
                self.drag = if near(x, self.selection.minimum as f32, tolerance) {
                    DragMode::LeftHandle
                } else if near(x, self.selection.maximum as f32, tolerance) {
                    DragMode::RightHandle
                } else if x > self.selection.minimum as f32 && x < self.selection.maximum as f32 {
                    DragMode::Whole {
                        offset: column - self.selection.minimum,
                    }
                } else {
                    DragMode::Idle
                };
                if self.drag == DragMode::Idle {
                    CursorResponse::Ignored
                } else {
                    CursorResponse::Captured
                }
            }
            PointerKind::Move => {
                let previous = self.selection;
                match self.drag {
                    DragMode::Idle => return CursorResponse::Ignored,
                    DragMode::LeftHandle => {
                        self.selection.minimum = column;
                        self.normalize();
                    }
                    DragMode::RightHandle => {
                        self.selection.maximum = column;
                        self.normalize();
                    }
                    DragMode::Whole { offset } => {
                        let width = self.selection.length();
                        let left = (column - offset).clamp(0, (viewport_width - width).max(0));
                        self.selection = PixelRange::new(left, left + width);
                    }
                }
                if self.selection == previous {
                    CursorResponse::Captured
                } else {
                    CursorResponse::Moved
                }
            }
            PointerKind::Release => {
                if self.drag == DragMode::Idle {
                    return CursorResponse::Ignored;
                }
                self.drag = DragMode::Idle;
                CursorResponse::Captured
            }
        }
    }

    /// Keep `minimum <= maximum` while a handle is dragged past the other.
    fn normalize(&mut self) {
        if self.selection.minimum <= self.selection.maximum {
            return;
        }
        std::mem::swap(&mut self.selection.minimum, &mut self.selection.maximum);
        self.drag = match self.drag {
            DragMode::LeftHandle => DragMode::RightHandle,
            DragMode::RightHandle => DragMode::LeftHandle,
            other => other,
        };
    }

    /// Draw the selection band, its handles, and segment boundaries over
    /// `rect` (the visible viewport).
    pub fn paint_front(&self, out: &mut RenderList, rect: ScreenRect) {
        let left = rect.min.x + self.selection.minimum as f32;
        let right = rect.min.x + self.selection.maximum as f32;
        if right > left {
            out.fill_rect(
                ScreenRect::from_origin_size(left, rect.min.y, right - left, rect.height()),
                self.theme.selection_fill,
            );
        }
        for x in self.segment_boundaries() {
            out.vline(rect, rect.min.x + x, LineStyle::hairline(self.theme.segment));
        }
        out.vline(rect, left, LineStyle::hairline(self.theme.cursor));
        out.vline(rect, right, LineStyle::hairline(self.theme.cursor));
    }
}
