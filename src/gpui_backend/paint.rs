use gpui::{
    BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, Window, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle, Raster, RectStyle, RenderCommand};

use super::frame::PlotFrame;

pub(crate) fn paint_frame(frame: &PlotFrame, window: &mut Window) {
    let origin = frame.origin;
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in frame.render.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                let mut bounds = to_bounds(*rect, origin);
                if let Some(outer) = clip_stack.last() {
                    bounds = bounds.intersect(&outer.bounds);
                }
                clip_stack.push(ContentMask { bounds });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, segments, *style, origin);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, *rect, *style, origin);
                });
            }
            RenderCommand::Raster(raster) => {
                with_clip(window, &clip_stack, |window| {
                    paint_raster(window, raster, origin);
                });
            }
        }
    }
}

fn paint_lines(
    window: &mut Window,
    segments: &[LineSegment],
    style: LineStyle,
    origin: ScreenPoint,
) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(to_point(segment.start, origin));
        builder.line_to(to_point(segment.end, origin));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_rect(window: &mut Window, rect: ScreenRect, style: RectStyle, origin: ScreenPoint) {
    let bounds = to_bounds(rect, origin);
    let quad = quad(
        bounds,
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    );
    window.paint_quad(quad);
}

/// Paint a raster as one quad per horizontal run of equal cells.
fn paint_raster(window: &mut Window, raster: &Raster, origin: ScreenPoint) {
    if raster.columns == 0 || raster.rows == 0 {
        return;
    }
    let cell_width = raster.rect.width() / raster.columns as f32;
    let cell_height = raster.rect.height() / raster.rows as f32;
    for (row, cells) in raster.cells.chunks(raster.columns).enumerate() {
        let y = raster.rect.min.y + row as f32 * cell_height;
        let mut start = 0;
        while start < cells.len() {
            let color = cells[start];
            let mut end = start + 1;
            while end < cells.len() && cells[end] == color {
                end += 1;
            }
            let rect = ScreenRect::from_origin_size(
                raster.rect.min.x + start as f32 * cell_width,
                y,
                (end - start) as f32 * cell_width,
                cell_height,
            );
            window.paint_quad(quad(
                to_bounds(rect, origin),
                Corners::all(px(0.0)),
                to_rgba(color),
                Edges::all(px(0.0)),
                to_rgba(color),
                BorderStyle::default(),
            ));
            start = end;
        }
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_point(p: ScreenPoint, origin: ScreenPoint) -> gpui::Point<Pixels> {
    point(px(origin.x + p.x), px(origin.y + p.y))
}

fn to_bounds(rect: ScreenRect, origin: ScreenPoint) -> Bounds<Pixels> {
    Bounds::from_corners(to_point(rect.min, origin), to_point(rect.max, origin))
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
