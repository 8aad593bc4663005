use gpui::{Bounds, Pixels};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::plot_view::PlotView;
use crate::render::RenderList;

/// One painted frame: the view's render list and where the canvas sits in
/// the window.
#[derive(Debug, Clone)]
pub(crate) struct PlotFrame {
    pub(crate) origin: ScreenPoint,
    pub(crate) render: RenderList,
}

pub(crate) fn build_frame(view: &mut PlotView, bounds: Bounds<Pixels>) -> PlotFrame {
    let rect = screen_rect(bounds);
    let width = rect.width().round() as i32;
    let height = rect.height().round() as i32;
    if view.viewport_size() != (width, height) {
        view.set_viewport_size(width, height);
    }
    let mut render = RenderList::new();
    view.paint(&mut render);
    PlotFrame {
        origin: rect.min,
        render,
    }
}

pub(crate) fn screen_rect(bounds: Bounds<Pixels>) -> ScreenRect {
    ScreenRect::from_origin_size(
        f32::from(bounds.origin.x),
        f32::from(bounds.origin.y),
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}
