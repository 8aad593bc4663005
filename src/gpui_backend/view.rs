use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    Modifiers as GpuiModifiers, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels,
    Point, ScrollWheelEvent, Window, canvas, div, px,
};

use crate::geom::ScreenPoint;
use crate::interaction::{
    Modifiers, PointerButton, PointerEvent, PointerKind, ViewEvent, WheelEvent,
};
use crate::plot_view::PlotView;

use super::frame::{build_frame, screen_rect};
use super::paint::{paint_frame, to_hsla};

type EventHandler = Arc<dyn Fn(ViewEvent) + Send + Sync>;

/// A GPUI view that renders a [`PlotView`] and routes input into it.
///
/// Zoom intents and selection-time reports are handed to the event handler
/// installed with [`GpuiPlotView::on_view_event`].
#[derive(Clone)]
pub struct GpuiPlotView {
    view: Arc<RwLock<PlotView>>,
    origin: Arc<RwLock<ScreenPoint>>,
    on_event: Option<EventHandler>,
}

impl GpuiPlotView {
    /// Create a GPUI view for the given plot view.
    pub fn new(view: PlotView) -> Self {
        Self {
            view: Arc::new(RwLock::new(view)),
            origin: Arc::new(RwLock::new(ScreenPoint::default())),
            on_event: None,
        }
    }

    /// Install a handler for events the view emits.
    pub fn on_view_event(mut self, handler: impl Fn(ViewEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Arc::new(handler));
        self
    }

    /// Get a handle for driving the underlying plot view from the host UI.
    pub fn handle(&self) -> PlotViewHandle {
        PlotViewHandle {
            view: Arc::clone(&self.view),
        }
    }

    fn local_point(&self, position: Point<Pixels>) -> ScreenPoint {
        let origin = *self.origin.read().expect("canvas origin lock");
        ScreenPoint::new(
            f32::from(position.x) - origin.x,
            f32::from(position.y) - origin.y,
        )
    }

    fn route_pointer(&mut self, event: PointerEvent, cx: &mut Context<Self>) {
        let consumed = self
            .view
            .write()
            .expect("plot view lock")
            .pointer_event(event);
        self.flush(consumed, cx);
    }

    fn flush(&self, changed: bool, cx: &mut Context<Self>) {
        let (events, repaint) = {
            let mut view = self.view.write().expect("plot view lock");
            (view.drain_events(), view.take_repaint())
        };
        if let Some(handler) = self.on_event.as_ref() {
            for event in events {
                handler(event);
            }
        }
        if changed || repaint {
            cx.notify();
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let event = PointerEvent {
            kind: PointerKind::Press,
            position: self.local_point(ev.position),
            button: pointer_button(Some(ev.button)),
            modifiers: modifiers(&ev.modifiers),
        };
        self.route_pointer(event, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let event = PointerEvent {
            kind: PointerKind::Move,
            position: self.local_point(ev.position),
            button: pointer_button(ev.pressed_button),
            modifiers: modifiers(&ev.modifiers),
        };
        self.route_pointer(event, cx);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let event = PointerEvent {
            kind: PointerKind::Release,
            position: self.local_point(ev.position),
            button: pointer_button(Some(ev.button)),
            modifiers: modifiers(&ev.modifiers),
        };
        self.route_pointer(event, cx);
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let line_height = px(16.0);
        let delta = ev.delta.pixel_delta(line_height);
        let event = WheelEvent {
            delta: ScreenPoint::new(f32::from(delta.x), f32::from(delta.y)),
            modifiers: modifiers(&ev.modifiers),
        };
        let handled = self
            .view
            .write()
            .expect("plot view lock")
            .wheel_event(event);
        self.flush(handled, cx);
    }
}

impl Render for GpuiPlotView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let view = Arc::clone(&self.view);
        let origin = Arc::clone(&self.origin);
        let background = view
            .read()
            .expect("plot view lock")
            .config()
            .theme
            .background;

        div()
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, _window, _| {
                        *origin.write().expect("canvas origin lock") = screen_rect(bounds).min;
                        let mut view = view.write().expect("plot view lock");
                        build_frame(&mut view, bounds)
                    },
                    move |_, frame, window, _| {
                        paint_frame(&frame, window);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
    }
}

/// A handle for driving a [`PlotView`] held inside a `GpuiPlotView`.
///
/// The handle clones cheaply and can be moved into async tasks. Call
/// `notify` on the view entity after changes so it repaints.
#[derive(Clone)]
pub struct PlotViewHandle {
    view: Arc<RwLock<PlotView>>,
}

impl PlotViewHandle {
    /// Read the plot view state.
    ///
    /// The view is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&PlotView) -> R) -> R {
        let view = self.view.read().expect("plot view lock");
        f(&view)
    }

    /// Mutate the plot view state.
    ///
    /// The view is locked for the duration of the callback.
    pub fn write<R>(&self, f: impl FnOnce(&mut PlotView) -> R) -> R {
        let mut view = self.view.write().expect("plot view lock");
        f(&mut view)
    }
}

fn pointer_button(button: Option<MouseButton>) -> PointerButton {
    match button {
        Some(MouseButton::Left) => PointerButton::Left,
        Some(MouseButton::Right) => PointerButton::Right,
        Some(MouseButton::Middle) => PointerButton::Middle,
        _ => PointerButton::None,
    }
}

fn modifiers(modifiers: &GpuiModifiers) -> Modifiers {
    Modifiers {
        control: modifiers.control,
        shift: modifiers.shift,
        alt: modifiers.alt,
        platform: modifiers.platform,
    }
}
