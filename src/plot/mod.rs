//! Plots stacked vertically inside the view.
//!
//! Every plot shares the controller's sample range and zoom, reports a
//! height, paints itself in three passes, and may consume pointer input.

mod spectrogram;
mod trace;
mod tuner;

pub use spectrogram::SpectrogramPlot;
pub use trace::{TraceData, TracePlot};
pub use tuner::{TunerOutput, TunerSettings};

use crate::geom::ScreenRect;
use crate::interaction::PointerEvent;
use crate::render::RenderList;
use crate::view::ViewSnapshot;

/// Paint pass. All plots finish one pass before any plot starts the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintLayer {
    /// Backgrounds and heat maps.
    Back,
    /// Data traces.
    Mid,
    /// Overlays such as the tuner.
    Front,
}

impl PaintLayer {
    /// Passes in paint order.
    pub const ALL: [PaintLayer; 3] = [PaintLayer::Back, PaintLayer::Mid, PaintLayer::Front];
}

/// One plot in the stack.
pub enum Plot {
    /// Time-frequency heat map with a tuner.
    Spectrogram(SpectrogramPlot),
    /// Line trace of a derived source.
    Trace(TracePlot),
}

impl Plot {
    /// Height in pixels.
    pub fn height(&self) -> i32 {
        match self {
            Plot::Spectrogram(plot) => plot.height(),
            Plot::Trace(plot) => plot.height(),
        }
    }

    /// Paint one pass into `rect`, which has the plot's height and the
    /// viewport's width.
    pub fn paint(
        &mut self,
        layer: PaintLayer,
        out: &mut RenderList,
        rect: ScreenRect,
        view: &ViewSnapshot,
    ) {
        match (self, layer) {
            (Plot::Spectrogram(plot), PaintLayer::Back) => plot.paint_back(out, rect, view),
            (Plot::Spectrogram(plot), PaintLayer::Front) => plot.paint_front(out, rect, view),
            (Plot::Spectrogram(_), PaintLayer::Mid) => {}
            (Plot::Trace(plot), PaintLayer::Back) => plot.paint_back(out, rect, view),
            (Plot::Trace(plot), PaintLayer::Mid) => plot.paint_mid(out, rect, view),
            (Plot::Trace(_), PaintLayer::Front) => {}
        }
    }

    /// Offer a pointer event in plot-local coordinates. Returns whether the
    /// plot consumed it.
    pub fn mouse_event(&mut self, event: &PointerEvent) -> bool {
        match self {
            Plot::Spectrogram(plot) => plot.mouse_event(event),
            Plot::Trace(plot) => plot.mouse_event(event),
        }
    }

    /// The spectrogram, if this plot is one.
    pub fn as_spectrogram(&self) -> Option<&SpectrogramPlot> {
        match self {
            Plot::Spectrogram(plot) => Some(plot),
            Plot::Trace(_) => None,
        }
    }

    /// The spectrogram, if this plot is one.
    pub fn as_spectrogram_mut(&mut self) -> Option<&mut SpectrogramPlot> {
        match self {
            Plot::Spectrogram(plot) => Some(plot),
            Plot::Trace(_) => None,
        }
    }
}

impl From<SpectrogramPlot> for Plot {
    fn from(plot: SpectrogramPlot) -> Self {
        Plot::Spectrogram(plot)
    }
}

impl From<TracePlot> for Plot {
    fn from(plot: TracePlot) -> Self {
        Plot::Trace(plot)
    }
}
