//! gpui_sigview is a navigable signal view built for GPUI.
//! It stacks a spectrogram and derived traces over one complex sample stream
//! and keeps zoom, scrolling, and a time selection consistent across them.

#![forbid(unsafe_code)]

pub mod config;
pub mod cursors;
pub mod datasource;
pub mod error;
pub mod geom;
pub mod gpui_backend;
pub mod interaction;
pub mod pipeline;
pub mod plot;
pub mod plot_view;
pub mod render;
pub mod scroll;
pub mod style;
pub mod transform;
pub mod view;

pub use config::{ViewConfig, ZoomSettings};
pub use cursors::{CursorResponse, Cursors};
pub use datasource::{
    Listener, MemorySource, Publisher, SampleSource, SampleWindow, Subscription, read_window,
};
pub use error::{SourceError, ViewError};
pub use geom::{ScreenPoint, ScreenRect};
pub use gpui_backend::{GpuiPlotView, PlotViewHandle};
pub use interaction::{Modifiers, PointerButton, PointerEvent, PointerKind, ViewEvent, WheelEvent};
pub use pipeline::{FirFilter, MultiplyConst, PipelineSource, QuadratureDemod, Stage};
pub use plot::{
    PaintLayer, Plot, SpectrogramPlot, TraceData, TracePlot, TunerOutput, TunerSettings,
};
pub use plot_view::PlotView;
pub use render::{
    Color, LineSegment, LineStyle, Raster, RectStyle, RenderCommand, RenderList,
    build_line_segments,
};
pub use rustfft::num_complex::Complex32;
pub use scroll::ScrollBar;
pub use style::Theme;
pub use transform::ColumnTransform;
pub use view::{PixelRange, Range, SampleRange, ViewSnapshot};
