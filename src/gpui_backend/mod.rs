//! GPUI integration for gpui_sigview.
//!
//! This module provides a GPUI view that owns a
//! [`PlotView`](crate::plot_view::PlotView), feeds it resize, pointer, and
//! wheel events, and paints the render list it produces.

mod frame;
mod paint;
mod view;

pub use view::{GpuiPlotView, PlotViewHandle};
