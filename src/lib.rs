//! mathplot-rs: an embeddable 2D plotting canvas.
//!
//! A [`PlotWindow`] owns an ordered list of layers (functions, data series,
//! shapes, bitmaps, axes, overlays) and the viewport transform that maps
//! data coordinates to device pixels. Hosts feed it pointer, wheel and
//! scrollbar events and hand it a [`render::DrawContext`] to paint on.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layers;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{ColourTheme, PlotWindow, PlotWindowConfig, Printout};
pub use error::{PlotError, PlotResult};
pub use layers::{Layer, LayerId, LayerKind};
