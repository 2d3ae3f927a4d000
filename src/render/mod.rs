mod frame;
mod primitives;
mod raster;
mod recording;

pub use frame::{
    BitmapPrimitive, DrawCommand, LinePrimitive, PointPrimitive, RectPrimitive, RenderFrame,
    TextPrimitive,
};
pub use primitives::{Brush, Color, Font, Pen, PenStyle, TextExtent};
pub use raster::{RasterRenderStats, RasterRenderer};
pub use recording::{RecordingContext, TextMetrics};

use image::RgbaImage;

use crate::core::DeviceSize;
use crate::error::PlotResult;

/// Immediate-mode drawing surface the layers paint on.
///
/// Coordinates are device pixels with the origin at the top-left corner,
/// shifted by the current device origin.
pub trait DrawContext {
    fn set_pen(&mut self, pen: Pen);
    fn set_brush(&mut self, brush: Brush);
    fn set_font(&mut self, font: &Font);
    fn set_text_foreground(&mut self, color: Color);
    fn set_device_origin(&mut self, x: i32, y: i32);
    fn device_origin(&self) -> (i32, i32);

    fn draw_point(&mut self, x: i32, y: i32);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);
    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
    fn draw_rotated_text(&mut self, text: &str, x: i32, y: i32, angle_deg: f64);
    fn draw_bitmap(&mut self, image: &RgbaImage, x: i32, y: i32);

    /// Size of `text` in the current font. Multi-line text stacks lines.
    fn text_extent(&self, text: &str) -> TextExtent;

    /// Size of the drawable area.
    fn size(&self) -> DeviceSize;
}

/// Contract implemented by any backend that paints a recorded frame.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContext, CairoContextRenderer, CairoRenderStats, CairoRenderer};
