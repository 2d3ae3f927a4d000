use image::RgbaImage;

use crate::core::DeviceSize;
use crate::render::{
    BitmapPrimitive, Brush, Color, DrawCommand, DrawContext, Font, LinePrimitive, Pen,
    PointPrimitive, RectPrimitive, RenderFrame, TextExtent, TextPrimitive,
};

/// Fixed-advance text measurement used when no font backend is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub char_width: i32,
    pub line_height: i32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7,
            line_height: 13,
        }
    }
}

impl TextMetrics {
    #[must_use]
    pub fn measure(self, text: &str) -> TextExtent {
        if text.is_empty() {
            return TextExtent::new(0, 0);
        }
        let mut widest = 0_i32;
        let mut rows = 0_i32;
        for line in text.split('\n') {
            let chars = i32::try_from(line.chars().count()).unwrap_or(i32::MAX);
            widest = widest.max(chars.saturating_mul(self.char_width));
            rows += 1;
        }
        TextExtent::new(widest, rows.saturating_mul(self.line_height))
    }
}

/// Headless context that records every draw call into a [`RenderFrame`].
///
/// Used by tests, by the raster export path and anywhere the drawing should
/// be replayed on another backend later.
#[derive(Debug)]
pub struct RecordingContext {
    frame: RenderFrame,
    metrics: TextMetrics,
    pen: Pen,
    brush: Brush,
    font: Font,
    text_color: Color,
    origin: (i32, i32),
}

impl RecordingContext {
    #[must_use]
    pub fn new(size: DeviceSize) -> Self {
        Self::with_metrics(size, TextMetrics::default())
    }

    #[must_use]
    pub fn with_metrics(size: DeviceSize, metrics: TextMetrics) -> Self {
        Self {
            frame: RenderFrame::new(size),
            metrics,
            pen: Pen::default(),
            brush: Brush::default(),
            font: Font::default(),
            text_color: Color::BLACK,
            origin: (0, 0),
        }
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn into_frame(self) -> RenderFrame {
        self.frame
    }

    #[must_use]
    pub fn pen(&self) -> Pen {
        self.pen
    }

    #[must_use]
    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn clear(&mut self) {
        self.frame.clear();
    }

    fn shift(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.saturating_add(self.origin.0),
            y.saturating_add(self.origin.1),
        )
    }

    fn push_text(&mut self, text: &str, x: i32, y: i32, angle_deg: f64) {
        if text.is_empty() {
            return;
        }
        let (x, y) = self.shift(x, y);
        self.frame.push(DrawCommand::Text(TextPrimitive {
            text: text.to_owned(),
            x,
            y,
            angle_deg,
            font: self.font.clone(),
            color: self.text_color,
        }));
    }
}

impl DrawContext for RecordingContext {
    fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }

    fn set_text_foreground(&mut self, color: Color) {
        self.text_color = color;
    }

    fn set_device_origin(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    fn device_origin(&self) -> (i32, i32) {
        self.origin
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        let (x, y) = self.shift(x, y);
        self.frame.push(DrawCommand::Point(PointPrimitive {
            x,
            y,
            pen: self.pen,
        }));
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1) = self.shift(x1, y1);
        let (x2, y2) = self.shift(x2, y2);
        self.frame.push(DrawCommand::Line(LinePrimitive {
            x1,
            y1,
            x2,
            y2,
            pen: self.pen,
        }));
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let (x, y) = self.shift(x, y);
        self.frame.push(DrawCommand::Rect(RectPrimitive {
            x,
            y,
            width,
            height,
            pen: self.pen,
            brush: self.brush,
        }));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.push_text(text, x, y, 0.0);
    }

    fn draw_rotated_text(&mut self, text: &str, x: i32, y: i32, angle_deg: f64) {
        self.push_text(text, x, y, angle_deg);
    }

    fn draw_bitmap(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let (x, y) = self.shift(x, y);
        self.frame.push(DrawCommand::Bitmap(BitmapPrimitive {
            x,
            y,
            image: image.clone(),
        }));
    }

    fn text_extent(&self, text: &str) -> TextExtent {
        self.metrics.measure(text)
    }

    fn size(&self) -> DeviceSize {
        self.frame.size
    }
}
