use std::path::Path;

use image::{ImageFormat, Pixel, Rgba, RgbaImage, imageops};
use tracing::debug;

use crate::core::{ClipBand, DeviceSize, Segment, clip_segment};
use crate::error::{PlotError, PlotResult};
use crate::render::{Brush, Color, DrawCommand, Pen, PenStyle, RenderFrame, Renderer};

/// Widest pen footprint the rasteriser stamps.
const MAX_PEN_WIDTH: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub bitmaps_drawn: usize,
    /// Text is measured but never rasterized by this backend.
    pub texts_skipped: usize,
}

/// Software renderer painting recorded frames into an RGBA pixel buffer.
///
/// Glyphs are not rasterized; use the cairo backend when text must appear in
/// the output.
#[derive(Debug)]
pub struct RasterRenderer {
    image: RgbaImage,
    clear_color: Color,
    last_stats: RasterRenderStats,
}

impl RasterRenderer {
    pub fn new(size: DeviceSize) -> PlotResult<Self> {
        if !size.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        Ok(Self {
            image: RgbaImage::new(size.width, size.height),
            clear_color: Color::WHITE,
            last_stats: RasterRenderStats::default(),
        })
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn set_clear_color(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> RasterRenderStats {
        self.last_stats
    }

    pub fn save(&self, path: &Path, format: ImageFormat) -> PlotResult<()> {
        self.image
            .save_with_format(path, format)
            .map_err(|err| PlotError::Export(format!("failed to write {}: {err}", path.display())))?;
        debug!(path = %path.display(), ?format, "raster image written");
        Ok(())
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        self.image.get_pixel_mut(x, y).blend(&color);
    }

    fn stamp(&mut self, x: i32, y: i32, pen: Pen) {
        let color = Rgba(pen.color.to_rgba8());
        let width = i64::from(pen.width.clamp(1, MAX_PEN_WIDTH));
        let half = width / 2;
        let (x, y) = (i64::from(x) - half, i64::from(y) - half);
        for dy in 0..width {
            for dx in 0..width {
                if let (Ok(px), Ok(py)) = (i32::try_from(x + dx), i32::try_from(y + dy)) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    /// Image rect grown by the pen footprint, so thick strokes along an
    /// edge keep their overhang.
    fn band(&self, pen: Pen) -> ClipBand {
        let pad = i32::try_from(pen.width.min(MAX_PEN_WIDTH)).unwrap_or(0);
        let right = i32::try_from(self.image.width()).unwrap_or(i32::MAX);
        let bottom = i32::try_from(self.image.height()).unwrap_or(i32::MAX);
        ClipBand::new(-pad, right.saturating_add(pad), -pad, bottom.saturating_add(pad))
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, pen: Pen) {
        let Some(visible) = clip_segment(Segment::new(x0, y0, x1, y1), self.band(pen)) else {
            return;
        };
        let (x0, y0) = (i64::from(visible.x0), i64::from(visible.y0));
        let (x1, y1) = (i64::from(visible.x1), i64::from(visible.y1));
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut step = 0_u64;
        loop {
            if pen.style == PenStyle::Solid || step % 2 == 0 {
                if let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(y)) {
                    self.stamp(px, py, pen);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1;
        }
    }

    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, pen: Pen, brush: Brush) {
        if width <= 0 || height <= 0 {
            return;
        }
        let right = x.saturating_add(width - 1);
        let bottom = y.saturating_add(height - 1);
        if let Brush::Solid(fill) = brush {
            let fill = Rgba(fill.to_rgba8());
            let cols = x.max(0)..=right.min(self.image_right());
            for row in y.max(0)..=bottom.min(self.image_bottom()) {
                for col in cols.clone() {
                    self.blend(col, row, fill);
                }
            }
        }
        self.line(x, y, right, y, pen);
        self.line(right, y, right, bottom, pen);
        self.line(right, bottom, x, bottom, pen);
        self.line(x, bottom, x, y, pen);
    }

    fn image_right(&self) -> i32 {
        i32::try_from(self.image.width()).unwrap_or(i32::MAX) - 1
    }

    fn image_bottom(&self) -> i32 {
        i32::try_from(self.image.height()).unwrap_or(i32::MAX) - 1
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        if frame.size.width != self.image.width() || frame.size.height != self.image.height() {
            self.image = RgbaImage::new(frame.size.width, frame.size.height);
        }
        let clear = Rgba(self.clear_color.to_rgba8());
        for pixel in self.image.pixels_mut() {
            *pixel = clear;
        }

        let mut stats = RasterRenderStats::default();
        for command in &frame.commands {
            match command {
                DrawCommand::Line(line) => {
                    self.line(line.x1, line.y1, line.x2, line.y2, line.pen);
                    stats.lines_drawn += 1;
                }
                DrawCommand::Point(point) => self.stamp(point.x, point.y, point.pen),
                DrawCommand::Rect(rect) => {
                    self.rect(rect.x, rect.y, rect.width, rect.height, rect.pen, rect.brush);
                    stats.rects_drawn += 1;
                }
                DrawCommand::Text(_) => stats.texts_skipped += 1,
                DrawCommand::Bitmap(bitmap) => {
                    imageops::overlay(
                        &mut self.image,
                        &bitmap.image,
                        i64::from(bitmap.x),
                        i64::from(bitmap.y),
                    );
                    stats.bitmaps_drawn += 1;
                }
            }
        }
        self.last_stats = stats;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::RasterRenderer;
    use crate::core::DeviceSize;
    use crate::render::{Brush, Color, DrawContext, Pen, RecordingContext, Renderer};

    #[test]
    fn replays_lines_and_filled_rects() {
        let size = DeviceSize::new(20, 20);
        let mut ctx = RecordingContext::new(size);
        ctx.set_pen(Pen::new(Color::BLACK, 1));
        ctx.draw_line(0, 0, 19, 0);
        ctx.set_brush(Brush::Solid(Color::rgb(1.0, 0.0, 0.0)));
        ctx.draw_rectangle(5, 5, 5, 5);

        let mut renderer = RasterRenderer::new(size).expect("renderer");
        renderer.render(ctx.frame()).expect("render");

        let image = renderer.image();
        assert_eq!(*image.get_pixel(10, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(7, 7), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 15), Rgba([255, 255, 255, 255]));
        assert_eq!(renderer.last_stats().rects_drawn, 1);
    }

    #[test]
    fn rejects_empty_surface() {
        assert!(RasterRenderer::new(DeviceSize::new(0, 4)).is_err());
    }

    #[test]
    fn saturated_endpoints_are_clipped_to_the_image() {
        let size = DeviceSize::new(16, 16);
        let mut ctx = RecordingContext::new(size);
        ctx.set_pen(Pen::new(Color::BLACK, 1));
        ctx.draw_line(i32::MIN, 8, i32::MAX, 8);
        ctx.set_pen(Pen::new(Color::BLACK, 3));
        ctx.draw_point(i32::MIN, i32::MAX);
        ctx.set_brush(Brush::Solid(Color::rgb(1.0, 0.0, 0.0)));
        ctx.draw_rectangle(-1_000_000_000, 12, i32::MAX, i32::MAX);

        let mut renderer = RasterRenderer::new(size).expect("renderer");
        renderer.render(ctx.frame()).expect("render");

        let image = renderer.image();
        assert_eq!(*image.get_pixel(0, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 8), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(0, 14), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 0), Rgba([255, 255, 255, 255]));
    }
}
