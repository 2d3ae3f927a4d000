use std::fs::File;
use std::path::Path;

use cairo::{Context, Format, ImageSurface};
use image::RgbaImage;
use pango::FontDescription;
use tracing::warn;

use crate::core::DeviceSize;
use crate::error::{PlotError, PlotResult};
use crate::render::{
    Brush, Color, DrawCommand, DrawContext, Font, Pen, PenStyle, RenderFrame, Renderer,
    TextExtent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    pub bitmaps_drawn: usize,
}

/// Optional extension trait for renderers that can replay a frame into an
/// external Cairo context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(&mut self, context: &Context, frame: &RenderFrame)
    -> PlotResult<()>;
}

/// Live drawing context over a Cairo context, measuring text with Pango.
///
/// Cairo failures inside draw calls are kept and surfaced by
/// [`CairoContext::take_error`] since the drawing trait itself is infallible.
#[derive(Debug)]
pub struct CairoContext {
    context: Context,
    size: DeviceSize,
    pen: Pen,
    brush: Brush,
    font: Font,
    text_color: Color,
    origin: (i32, i32),
    error: Option<PlotError>,
}

impl CairoContext {
    #[must_use]
    pub fn new(context: Context, size: DeviceSize) -> Self {
        Self {
            context,
            size,
            pen: Pen::default(),
            brush: Brush::default(),
            font: Font::default(),
            text_color: Color::BLACK,
            origin: (0, 0),
            error: None,
        }
    }

    /// First backend failure since the last call, if any.
    pub fn take_error(&mut self) -> Option<PlotError> {
        self.error.take()
    }

    fn keep(&mut self, prefix: &str, result: Result<(), cairo::Error>) {
        if let Err(err) = result {
            warn!(error = %err, "{prefix}");
            if self.error.is_none() {
                self.error = Some(map_backend_error(prefix, err));
            }
        }
    }

    fn shift(&self, x: i32, y: i32) -> (f64, f64) {
        (
            f64::from(x) + f64::from(self.origin.0),
            f64::from(y) + f64::from(self.origin.1),
        )
    }

    fn show_text(&mut self, text: &str, x: i32, y: i32, angle_deg: f64) {
        if text.is_empty() {
            return;
        }
        let (x, y) = self.shift(x, y);
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(&self.font)));
        layout.set_text(text);
        apply_color(&self.context, self.text_color);
        let saved = self.context.save();
        self.keep("failed to save cairo state", saved);
        self.context.translate(x, y);
        self.context.rotate(-angle_deg.to_radians());
        self.context.move_to(0.0, 0.0);
        pangocairo::functions::show_layout(&self.context, &layout);
        let restored = self.context.restore();
        self.keep("failed to restore cairo state", restored);
    }
}

impl DrawContext for CairoContext {
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
        apply_color(&self.context, self.pen.color);
        self.context.rectangle(x, y, 1.0, 1.0);
        let filled = self.context.fill();
        self.keep("failed to fill point", filled);
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1) = self.shift(x1, y1);
        let (x2, y2) = self.shift(x2, y2);
        let stroked = stroke_line(&self.context, self.pen, (x1, y1), (x2, y2));
        self.keep("failed to stroke line", stroked);
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let (x, y) = self.shift(x, y);
        let painted = paint_rect(
            &self.context,
            (x, y, f64::from(width), f64::from(height)),
            self.pen,
            self.brush,
        );
        self.keep("failed to paint rectangle", painted);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.show_text(text, x, y, 0.0);
    }

    fn draw_rotated_text(&mut self, text: &str, x: i32, y: i32, angle_deg: f64) {
        self.show_text(text, x, y, angle_deg);
    }

    fn draw_bitmap(&mut self, image: &RgbaImage, x: i32, y: i32) {
        let (x, y) = self.shift(x, y);
        let painted = paint_bitmap(&self.context, image, x, y);
        if let Err(err) = painted {
            warn!(error = %err, "failed to paint bitmap");
            self.error.get_or_insert(err);
        }
    }

    fn text_extent(&self, text: &str) -> TextExtent {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(&self.font)));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        TextExtent::new(width, height)
    }

    fn size(&self) -> DeviceSize {
        self.size
    }
}

/// Cairo + Pango + PangoCairo renderer replaying recorded frames.
///
/// This renderer supports two modes:
/// - offscreen image-surface rendering through `Renderer::render`
/// - in-place rendering on an external Cairo context through
///   `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(size: DeviceSize) -> PlotResult<Self> {
        if !size.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        let surface = ImageSurface::create(Format::ARgb32, size.w(), size.h())
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> PlotResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Writes the offscreen surface as PNG.
    pub fn write_png(&self, path: &Path) -> PlotResult<()> {
        let mut file = File::create(path)
            .map_err(|err| PlotError::Export(format!("failed to create {}: {err}", path.display())))?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| PlotError::Export(format!("failed to encode png: {err}")))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> PlotResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for command in &frame.commands {
            match command {
                DrawCommand::Line(line) => {
                    stroke_line(
                        context,
                        line.pen,
                        (f64::from(line.x1), f64::from(line.y1)),
                        (f64::from(line.x2), f64::from(line.y2)),
                    )
                    .map_err(|err| map_backend_error("failed to stroke line", err))?;
                    stats.lines_drawn += 1;
                }
                DrawCommand::Point(point) => {
                    apply_color(context, point.pen.color);
                    context.rectangle(f64::from(point.x), f64::from(point.y), 1.0, 1.0);
                    context
                        .fill()
                        .map_err(|err| map_backend_error("failed to fill point", err))?;
                }
                DrawCommand::Rect(rect) => {
                    paint_rect(
                        context,
                        (
                            f64::from(rect.x),
                            f64::from(rect.y),
                            f64::from(rect.width),
                            f64::from(rect.height),
                        ),
                        rect.pen,
                        rect.brush,
                    )
                    .map_err(|err| map_backend_error("failed to paint rectangle", err))?;
                    stats.rects_drawn += 1;
                }
                DrawCommand::Text(text) => {
                    let layout = pangocairo::functions::create_layout(context);
                    layout.set_font_description(Some(&font_description(&text.font)));
                    layout.set_text(&text.text);
                    apply_color(context, text.color);
                    context
                        .save()
                        .map_err(|err| map_backend_error("failed to save cairo state", err))?;
                    context.translate(f64::from(text.x), f64::from(text.y));
                    context.rotate(-text.angle_deg.to_radians());
                    context.move_to(0.0, 0.0);
                    pangocairo::functions::show_layout(context, &layout);
                    context
                        .restore()
                        .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
                    stats.texts_drawn += 1;
                }
                DrawCommand::Bitmap(bitmap) => {
                    paint_bitmap(
                        context,
                        &bitmap.image,
                        f64::from(bitmap.x),
                        f64::from(bitmap.y),
                    )?;
                    stats.bitmaps_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> PlotResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_pen(context: &Context, pen: Pen) {
    apply_color(context, pen.color);
    context.set_line_width(f64::from(pen.width.max(1)));
    match pen.style {
        PenStyle::Solid => context.set_dash(&[], 0.0),
        PenStyle::Dot => context.set_dash(&[1.0, 2.0], 0.0),
    }
}

fn stroke_line(
    context: &Context,
    pen: Pen,
    from: (f64, f64),
    to: (f64, f64),
) -> Result<(), cairo::Error> {
    apply_pen(context, pen);
    if from == to {
        // Zero-length strokes vanish with butt caps.
        context.set_line_cap(cairo::LineCap::Round);
    } else {
        context.set_line_cap(cairo::LineCap::Butt);
    }
    context.move_to(from.0 + 0.5, from.1 + 0.5);
    context.line_to(to.0 + 0.5, to.1 + 0.5);
    context.stroke()
}

fn paint_rect(
    context: &Context,
    (x, y, width, height): (f64, f64, f64, f64),
    pen: Pen,
    brush: Brush,
) -> Result<(), cairo::Error> {
    context.rectangle(x + 0.5, y + 0.5, width - 1.0, height - 1.0);
    if let Brush::Solid(fill) = brush {
        apply_color(context, fill);
        context.fill_preserve()?;
    }
    apply_pen(context, pen);
    context.stroke()
}

fn paint_bitmap(context: &Context, image: &RgbaImage, x: f64, y: f64) -> PlotResult<()> {
    let width = i32::try_from(image.width())
        .map_err(|_| PlotError::Backend("bitmap too wide".to_owned()))?;
    let height = i32::try_from(image.height())
        .map_err(|_| PlotError::Backend("bitmap too tall".to_owned()))?;
    let mut surface = ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create bitmap surface", err))?;
    let stride = usize::try_from(surface.stride())
        .map_err(|_| PlotError::Backend("negative cairo stride".to_owned()))?;
    {
        let mut data = surface
            .data()
            .map_err(|err| PlotError::Backend(format!("failed to borrow bitmap surface: {err}")))?;
        for (px, py, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let premultiply = |c: u8| ((u16::from(c) * u16::from(a)) / 255) as u8;
            let offset = py as usize * stride + px as usize * 4;
            // Cairo ARGB32 is native-endian.
            let argb = u32::from_be_bytes([a, premultiply(r), premultiply(g), premultiply(b)]);
            data[offset..offset + 4].copy_from_slice(&argb.to_ne_bytes());
        }
    }
    surface.mark_dirty();
    context
        .set_source_surface(&surface, x, y)
        .map_err(|err| map_backend_error("failed to set bitmap source", err))?;
    context
        .paint()
        .map_err(|err| map_backend_error("failed to paint bitmap", err))
}

fn font_description(font: &Font) -> FontDescription {
    let weight = if font.bold { " Bold" } else { "" };
    FontDescription::from_string(&format!("{}{} {}px", font.family, weight, font.size_px))
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> PlotError {
    PlotError::Backend(format!("{prefix}: {err}"))
}
