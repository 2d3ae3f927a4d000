use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::core::{BoundingBox, DeviceSize};
use crate::error::{PlotError, PlotResult};
use crate::render::{DrawContext, RasterRenderer, RecordingContext, RenderFrame, Renderer};

use super::PlotWindow;

impl PlotWindow {
    /// Records one off-screen pass.
    ///
    /// `size` overrides the device size for this pass; `fit` shows every
    /// layer instead of the requested view. The on-screen view is restored
    /// afterwards.
    pub fn render_frame(
        &mut self,
        size: Option<DeviceSize>,
        fit: bool,
    ) -> PlotResult<RenderFrame> {
        let target = size.unwrap_or_else(|| self.view.screen());
        let mut ctx = RecordingContext::new(target);
        self.render_offscreen(&mut ctx, target, fit)?;
        Ok(ctx.into_frame())
    }

    /// Replays an off-screen pass on any frame renderer.
    pub fn render_with<R: Renderer>(
        &mut self,
        renderer: &mut R,
        size: Option<DeviceSize>,
        fit: bool,
    ) -> PlotResult<()> {
        let frame = self.render_frame(size, fit)?;
        renderer.render(&frame)
    }

    /// Rasterizes an off-screen pass. Text is not rasterized by this path.
    pub fn screenshot_image(
        &mut self,
        size: Option<DeviceSize>,
        fit: bool,
    ) -> PlotResult<RgbaImage> {
        let frame = self.render_frame(size, fit)?;
        let mut renderer = RasterRenderer::new(frame.size)?;
        renderer.set_clear_color(self.theme.background)?;
        renderer.render(&frame)?;
        Ok(renderer.into_image())
    }

    pub fn save_screenshot(
        &mut self,
        path: impl AsRef<Path>,
        format: ImageFormat,
        size: Option<DeviceSize>,
        fit: bool,
    ) -> PlotResult<()> {
        let path = path.as_ref();
        let image = self.screenshot_image(size, fit)?;
        image.save_with_format(path, format).map_err(|err| {
            PlotError::Export(format!("failed to write {}: {err}", path.display()))
        })?;
        debug!(
            path = %path.display(),
            ?format,
            width = image.width(),
            height = image.height(),
            "screenshot saved"
        );
        Ok(())
    }

    fn render_offscreen(
        &mut self,
        ctx: &mut dyn DrawContext,
        target: DeviceSize,
        fit: bool,
    ) -> PlotResult<()> {
        if !target.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: target.width,
                height: target.height,
            });
        }
        let saved_view = self.view;
        let bounds: BoundingBox = if fit {
            self.update_bounds();
            self.content_bounds
        } else {
            self.view.desired()
        };
        self.fit_to_size(bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y, target);
        self.paint_background(ctx, self.theme.background, target.w(), target.h());
        self.render_layers(ctx);
        self.view = saved_view;
        self.update_all();
        Ok(())
    }
}
