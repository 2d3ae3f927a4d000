use tracing::{debug, warn};

use crate::core::DeviceSize;
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, DrawContext};

use super::PlotWindow;

/// Blank border kept around the plot on a printed page.
pub const PRINT_MARGIN_PX: i32 = 50;

/// Single-page print job of a plot window.
///
/// The page is drawn on a white background at the page size minus the print
/// margins; the window's on-screen view is restored afterwards.
#[derive(Debug)]
pub struct Printout<'a> {
    window: &'a mut PlotWindow,
    title: String,
}

impl<'a> Printout<'a> {
    pub fn new(window: &'a mut PlotWindow, title: impl Into<String>) -> Self {
        Self {
            window,
            title: title.into(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn has_page(&self, page: u32) -> bool {
        page == 1
    }

    /// Draws `page` onto `ctx`; returns false for pages that do not exist.
    pub fn print_page(&mut self, page: u32, ctx: &mut dyn DrawContext) -> PlotResult<bool> {
        if !self.has_page(page) {
            return Ok(false);
        }
        let paper = ctx.size();
        let width = paper.w() - 2 * PRINT_MARGIN_PX;
        let height = paper.h() - 2 * PRINT_MARGIN_PX;
        let (Ok(print_width), Ok(print_height)) = (u32::try_from(width), u32::try_from(height))
        else {
            warn!(width = paper.width, height = paper.height, "page too small to print");
            return Err(PlotError::InvalidViewport {
                width: paper.width,
                height: paper.height,
            });
        };
        if print_width == 0 || print_height == 0 {
            return Err(PlotError::InvalidViewport {
                width: paper.width,
                height: paper.height,
            });
        }

        let window = &mut *self.window;
        let saved_view = window.view;
        let desired = window.view.desired();
        window.fit_to_size(
            desired.min_x,
            desired.max_x,
            desired.min_y,
            desired.max_y,
            DeviceSize::new(print_width, print_height),
        );

        let saved_origin = ctx.device_origin();
        ctx.set_device_origin(PRINT_MARGIN_PX, PRINT_MARGIN_PX);
        window.paint_background(ctx, Color::WHITE, width, height);
        window.render_layers(ctx);
        ctx.set_device_origin(saved_origin.0, saved_origin.1);

        window.view = saved_view;
        window.update_all();
        debug!(title = %self.title, width, height, "printed page");
        Ok(true)
    }
}
