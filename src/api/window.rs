use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::{BoundingBox, DeviceSize, Margins, PixelPoint, ViewTransform};
use crate::error::{PlotError, PlotResult};
use crate::interaction::InteractionState;
use crate::layers::{Layer, LayerId, LayerKind, LegendEntry, RenderPass};
use crate::render::{Brush, Color, DrawContext, Pen, PenStyle};

use super::config::validate_zoom_factor;
use super::{ColourTheme, PlotWindowConfig, Scrollbars};

/// Plot canvas: viewport state, the ordered layer list and input state.
///
/// Layers render in insertion order. Every viewport mutation re-derives the
/// scale and position together through [`ViewTransform`].
pub struct PlotWindow {
    pub(super) view: ViewTransform,
    pub(super) layers: IndexMap<LayerId, Box<dyn Layer>>,
    pub(super) next_layer_id: u64,
    pub(super) content_bounds: BoundingBox,
    pub(super) zoom_factor: f64,
    pub(super) mouse_navigation: bool,
    pub(super) scrollbars_enabled: bool,
    pub(super) scrollbars: Scrollbars,
    pub(super) theme: ColourTheme,
    pub(super) interaction: InteractionState,
}

impl fmt::Debug for PlotWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotWindow")
            .field("view", &self.view)
            .field("layers", &self.layers.len())
            .field("content_bounds", &self.content_bounds)
            .field("zoom_factor", &self.zoom_factor)
            .field("mouse_navigation", &self.mouse_navigation)
            .field("scrollbars_enabled", &self.scrollbars_enabled)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl Default for PlotWindow {
    fn default() -> Self {
        Self::from_valid_config(PlotWindowConfig::default())
    }
}

impl PlotWindow {
    pub fn new(config: PlotWindowConfig) -> PlotResult<Self> {
        let config = config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PlotWindowConfig) -> Self {
        let mut view = ViewTransform::default();
        view.set_screen(config.screen);
        view.set_margins(config.margins);
        view.set_lock_aspect(config.lock_aspect);
        let mut window = Self {
            view,
            layers: IndexMap::new(),
            next_layer_id: 0,
            content_bounds: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            zoom_factor: config.zoom_factor,
            mouse_navigation: config.mouse_navigation,
            scrollbars_enabled: config.scrollbars,
            scrollbars: Scrollbars::default(),
            theme: config.theme,
            interaction: InteractionState::default(),
        };
        window.update_all();
        window
    }

    /// Snapshot of the current settings in config form.
    #[must_use]
    pub fn config(&self) -> PlotWindowConfig {
        PlotWindowConfig {
            screen: self.view.screen(),
            margins: self.view.margins(),
            lock_aspect: self.view.is_aspect_locked(),
            zoom_factor: self.zoom_factor,
            mouse_navigation: self.mouse_navigation,
            scrollbars: self.scrollbars_enabled,
            theme: self.theme,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    #[must_use]
    pub fn interaction_state(&self) -> InteractionState {
        self.interaction
    }

    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.view.scale_x()
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.view.scale_y()
    }

    #[must_use]
    pub fn pos_x(&self) -> f64 {
        self.view.pos_x()
    }

    #[must_use]
    pub fn pos_y(&self) -> f64 {
        self.view.pos_y()
    }

    #[must_use]
    pub fn screen_size(&self) -> DeviceSize {
        self.view.screen()
    }

    #[must_use]
    pub fn margins(&self) -> Margins {
        self.view.margins()
    }

    #[must_use]
    pub fn desired_bounds(&self) -> BoundingBox {
        self.view.desired()
    }

    #[must_use]
    pub fn data_to_pixel_x(&self, x: f64) -> f64 {
        self.view.data_to_pixel_x(x)
    }

    #[must_use]
    pub fn data_to_pixel_y(&self, y: f64) -> f64 {
        self.view.data_to_pixel_y(y)
    }

    #[must_use]
    pub fn pixel_to_data_x(&self, pixel: f64) -> f64 {
        self.view.pixel_to_data_x(pixel)
    }

    #[must_use]
    pub fn pixel_to_data_y(&self, pixel: f64) -> f64 {
        self.view.pixel_to_data_y(pixel)
    }

    #[must_use]
    pub fn x2p(&self, x: f64) -> i32 {
        self.view.x2p(x)
    }

    #[must_use]
    pub fn y2p(&self, y: f64) -> i32 {
        self.view.y2p(y)
    }

    #[must_use]
    pub fn p2x(&self, pixel: i32) -> f64 {
        self.view.p2x(pixel)
    }

    #[must_use]
    pub fn p2y(&self, pixel: i32) -> f64 {
        self.view.p2y(pixel)
    }

    /// Stores a new device size without re-fitting; see `on_resize` for the
    /// host resize path.
    pub fn set_screen_size(&mut self, size: DeviceSize) -> PlotResult<()> {
        if !size.is_valid() {
            warn!(width = size.width, height = size.height, "rejected screen size");
            return Err(PlotError::InvalidViewport {
                width: size.width,
                height: size.height,
            });
        }
        self.view.set_screen(size);
        Ok(())
    }

    /// Pure state update; call a fit to apply the new plotting area.
    pub fn set_margins(&mut self, top: i32, right: i32, bottom: i32, left: i32) {
        self.view.set_margins(Margins::new(top, right, bottom, left));
    }

    pub fn fit(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
        self.fit_bounds(BoundingBox::new(x_min, x_max, y_min, y_max));
    }

    pub fn fit_bounds(&mut self, bounds: BoundingBox) {
        self.view.fit(bounds);
        self.update_all();
    }

    /// Fits against an explicit device size, e.g. a printer page. Does not
    /// refresh scrollbars or request a redraw.
    pub fn fit_to_size(
        &mut self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        target: DeviceSize,
    ) {
        self.view.set_screen(target);
        self.view.fit(BoundingBox::new(x_min, x_max, y_min, y_max));
    }

    /// Fits the union of all layer bounding boxes; false when no layer has one.
    pub fn auto_fit(&mut self) -> bool {
        if !self.update_bounds() {
            debug!("auto fit skipped, no layer has a bounding box");
            return false;
        }
        self.fit_bounds(self.content_bounds);
        true
    }

    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn set_zoom_factor(&mut self, zoom_factor: f64) -> PlotResult<()> {
        self.zoom_factor = validate_zoom_factor(zoom_factor)?;
        Ok(())
    }

    /// Zooms in around `center`, or the plot-area center when `None`.
    pub fn zoom_in(&mut self, center: Option<PixelPoint>) {
        let center = center.unwrap_or_else(|| self.view.plot_center());
        self.view.zoom_at(self.zoom_factor, center);
        self.update_all();
    }

    pub fn zoom_out(&mut self, center: Option<PixelPoint>) {
        let center = center.unwrap_or_else(|| self.view.plot_center());
        self.view.zoom_at(self.zoom_factor.recip(), center);
        self.update_all();
    }

    pub fn zoom_in_x(&mut self) {
        self.view.scale_axis_x(self.zoom_factor);
        self.update_all();
    }

    pub fn zoom_out_x(&mut self) {
        self.view.scale_axis_x(self.zoom_factor.recip());
        self.update_all();
    }

    pub fn zoom_in_y(&mut self) {
        self.view.scale_axis_y(self.zoom_factor);
        self.update_all();
    }

    pub fn zoom_out_y(&mut self) {
        self.view.scale_axis_y(self.zoom_factor.recip());
        self.update_all();
    }

    /// Zooms the x axis keeping device column `pixel` fixed.
    pub fn zoom_in_x_at(&mut self, pixel: i32) {
        self.view.zoom_x_at(self.zoom_factor, pixel);
        self.update_all();
    }

    pub fn zoom_out_x_at(&mut self, pixel: i32) {
        self.view.zoom_x_at(self.zoom_factor.recip(), pixel);
        self.update_all();
    }

    /// Zooms the y axis keeping device row `pixel` fixed.
    pub fn zoom_in_y_at(&mut self, pixel: i32) {
        self.view.zoom_y_at(self.zoom_factor, pixel);
        self.update_all();
    }

    pub fn zoom_out_y_at(&mut self, pixel: i32) {
        self.view.zoom_y_at(self.zoom_factor.recip(), pixel);
        self.update_all();
    }

    /// Fits the data rectangle spanned by two device corners, in any order.
    pub fn zoom_to_rect(&mut self, p0: PixelPoint, p1: PixelPoint) {
        let (x0, y0) = (self.view.p2x(p0.x), self.view.p2y(p0.y));
        let (x1, y1) = (self.view.p2x(p1.x), self.view.p2y(p1.y));
        self.fit(x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1));
    }

    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        self.view.pan_by_pixels(dx, dy);
        self.update_all();
    }

    /// Sets the aspect lock and re-fits the last requested bounds.
    pub fn lock_aspect(&mut self, enable: bool) {
        self.view.set_lock_aspect(enable);
        self.fit_bounds(self.view.desired());
    }

    #[must_use]
    pub fn is_aspect_locked(&self) -> bool {
        self.view.is_aspect_locked()
    }

    pub fn set_pos(&mut self, pos_x: f64, pos_y: f64) {
        self.view.set_pos(pos_x, pos_y);
        self.update_all();
    }

    pub fn set_pos_x(&mut self, pos_x: f64) {
        self.view.set_pos_x(pos_x);
        self.update_all();
    }

    pub fn set_pos_y(&mut self, pos_y: f64) {
        self.view.set_pos_y(pos_y);
        self.update_all();
    }

    /// Zero scales are ignored.
    pub fn set_scale_x(&mut self, scale_x: f64) {
        self.view.set_scale_x(scale_x);
        self.update_all();
    }

    /// Zero scales are ignored.
    pub fn set_scale_y(&mut self, scale_y: f64) {
        self.view.set_scale_y(scale_y);
        self.update_all();
    }

    pub fn set_mouse_navigation(&mut self, enabled: bool) {
        self.mouse_navigation = enabled;
    }

    #[must_use]
    pub fn is_mouse_navigation_enabled(&self) -> bool {
        self.mouse_navigation
    }

    pub fn set_scrollbars(&mut self, enabled: bool) {
        self.scrollbars_enabled = enabled;
        if !enabled {
            self.scrollbars = Scrollbars::default();
        }
        self.update_all();
    }

    /// Scrollbar geometry, when scrollbars are enabled.
    #[must_use]
    pub fn scrollbars(&self) -> Option<Scrollbars> {
        self.scrollbars_enabled.then_some(self.scrollbars)
    }

    #[must_use]
    pub fn colour_theme(&self) -> ColourTheme {
        self.theme
    }

    /// Applies `theme`: axis layers take the axes colour, info layers the
    /// foreground colour. Pen widths and styles are kept.
    pub fn set_colour_theme(&mut self, theme: ColourTheme) -> PlotResult<()> {
        let theme = theme.validate()?;
        self.theme = theme;
        for layer in self.layers.values_mut() {
            let colour = match layer.kind() {
                LayerKind::Axis => theme.axes,
                LayerKind::Info => theme.foreground,
                LayerKind::Plot | LayerKind::Undefined => continue,
            };
            layer.common_mut().pen.color = colour;
        }
        Ok(())
    }

    /// Last aggregated layer bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.content_bounds
    }

    /// Re-aggregates layer bounding boxes; false when no layer has one, in
    /// which case the previous box is kept.
    pub fn update_bounds(&mut self) -> bool {
        let bounds = self
            .layers
            .values()
            .filter_map(|layer| layer.bounding_box())
            .reduce(BoundingBox::union);
        match bounds {
            Some(bounds) => {
                self.content_bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Refreshes derived state (content bounds, scrollbars) after a change.
    pub fn update_all(&mut self) {
        if self.update_bounds() && self.scrollbars_enabled {
            self.scrollbars = Scrollbars::compute(&self.view, self.content_bounds);
            trace!(scrollbars = ?self.scrollbars, "scrollbars updated");
        }
    }

    /// Paints the background, every visible layer in order and the zoom
    /// rectangle of a running left drag.
    pub fn render(&mut self, ctx: &mut dyn DrawContext) {
        let size = ctx.size();
        if size.is_valid() && size != self.view.screen() {
            self.view.set_screen(size);
        }
        let (width, height) = (self.view.scr_x(), self.view.scr_y());
        self.paint_background(ctx, self.theme.background, width, height);
        self.render_layers(ctx);

        if let Some(rect) = self.interaction.rubber_band() {
            ctx.set_pen(Pen::new(Color::BLACK, 1).with_style(PenStyle::Dot));
            ctx.set_brush(Brush::Transparent);
            ctx.draw_rectangle(rect.x, rect.y, rect.width, rect.height);
        }
    }

    pub(super) fn paint_background(
        &self,
        ctx: &mut dyn DrawContext,
        colour: Color,
        width: i32,
        height: i32,
    ) {
        ctx.set_pen(Pen::new(colour, 1));
        ctx.set_brush(Brush::Solid(colour));
        ctx.set_text_foreground(self.theme.foreground);
        ctx.draw_rectangle(0, 0, width, height);
    }

    pub(super) fn render_layers(&mut self, ctx: &mut dyn DrawContext) {
        let legend: SmallVec<[LegendEntry; 8]> = self
            .layers
            .values()
            .filter(|layer| layer.kind() == LayerKind::Plot && layer.is_visible())
            .map(|layer| LegendEntry {
                name: layer.name().to_owned(),
                pen: layer.pen(),
            })
            .collect();
        let pass = RenderPass {
            view: &self.view,
            legend: &legend,
        };
        for layer in self.layers.values_mut() {
            if layer.is_visible() {
                layer.render(ctx, &pass);
            }
        }
    }
}
