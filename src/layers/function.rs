//! Layers sampling a closure once per device column or row.

use std::fmt;

use crate::core::{BoundingBox, ClipBand, ViewTransform};
use crate::layers::{
    HorizontalAlign, LABEL_INSET_PX, Layer, LayerCommon, LayerKind, RenderPass, VerticalAlign,
    layer_common_accessors,
};
use crate::render::DrawContext;

type Curve = Box<dyn Fn(f64) -> f64>;

/// Draws one pixel, or a zero-length line so wide pens stay visible.
fn plot_dot(ctx: &mut dyn DrawContext, thick: bool, x: i32, y: i32) {
    if thick {
        ctx.draw_line(x, y, x, y);
    } else {
        ctx.draw_point(x, y);
    }
}

fn label_column(align: HorizontalAlign, view: &ViewTransform, text_width: i32) -> i32 {
    let margins = view.margins();
    match align {
        HorizontalAlign::Right => view.scr_x() - text_width - margins.right - LABEL_INSET_PX,
        HorizontalAlign::Center => {
            (view.scr_x() - margins.right - margins.left - text_width) / 2 + margins.left
        }
        HorizontalAlign::Left => margins.left + LABEL_INSET_PX,
    }
}

/// `y = f(x)` evaluated at every device column.
pub struct FunctionX {
    common: LayerCommon,
    align: HorizontalAlign,
    bounds: Option<BoundingBox>,
    curve: Curve,
}

impl fmt::Debug for FunctionX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionX")
            .field("common", &self.common)
            .field("align", &self.align)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl FunctionX {
    #[must_use]
    pub fn new(name: impl Into<String>, curve: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            common: LayerCommon::named(name),
            align: HorizontalAlign::default(),
            bounds: None,
            curve: Box::new(curve),
        }
    }

    #[must_use]
    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    /// Gives the curve an extent so it takes part in auto-fit.
    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        (self.curve)(x)
    }

    fn row_at(&self, view: &ViewTransform, column: i32) -> i32 {
        view.y2p(self.eval(view.p2x(column)))
    }
}

impl Layer for FunctionX {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        let band = self.common.band(view);
        let thick = self.common.pen.is_thick();

        for column in band.left..band.right {
            let row = self.row_at(view, column);
            if self.common.draw_outside_margins || band.contains_y(row) {
                plot_dot(ctx, thick, column, row);
            }
        }

        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let column = label_column(self.align, view, extent.width);
            ctx.draw_text(&self.common.name, column, self.row_at(view, column));
        }
    }
}

/// `x = f(y)` evaluated at every device row.
pub struct FunctionY {
    common: LayerCommon,
    align: VerticalAlign,
    bounds: Option<BoundingBox>,
    curve: Curve,
}

impl fmt::Debug for FunctionY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionY")
            .field("common", &self.common)
            .field("align", &self.align)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl FunctionY {
    #[must_use]
    pub fn new(name: impl Into<String>, curve: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            common: LayerCommon::named(name),
            align: VerticalAlign::default(),
            bounds: None,
            curve: Box::new(curve),
        }
    }

    #[must_use]
    pub fn with_align(mut self, align: VerticalAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn eval(&self, y: f64) -> f64 {
        (self.curve)(y)
    }

    fn column_at(&self, view: &ViewTransform, row: i32) -> i32 {
        view.x2p(self.eval(view.p2y(row)))
    }
}

impl Layer for FunctionY {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        let band = self.common.band(view);
        let thick = self.common.pen.is_thick();

        for row in band.top..band.bottom {
            let column = self.column_at(view, row);
            if self.common.draw_outside_margins || band.contains_x(column) {
                plot_dot(ctx, thick, column, row);
            }
        }

        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let margins = view.margins();
            let row = match self.align {
                VerticalAlign::Top => margins.top + LABEL_INSET_PX,
                VerticalAlign::Center => {
                    (view.scr_y() - margins.top - margins.bottom - extent.height) / 2 + margins.top
                }
                VerticalAlign::Bottom => {
                    view.scr_y() - LABEL_INSET_PX - extent.height - margins.bottom
                }
            };
            ctx.draw_text(&self.common.name, self.column_at(view, row), row);
        }
    }
}

/// `y = f(x)` drawn as a connected polyline, one segment per device column.
pub struct Profile {
    common: LayerCommon,
    align: HorizontalAlign,
    bounds: Option<BoundingBox>,
    curve: Curve,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("common", &self.common)
            .field("align", &self.align)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Profile {
    #[must_use]
    pub fn new(name: impl Into<String>, curve: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            common: LayerCommon::named(name),
            align: HorizontalAlign::default(),
            bounds: None,
            curve: Box::new(curve),
        }
    }

    #[must_use]
    pub fn with_align(mut self, align: HorizontalAlign) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    fn row_at(&self, view: &ViewTransform, column: i32, band: ClipBand) -> i32 {
        let row = view.y2p((self.curve)(view.p2x(column)));
        if self.common.draw_outside_margins {
            row
        } else {
            band.clamp_y(row)
        }
    }
}

impl Layer for Profile {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        let band = self.common.band(view);

        for column in band.left..band.right {
            let from = self.row_at(view, column, band);
            let to = self.row_at(view, column + 1, band);
            ctx.draw_line(column, from, column + 1, to);
        }

        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let column = label_column(self.align, view, extent.width);
            let row = view.y2p((self.curve)(view.p2x(column)));
            ctx.draw_text(&self.common.name, column, row);
        }
    }
}
