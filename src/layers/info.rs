//! Screen-anchored overlays: plain boxes, the pointer readout and the legend.
//!
//! Overlays live in device space. When the device is resized their origin is
//! rescaled proportionally; the vertical rescale also moves the drag
//! reference, the horizontal one does not.

use smallvec::SmallVec;

use crate::core::{DeviceSize, PixelPoint, PixelRect, ViewTransform};
use crate::layers::{
    Layer, LayerCommon, LayerKind, LegendEntry, RenderPass, layer_common_accessors,
};
use crate::render::{Brush, DrawContext, TextExtent};

/// Inner padding of the legend box.
pub const LEGEND_MARGIN: i32 = 5;

/// Length of the pen swatch drawn before each legend name.
pub const LEGEND_LINE_WIDTH: i32 = 10;

/// Padding between the readout text and its box.
const READOUT_PADDING: i32 = 5;

/// Rectangle of an overlay plus the state needed to drag and rescale it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoBox {
    rect: PixelRect,
    reference: PixelPoint,
    last_screen: (i32, i32),
}

impl Default for InfoBox {
    fn default() -> Self {
        Self::new(PixelRect::new(0, 0, 1, 1))
    }
}

impl InfoBox {
    #[must_use]
    pub fn new(rect: PixelRect) -> Self {
        Self {
            rect,
            reference: rect.position(),
            last_screen: (1, 1),
        }
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn reference(&self) -> PixelPoint {
        self.reference
    }

    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        self.rect.contains(point)
    }

    /// Places the box at the drag reference shifted by `delta`.
    pub fn move_by(&mut self, delta: PixelPoint) {
        self.rect.x = self.reference.x + delta.x;
        self.rect.y = self.reference.y + delta.y;
    }

    pub fn update_reference(&mut self) {
        self.reference = self.rect.position();
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.rect.width = width;
        self.rect.height = height;
    }

    /// Follows a device resize proportionally.
    pub fn rescale(&mut self, screen: DeviceSize) {
        let scr_x = screen.w().max(1);
        let scr_y = screen.h().max(1);
        let (last_x, last_y) = self.last_screen;
        if last_x == scr_x && last_y == scr_y {
            return;
        }
        if last_x != 1 {
            self.rect.x = scale_coordinate(self.rect.x, scr_x, last_x);
        }
        if last_y != 1 {
            self.rect.y = scale_coordinate(self.rect.y, scr_y, last_y);
            self.update_reference();
        }
        self.last_screen = (scr_x, scr_y);
    }
}

fn scale_coordinate(value: i32, now: i32, before: i32) -> i32 {
    let scaled = i64::from(value) * i64::from(now) / i64::from(before);
    i32::try_from(scaled).unwrap_or(if scaled < 0 { i32::MIN } else { i32::MAX })
}

/// Draggable overlay facet of a layer.
pub trait InfoLayer {
    fn info_box(&self) -> &InfoBox;
    fn info_box_mut(&mut self) -> &mut InfoBox;

    /// Pointer moved to `pointer`; overlays that track it refresh their content.
    fn update_info(&mut self, _view: &ViewTransform, _pointer: PixelPoint) {}

    fn rect(&self) -> PixelRect {
        self.info_box().rect()
    }

    fn contains(&self, point: PixelPoint) -> bool {
        self.info_box().contains(point)
    }

    fn move_by(&mut self, delta: PixelPoint) {
        self.info_box_mut().move_by(delta);
    }

    fn update_reference(&mut self) {
        self.info_box_mut().update_reference();
    }
}

macro_rules! info_layer_impl {
    ($ty:ty) => {
        impl InfoLayer for $ty {
            fn info_box(&self) -> &InfoBox {
                &self.info
            }

            fn info_box_mut(&mut self) -> &mut InfoBox {
                &mut self.info
            }
        }
    };
}

fn info_common(brush: Brush) -> LayerCommon {
    LayerCommon {
        brush,
        ..LayerCommon::default()
    }
}

/// Plain rectangle overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoOverlay {
    common: LayerCommon,
    info: InfoBox,
}

impl InfoOverlay {
    #[must_use]
    pub fn new(rect: PixelRect, brush: Brush) -> Self {
        Self {
            common: info_common(brush),
            info: InfoBox::new(rect),
        }
    }
}

info_layer_impl!(InfoOverlay);

impl Layer for InfoOverlay {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Info
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        self.info.rescale(pass.view.screen());
        ctx.set_pen(self.common.pen);
        ctx.set_brush(self.common.brush);
        let rect = self.info.rect();
        ctx.draw_rectangle(rect.x, rect.y, rect.width, rect.height);
    }

    fn as_info(&self) -> Option<&dyn InfoLayer> {
        Some(self)
    }

    fn as_info_mut(&mut self) -> Option<&mut dyn InfoLayer> {
        Some(self)
    }
}

/// Readout of the data coordinates under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatesInfo {
    common: LayerCommon,
    info: InfoBox,
    content: String,
}

impl CoordinatesInfo {
    #[must_use]
    pub fn new(rect: PixelRect, brush: Brush) -> Self {
        Self {
            common: info_common(brush),
            info: InfoBox::new(rect),
            content: String::new(),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl InfoLayer for CoordinatesInfo {
    fn info_box(&self) -> &InfoBox {
        &self.info
    }

    fn info_box_mut(&mut self) -> &mut InfoBox {
        &mut self.info
    }

    fn update_info(&mut self, view: &ViewTransform, pointer: PixelPoint) {
        self.content = format!("x = {:.6}\ny = {:.6}", view.p2x(pointer.x), view.p2y(pointer.y));
    }
}

impl CoordinatesInfo {
    fn grow_to_fit(&mut self, extent: TextExtent) {
        let rect = self.info.rect();
        let width = rect.width.max(extent.width + 2 * READOUT_PADDING);
        let height = rect.height.max(extent.height + 2 * READOUT_PADDING);
        self.info.set_size(width, height);
    }
}

impl Layer for CoordinatesInfo {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Info
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        self.info.rescale(pass.view.screen());
        ctx.set_pen(self.common.pen);
        ctx.set_brush(self.common.brush);
        ctx.set_font(&self.common.font);
        let extent = ctx.text_extent(&self.content);
        self.grow_to_fit(extent);
        let rect = self.info.rect();
        ctx.draw_rectangle(rect.x, rect.y, rect.width, rect.height);
        ctx.draw_text(
            &self.content,
            rect.x + READOUT_PADDING,
            rect.y + READOUT_PADDING,
        );
    }

    fn as_info(&self) -> Option<&dyn InfoLayer> {
        Some(self)
    }

    fn as_info_mut(&mut self) -> Option<&mut dyn InfoLayer> {
        Some(self)
    }
}

/// Name and pen swatch of every visible plot layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendInfo {
    common: LayerCommon,
    info: InfoBox,
}

impl LegendInfo {
    #[must_use]
    pub fn new(rect: PixelRect, brush: Brush) -> Self {
        Self {
            common: info_common(brush),
            info: InfoBox::new(rect),
        }
    }
}

info_layer_impl!(LegendInfo);

impl Layer for LegendInfo {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Info
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        self.info.rescale(pass.view.screen());
        if pass.legend.is_empty() {
            return;
        }
        ctx.set_font(&self.common.font);

        let base_width = LEGEND_MARGIN * 2 + LEGEND_LINE_WIDTH;
        let rows: SmallVec<[(&LegendEntry, TextExtent); 8]> = pass
            .legend
            .iter()
            .map(|entry| (entry, ctx.text_extent(&entry.name)))
            .collect();
        let mut width = base_width;
        let mut height = LEGEND_MARGIN;
        for (_, extent) in &rows {
            if width <= extent.width + base_width {
                width = extent.width + base_width + LEGEND_MARGIN;
            }
            height += extent.height;
        }
        height += LEGEND_MARGIN;
        self.info.set_size(width, height);

        let rect = self.info.rect();
        ctx.set_pen(self.common.pen);
        ctx.set_brush(self.common.brush);
        ctx.draw_rectangle(rect.x, rect.y, rect.width, rect.height);

        let mut top = rect.y + LEGEND_MARGIN;
        for (entry, extent) in rows {
            let swatch_y = top + extent.height / 2;
            ctx.set_pen(entry.pen);
            ctx.draw_line(
                rect.x + LEGEND_MARGIN,
                swatch_y,
                rect.x + LEGEND_LINE_WIDTH + LEGEND_MARGIN,
                swatch_y,
            );
            ctx.draw_text(&entry.name, rect.x + base_width, top);
            top += extent.height;
        }
    }

    fn as_info(&self) -> Option<&dyn InfoLayer> {
        Some(self)
    }

    fn as_info_mut(&mut self) -> Option<&mut dyn InfoLayer> {
        Some(self)
    }
}
