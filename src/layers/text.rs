use crate::layers::{Layer, LayerCommon, LayerKind, RenderPass, layer_common_accessors};
use crate::render::DrawContext;

const DEFAULT_OFFSET_X: i32 = 5;
const DEFAULT_OFFSET_Y: i32 = 50;

/// Fixed caption placed at a percentage of the plot area.
///
/// The layer name is the caption. Offsets outside `0..=100` fall back to
/// (5, 50). It is an info-kind layer but cannot be dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    common: LayerCommon,
    offset_x: i32,
    offset_y: i32,
}

impl TextLayer {
    #[must_use]
    pub fn new(text: impl Into<String>, offset_x: i32, offset_y: i32) -> Self {
        let in_range = |value: i32| (0..=100).contains(&value);
        Self {
            common: LayerCommon::named(text),
            offset_x: if in_range(offset_x) { offset_x } else { DEFAULT_OFFSET_X },
            offset_y: if in_range(offset_y) { offset_y } else { DEFAULT_OFFSET_Y },
        }
    }

    #[must_use]
    pub fn offsets(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }
}

impl Layer for TextLayer {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Info
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let view = pass.view;
        ctx.set_pen(self.common.pen);
        ctx.set_font(&self.common.font);
        let x = self.offset_x * view.plot_width() / 100;
        let y = self.offset_y * view.plot_height() / 100;
        ctx.draw_text(&self.common.name, x, y);
    }
}
