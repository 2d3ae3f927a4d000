//! Drawable layers composed by the plot window.
//!
//! Every layer owns a [`LayerCommon`] block (name, pens, visibility flags) and
//! implements [`Layer`]. The window renders layers in insertion order, which
//! is also the z-order and the legend order.

/// Implements the boilerplate accessors of [`Layer`] for a struct with a
/// `common: LayerCommon` field.
macro_rules! layer_common_accessors {
    () => {
        fn common(&self) -> &$crate::layers::LayerCommon {
            &self.common
        }

        fn common_mut(&mut self) -> &mut $crate::layers::LayerCommon {
            &mut self.common
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

pub(crate) use layer_common_accessors;

mod axis;
mod bitmap;
mod function;
mod info;
mod series;
mod shape;
mod text;

pub use axis::{AxisX, AxisY, XAxisAlign, YAxisAlign};
pub use bitmap::BitmapLayer;
pub use function::{FunctionX, FunctionY, Profile};
pub use info::{
    CoordinatesInfo, InfoBox, InfoLayer, InfoOverlay, LEGEND_LINE_WIDTH, LEGEND_MARGIN,
    LegendInfo,
};
pub use series::{Corner, DrawnBounds, SequenceLayer, VectorLayer, VectorSeries, XySequence};
pub use shape::{CovarianceEllipse, MovableShape, Polygon, Pose, ShapeLayer};
pub use text::TextLayer;

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::core::{BoundingBox, ClipBand, ViewTransform};
use crate::render::{Brush, DrawContext, Font, Pen};

/// Pixel inset between a label and the edge it is aligned to.
pub const LABEL_INSET_PX: i32 = 8;

/// Stable handle of a layer inside a plot window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub(crate) u64);

impl LayerId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayerKind {
    #[default]
    Undefined,
    Axis,
    Plot,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
}

/// State shared by every layer variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCommon {
    pub name: String,
    pub pen: Pen,
    pub brush: Brush,
    pub font: Font,
    pub visible: bool,
    pub show_name: bool,
    pub draw_outside_margins: bool,
    pub continuous: bool,
}

impl Default for LayerCommon {
    fn default() -> Self {
        Self {
            name: String::new(),
            pen: Pen::default(),
            brush: Brush::Transparent,
            font: Font::default(),
            visible: true,
            show_name: true,
            draw_outside_margins: true,
            continuous: false,
        }
    }
}

impl LayerCommon {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Device area this layer may draw into: the whole screen, or the plot
    /// area inside the margins.
    #[must_use]
    pub fn band(&self, view: &ViewTransform) -> ClipBand {
        if self.draw_outside_margins {
            ClipBand::new(0, view.scr_x(), 0, view.scr_y())
        } else {
            let margins = view.margins();
            ClipBand::new(
                margins.left,
                view.scr_x() - margins.right,
                margins.top,
                view.scr_y() - margins.bottom,
            )
        }
    }

    /// Whether the name label should be drawn at all.
    #[must_use]
    pub fn wants_label(&self) -> bool {
        self.show_name && !self.name.is_empty()
    }
}

/// One legend row: a visible plot layer's name and pen.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub pen: Pen,
}

/// Window state a layer can read while drawing.
#[derive(Debug, Clone, Copy)]
pub struct RenderPass<'a> {
    pub view: &'a ViewTransform,
    /// Visible plot layers in z-order.
    pub legend: &'a [LegendEntry],
}

/// A drawable unit in the plot window.
pub trait Layer: Any {
    fn common(&self) -> &LayerCommon;
    fn common_mut(&mut self) -> &mut LayerCommon;

    fn kind(&self) -> LayerKind;

    /// Data-space extent; `None` contributes nothing to auto-fit.
    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>);

    /// Draggable overlay facet.
    fn as_info(&self) -> Option<&dyn InfoLayer> {
        None
    }

    fn as_info_mut(&mut self) -> Option<&mut dyn InfoLayer> {
        None
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn name(&self) -> &str {
        &self.common().name
    }

    fn is_visible(&self) -> bool {
        self.common().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.common_mut().visible = visible;
    }

    fn pen(&self) -> Pen {
        self.common().pen
    }
}
