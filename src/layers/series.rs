//! Parametric XY layers: any restartable point sequence, plus the
//! array-backed [`VectorSeries`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{BoundingBox, ClipBand, Segment, ViewTransform, clip_segment};
use crate::error::{PlotError, PlotResult};
use crate::layers::{
    LABEL_INSET_PX, Layer, LayerCommon, LayerKind, RenderPass, layer_common_accessors,
};
use crate::render::DrawContext;

/// Padding added around series data so boundary markers are not cut.
pub const SERIES_BOUNDS_PADDING: f64 = 0.5;

/// Restartable forward-only stream of data points.
pub trait XySequence {
    fn rewind(&mut self);
    fn next_xy(&mut self) -> Option<(f64, f64)>;

    fn bounding_box(&self) -> Option<BoundingBox> {
        None
    }
}

/// Corner of the drawn pixel extent where the name label goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Corner {
    #[default]
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

/// Device-space extent of what a layer actually drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl DrawnBounds {
    #[must_use]
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Top-left position of a `width`×`height` label in `corner`.
    ///
    /// Saturates instead of wrapping when the extent touches the `i32` limits.
    #[must_use]
    pub fn label_origin(self, corner: Corner, width: i32, height: i32) -> (i32, i32) {
        let left = self.min_x.saturating_add(LABEL_INSET_PX);
        let top = self.min_y.saturating_add(LABEL_INSET_PX);
        let right = self.max_x.saturating_sub(width).saturating_sub(LABEL_INSET_PX);
        let bottom = self.max_y.saturating_sub(height).saturating_sub(LABEL_INSET_PX);
        match corner {
            Corner::NorthWest => (left, top),
            Corner::NorthEast => (right, top),
            Corner::SouthEast => (right, bottom),
            Corner::SouthWest => (left, bottom),
        }
    }
}

fn extend(drawn: &mut Option<DrawnBounds>, x: i32, y: i32) {
    match drawn {
        Some(bounds) => bounds.include(x, y),
        None => *drawn = Some(DrawnBounds::at(x, y)),
    }
}

/// Draws `points` as dots or a polyline.
///
/// With a `band`, dots outside it are dropped and segments are clipped to it;
/// without one everything is drawn in full. Returns the extent of the drawn
/// geometry, or `None` when nothing was drawn.
pub(crate) fn plot_points(
    ctx: &mut dyn DrawContext,
    view: &ViewTransform,
    common: &LayerCommon,
    band: Option<ClipBand>,
    mut points: impl Iterator<Item = (f64, f64)>,
) -> Option<DrawnBounds> {
    let (first_x, first_y) = points.next()?;
    let first = (view.x2p(first_x), view.y2p(first_y));
    let mut drawn = None;
    let thick = common.pen.is_thick();
    ctx.set_pen(common.pen);

    if common.continuous {
        let mut previous = first;
        for (x, y) in points {
            let current = (view.x2p(x), view.y2p(y));
            let segment = Segment::new(previous.0, previous.1, current.0, current.1);
            let clipped = match band {
                Some(band) => clip_segment(segment, band),
                None => Some(segment),
            };
            if let Some(visible) = clipped {
                ctx.draw_line(visible.x0, visible.y0, visible.x1, visible.y1);
                extend(&mut drawn, visible.x0, visible.y0);
                extend(&mut drawn, visible.x1, visible.y1);
            }
            previous = current;
        }
    } else {
        let pixels = points.map(|(x, y)| (view.x2p(x), view.y2p(y)));
        for (ix, iy) in std::iter::once(first).chain(pixels) {
            if band.is_some_and(|band| !band.contains(ix, iy)) {
                continue;
            }
            if thick {
                ctx.draw_line(ix, iy, ix, iy);
            } else {
                ctx.draw_point(ix, iy);
            }
            extend(&mut drawn, ix, iy);
        }
    }
    drawn
}

/// Renders any [`XySequence`] as a plot layer.
#[derive(Debug)]
pub struct SequenceLayer<S> {
    common: LayerCommon,
    corner: Corner,
    sequence: S,
    last_drawn: Option<DrawnBounds>,
}

impl<S: XySequence> SequenceLayer<S> {
    #[must_use]
    pub fn new(name: impl Into<String>, sequence: S) -> Self {
        Self {
            common: LayerCommon::named(name),
            corner: Corner::default(),
            sequence,
            last_drawn: None,
        }
    }

    #[must_use]
    pub fn with_corner(mut self, corner: Corner) -> Self {
        self.corner = corner;
        self
    }

    #[must_use]
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.common.continuous = continuous;
        self
    }

    pub fn set_corner(&mut self, corner: Corner) {
        self.corner = corner;
    }

    #[must_use]
    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut S {
        &mut self.sequence
    }

    /// Pixel extent of the most recent render pass.
    #[must_use]
    pub fn last_drawn(&self) -> Option<DrawnBounds> {
        self.last_drawn
    }
}

impl<S: XySequence + 'static> Layer for SequenceLayer<S> {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.sequence.bounding_box()
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        let band = self.common.band(pass.view);
        self.sequence.rewind();
        let sequence = &mut self.sequence;
        let drawn = plot_points(
            ctx,
            pass.view,
            &self.common,
            Some(band),
            std::iter::from_fn(|| sequence.next_xy()),
        );
        self.last_drawn = drawn;

        let Some(drawn) = drawn else {
            return;
        };
        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let (x, y) = drawn.label_origin(self.corner, extent.width, extent.height);
            ctx.draw_text(&self.common.name, x, y);
        }
    }
}

/// Equal-length coordinate arrays walked by index.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSeries {
    xs: Vec<f64>,
    ys: Vec<f64>,
    index: usize,
    bounds: BoundingBox,
}

impl Default for VectorSeries {
    fn default() -> Self {
        Self {
            xs: Vec::new(),
            ys: Vec::new(),
            index: 0,
            bounds: empty_series_bounds(),
        }
    }
}

fn empty_series_bounds() -> BoundingBox {
    BoundingBox::new(-1.0, 1.0, -1.0, 1.0)
}

impl VectorSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(xs: Vec<f64>, ys: Vec<f64>) -> PlotResult<Self> {
        let mut series = Self::default();
        series.set_data(xs, ys)?;
        Ok(series)
    }

    /// Replaces the data; mismatched lengths leave the series untouched.
    pub fn set_data(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> PlotResult<()> {
        if xs.len() != ys.len() {
            warn!(x_len = xs.len(), y_len = ys.len(), "rejected series data");
            return Err(PlotError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        self.bounds = BoundingBox::from_points(&xs, &ys)
            .map_or_else(empty_series_bounds, |tight| tight.padded(SERIES_BOUNDS_PADDING));
        self.xs = xs;
        self.ys = ys;
        self.index = 0;
        debug!(points = self.xs.len(), "series data replaced");
        Ok(())
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Copies of both coordinate arrays.
    #[must_use]
    pub fn data(&self) -> (Vec<f64>, Vec<f64>) {
        (self.xs.clone(), self.ys.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.index = 0;
        self.bounds = empty_series_bounds();
    }

    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }
}

impl XySequence for VectorSeries {
    fn rewind(&mut self) {
        self.index = 0;
    }

    fn next_xy(&mut self) -> Option<(f64, f64)> {
        let point = (*self.xs.get(self.index)?, *self.ys.get(self.index)?);
        self.index += 1;
        Some(point)
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(self.bounds)
    }
}

pub type VectorLayer = SequenceLayer<VectorSeries>;

impl VectorLayer {
    /// Convenience constructor validating the arrays up front.
    pub fn from_data(name: impl Into<String>, xs: Vec<f64>, ys: Vec<f64>) -> PlotResult<Self> {
        Ok(Self::new(name, VectorSeries::from_data(xs, ys)?))
    }

    pub fn set_data(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> PlotResult<()> {
        self.sequence.set_data(xs, ys)
    }

    #[must_use]
    pub fn data(&self) -> (Vec<f64>, Vec<f64>) {
        self.sequence.data()
    }

    pub fn clear(&mut self) {
        self.sequence.clear();
    }
}
