//! Shapes defined in local coordinates and placed by a pose.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{BoundingBox, ViewTransform};
use crate::error::{PlotError, PlotResult};
use crate::layers::series::plot_points;
use crate::layers::{
    Corner, LABEL_INSET_PX, Layer, LayerCommon, LayerKind, RenderPass, layer_common_accessors,
};
use crate::render::DrawContext;

/// Placement of a shape: translation plus counter-clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Radians.
    pub phi: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(x: f64, y: f64, phi: f64) -> Self {
        Self { x, y, phi }
    }

    /// Maps a local point into data space.
    #[must_use]
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        let (sin, cos) = self.phi.sin_cos();
        (self.x + cos * x - sin * y, self.y + sin * x + cos * y)
    }
}

/// Top-left of a label anchored at the NE corner of `bounds`, or at a
/// screen corner when there are no bounds.
pub(crate) fn shape_label_origin(
    view: &ViewTransform,
    bounds: Option<BoundingBox>,
    corner: Corner,
    width: i32,
    height: i32,
) -> (i32, i32) {
    if let Some(bounds) = bounds {
        let sx = view.x2p(bounds.max_x);
        let sy = view.y2p(bounds.max_y);
        return (
            sx.saturating_sub(width).saturating_sub(LABEL_INSET_PX),
            sy.saturating_sub(LABEL_INSET_PX).saturating_sub(height),
        );
    }
    let right = view.scr_x() - width - LABEL_INSET_PX;
    let bottom = view.scr_y() - LABEL_INSET_PX - height;
    match corner {
        Corner::NorthEast => (right, LABEL_INSET_PX),
        Corner::NorthWest => (LABEL_INSET_PX, LABEL_INSET_PX),
        Corner::SouthWest => (LABEL_INSET_PX, bottom),
        Corner::SouthEast => (right, bottom),
    }
}

/// Local outline, its pose and the derived data-space geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MovableShape {
    common: LayerCommon,
    corner: Corner,
    pose: Pose,
    local_xs: Vec<f64>,
    local_ys: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    bounds: Option<BoundingBox>,
}

impl MovableShape {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            common: LayerCommon::named(name),
            corner: Corner::default(),
            pose: Pose::default(),
            local_xs: Vec::new(),
            local_ys: Vec::new(),
            xs: Vec::new(),
            ys: Vec::new(),
            bounds: None,
        }
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.update_transformed();
    }

    pub fn set_corner(&mut self, corner: Corner) {
        self.corner = corner;
    }

    /// Replaces the local outline; mismatched lengths keep the old outline.
    pub fn set_local_points(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> PlotResult<()> {
        if xs.len() != ys.len() {
            warn!(x_len = xs.len(), y_len = ys.len(), "rejected shape outline");
            return Err(PlotError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        self.local_xs = xs;
        self.local_ys = ys;
        self.update_transformed();
        Ok(())
    }

    #[must_use]
    pub fn local_points(&self) -> (&[f64], &[f64]) {
        (&self.local_xs, &self.local_ys)
    }

    /// Outline after applying the pose.
    #[must_use]
    pub fn transformed_points(&self) -> (&[f64], &[f64]) {
        (&self.xs, &self.ys)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn update_transformed(&mut self) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = self
            .local_xs
            .iter()
            .zip(&self.local_ys)
            .map(|(&x, &y)| self.pose.apply(x, y))
            .unzip();
        self.bounds = BoundingBox::from_points(&xs, &ys);
        self.xs = xs;
        self.ys = ys;
    }

    fn draw(&self, ctx: &mut dyn DrawContext, view: &ViewTransform) {
        let points = self.xs.iter().copied().zip(self.ys.iter().copied());
        plot_points(ctx, view, &self.common, None, points);

        if self.common.wants_label() {
            ctx.set_font(&self.common.font);
            let extent = ctx.text_extent(&self.common.name);
            let (x, y) =
                shape_label_origin(view, self.bounds, self.corner, extent.width, extent.height);
            ctx.draw_text(&self.common.name, x, y);
        }
    }
}

impl Layer for MovableShape {
    layer_common_accessors!();

    fn kind(&self) -> LayerKind {
        LayerKind::Plot
    }

    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
        self.draw(ctx, pass.view);
    }
}

/// Access to the pose-carrying core of a shape layer.
pub trait ShapeLayer {
    fn shape(&self) -> &MovableShape;
    fn shape_mut(&mut self) -> &mut MovableShape;

    fn pose(&self) -> Pose {
        self.shape().pose()
    }

    fn set_pose(&mut self, pose: Pose) {
        self.shape_mut().set_pose(pose);
    }
}

impl ShapeLayer for MovableShape {
    fn shape(&self) -> &MovableShape {
        self
    }

    fn shape_mut(&mut self) -> &mut MovableShape {
        self
    }
}

/// Generates `Layer` for a wrapper whose `shape` field does the drawing.
macro_rules! delegate_shape_layer {
    ($ty:ty) => {
        impl ShapeLayer for $ty {
            fn shape(&self) -> &MovableShape {
                &self.shape
            }

            fn shape_mut(&mut self) -> &mut MovableShape {
                &mut self.shape
            }
        }

        impl Layer for $ty {
            fn common(&self) -> &LayerCommon {
                &self.shape.common
            }

            fn common_mut(&mut self) -> &mut LayerCommon {
                &mut self.shape.common
            }

            fn kind(&self) -> LayerKind {
                LayerKind::Plot
            }

            fn bounding_box(&self) -> Option<BoundingBox> {
                self.shape.bounds
            }

            fn render(&mut self, ctx: &mut dyn DrawContext, pass: &RenderPass<'_>) {
                self.shape.draw(ctx, pass.view);
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };
}

/// Polyline or closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    shape: MovableShape,
}

impl Polygon {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut shape = MovableShape::new(name);
        shape.common.continuous = true;
        Self { shape }
    }

    /// Sets the vertices; `closed` repeats the first vertex at the end.
    pub fn set_points(&mut self, xs: &[f64], ys: &[f64], closed: bool) -> PlotResult<()> {
        if xs.len() != ys.len() {
            warn!(x_len = xs.len(), y_len = ys.len(), "rejected polygon vertices");
            return Err(PlotError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        let mut local_xs = xs.to_vec();
        let mut local_ys = ys.to_vec();
        if let (true, Some(&x), Some(&y)) = (closed, xs.first(), ys.first()) {
            local_xs.push(x);
            local_ys.push(y);
        }
        self.shape.set_local_points(local_xs, local_ys)
    }
}

delegate_shape_layer!(Polygon);

/// Confidence ellipse of a 2×2 covariance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceEllipse {
    shape: MovableShape,
    cov_00: f64,
    cov_01: f64,
    cov_11: f64,
    quantiles: f64,
    segments: usize,
}

impl CovarianceEllipse {
    pub const DEFAULT_QUANTILES: f64 = 2.0;
    pub const DEFAULT_SEGMENTS: usize = 32;

    /// Unit covariance at two standard deviations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut shape = MovableShape::new(name);
        shape.common.continuous = true;
        let mut ellipse = Self {
            shape,
            cov_00: 1.0,
            cov_01: 0.0,
            cov_11: 1.0,
            quantiles: Self::DEFAULT_QUANTILES,
            segments: Self::DEFAULT_SEGMENTS,
        };
        if let Ok((xs, ys)) = Self::outline(1.0, 0.0, 1.0, ellipse.quantiles, ellipse.segments) {
            ellipse.shape.local_xs = xs;
            ellipse.shape.local_ys = ys;
            ellipse.shape.update_transformed();
        }
        ellipse
    }

    #[must_use]
    pub fn covariance(&self) -> (f64, f64, f64) {
        (self.cov_00, self.cov_01, self.cov_11)
    }

    #[must_use]
    pub fn quantiles(&self) -> f64 {
        self.quantiles
    }

    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn set_covariance(&mut self, cov_00: f64, cov_01: f64, cov_11: f64) -> PlotResult<()> {
        self.rebuild(cov_00, cov_01, cov_11, self.quantiles, self.segments)
    }

    pub fn set_quantiles(&mut self, quantiles: f64) -> PlotResult<()> {
        self.rebuild(self.cov_00, self.cov_01, self.cov_11, quantiles, self.segments)
    }

    pub fn set_segments(&mut self, segments: usize) -> PlotResult<()> {
        self.rebuild(self.cov_00, self.cov_01, self.cov_11, self.quantiles, segments)
    }

    fn rebuild(
        &mut self,
        cov_00: f64,
        cov_01: f64,
        cov_11: f64,
        quantiles: f64,
        segments: usize,
    ) -> PlotResult<()> {
        let (xs, ys) = Self::outline(cov_00, cov_01, cov_11, quantiles, segments)
            .inspect_err(|err| warn!(%err, "rejected covariance ellipse parameters"))?;
        self.cov_00 = cov_00;
        self.cov_01 = cov_01;
        self.cov_11 = cov_11;
        self.quantiles = quantiles;
        self.segments = segments;
        self.shape.set_local_points(xs, ys)
    }

    fn outline(
        cov_00: f64,
        cov_01: f64,
        cov_11: f64,
        quantiles: f64,
        segments: usize,
    ) -> PlotResult<(Vec<f64>, Vec<f64>)> {
        let invalid = |reason: &str| -> PlotResult<(Vec<f64>, Vec<f64>)> {
            Err(PlotError::InvalidShape(reason.to_owned()))
        };
        if !(quantiles.is_finite() && quantiles >= 0.0) {
            return invalid("quantiles must be finite and non-negative");
        }
        if !(cov_00.is_finite() && cov_00 >= 0.0) {
            return invalid("cov(0,0) must be finite and non-negative");
        }
        if !(cov_11.is_finite() && cov_11 >= 0.0) {
            return invalid("cov(1,1) must be finite and non-negative");
        }
        if !cov_01.is_finite() {
            return invalid("cov(0,1) must be finite");
        }
        if segments < 2 {
            return invalid("an ellipse needs at least two segments");
        }

        // Eigenvalues of [[c00, c01], [c01, c11]].
        let b = -cov_00 - cov_11;
        let c = cov_00 * cov_11 - cov_01 * cov_01;
        let discriminant = b * b - 4.0 * c;
        if discriminant < 0.0 || c < 0.0 {
            return invalid("covariance is not positive semi-definite");
        }
        let root = discriminant.sqrt();
        let eigen_0 = 0.5 * (-b + root);
        let eigen_1 = 0.5 * (-b - root).max(0.0);

        let (vec_0, vec_1) = if cov_01.abs() < 1e-12 {
            if cov_00 >= cov_11 {
                ((1.0, 0.0), (0.0, 1.0))
            } else {
                ((0.0, 1.0), (1.0, 0.0))
            }
        } else {
            (
                eigenvector(eigen_0, cov_00, cov_01, cov_11),
                eigenvector(eigen_1, cov_00, cov_01, cov_11),
            )
        };

        let (scale_0, scale_1) = (eigen_0.sqrt(), eigen_1.sqrt());
        let m_00 = vec_0.0 * scale_0;
        let m_01 = vec_0.1 * scale_0;
        let m_10 = vec_1.0 * scale_1;
        let m_11 = vec_1.1 * scale_1;

        let step = TAU / (segments - 1) as f64;
        Ok((0..segments)
            .map(|i| {
                let (sin, cos) = (step * i as f64).sin_cos();
                (
                    quantiles * (cos * m_00 + sin * m_10),
                    quantiles * (cos * m_01 + sin * m_11),
                )
            })
            .unzip())
    }
}

fn eigenvector(eigen: f64, cov_00: f64, cov_01: f64, cov_11: f64) -> (f64, f64) {
    let (x, y) = if (eigen - cov_00).abs() > 1e-6 {
        (cov_01 / (eigen - cov_00), 1.0)
    } else {
        (1.0, cov_01 / (eigen - cov_11))
    };
    let len = x.hypot(y);
    (x / len, y / len)
}

delegate_shape_layer!(CovarianceEllipse);
