//! Affine mapping between data space and device pixels.
//!
//! `ViewTransform` is the state half of the plot window: scale, position of
//! the top-left device pixel in data space, the last requested ("desired")
//! data rectangle, device size, margins and the aspect lock. Every mutation
//! re-derives scale and position together so the mapping never drifts away
//! from the content on screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BoundingBox, DeviceSize, Margins, PixelPoint};

/// Default multiplicative zoom step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.5;

/// Device size used before the host reports a real one.
pub const INITIAL_SCREEN_SIZE: DeviceSize = DeviceSize::new(64, 64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    scale_x: f64,
    scale_y: f64,
    pos_x: f64,
    pos_y: f64,
    desired: BoundingBox,
    screen: DeviceSize,
    margins: Margins,
    lock_aspect: bool,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            pos_x: 0.0,
            pos_y: 0.0,
            desired: BoundingBox::new(0.0, 1.0, 0.0, 1.0),
            screen: INITIAL_SCREEN_SIZE,
            margins: Margins::default(),
            lock_aspect: false,
        }
    }
}

impl ViewTransform {
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    #[must_use]
    pub fn pos_x(&self) -> f64 {
        self.pos_x
    }

    #[must_use]
    pub fn pos_y(&self) -> f64 {
        self.pos_y
    }

    /// Last explicitly requested data rectangle.
    #[must_use]
    pub fn desired(&self) -> BoundingBox {
        self.desired
    }

    #[must_use]
    pub fn screen(&self) -> DeviceSize {
        self.screen
    }

    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margins
    }

    #[must_use]
    pub fn is_aspect_locked(&self) -> bool {
        self.lock_aspect
    }

    /// Screen width as a device coordinate.
    #[must_use]
    pub fn scr_x(&self) -> i32 {
        self.screen.w()
    }

    /// Screen height as a device coordinate.
    #[must_use]
    pub fn scr_y(&self) -> i32 {
        self.screen.h()
    }

    #[must_use]
    pub fn plot_width(&self) -> i32 {
        self.scr_x() - self.margins.horizontal()
    }

    #[must_use]
    pub fn plot_height(&self) -> i32 {
        self.scr_y() - self.margins.vertical()
    }

    /// Center pixel of the area inside the margins.
    #[must_use]
    pub fn plot_center(&self) -> PixelPoint {
        PixelPoint::new(
            self.plot_width() / 2 + self.margins.left,
            self.plot_height() / 2 + self.margins.top,
        )
    }

    /// Data rectangle currently shown inside the margins.
    #[must_use]
    pub fn visible_bounds(&self) -> BoundingBox {
        let left = self.pixel_to_data_x(f64::from(self.margins.left));
        let right = self.pixel_to_data_x(f64::from(self.scr_x() - self.margins.right));
        let top = self.pixel_to_data_y(f64::from(self.margins.top));
        let bottom = self.pixel_to_data_y(f64::from(self.scr_y() - self.margins.bottom));
        BoundingBox::new(left, right, bottom, top)
    }

    #[must_use]
    pub fn data_to_pixel_x(&self, x: f64) -> f64 {
        (x - self.pos_x) * self.scale_x
    }

    #[must_use]
    pub fn data_to_pixel_y(&self, y: f64) -> f64 {
        (self.pos_y - y) * self.scale_y
    }

    #[must_use]
    pub fn pixel_to_data_x(&self, pixel: f64) -> f64 {
        self.pos_x + pixel / self.scale_x
    }

    #[must_use]
    pub fn pixel_to_data_y(&self, pixel: f64) -> f64 {
        self.pos_y - pixel / self.scale_y
    }

    /// Data x to device column, truncated toward zero.
    #[must_use]
    pub fn x2p(&self, x: f64) -> i32 {
        to_device(self.data_to_pixel_x(x))
    }

    /// Data y to device row, truncated toward zero.
    #[must_use]
    pub fn y2p(&self, y: f64) -> i32 {
        to_device(self.data_to_pixel_y(y))
    }

    #[must_use]
    pub fn p2x(&self, pixel: i32) -> f64 {
        self.pixel_to_data_x(f64::from(pixel))
    }

    #[must_use]
    pub fn p2y(&self, pixel: i32) -> f64 {
        self.pixel_to_data_y(f64::from(pixel))
    }

    pub fn set_screen(&mut self, screen: DeviceSize) {
        self.screen = screen;
    }

    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Only stores the flag; the owner re-fits to apply it.
    pub fn set_lock_aspect(&mut self, enable: bool) {
        self.lock_aspect = enable;
    }

    /// Maps `bounds` onto the plotting area, centering it inside the margins.
    pub fn fit(&mut self, bounds: BoundingBox) {
        self.desired = bounds;

        let mut scale_x = axis_scale(self.plot_width(), bounds.width());
        let mut scale_y = axis_scale(self.plot_height(), bounds.height());
        if self.lock_aspect {
            // The smaller scale keeps the whole requested range visible on both axes.
            let scale = scale_x.min(scale_y);
            scale_x = scale;
            scale_y = scale;
        }
        self.scale_x = scale_x;
        self.scale_y = scale_y;

        let (center_x, center_y) = bounds.center();
        let plot_center = self.plot_center();
        self.pos_x = center_x - f64::from(plot_center.x) / self.scale_x;
        self.pos_y = center_y + f64::from(plot_center.y) / self.scale_y;

        debug!(
            scale_x = self.scale_x,
            scale_y = self.scale_y,
            pos_x = self.pos_x,
            pos_y = self.pos_y,
            "fit view"
        );
    }

    /// Scales both axes by `factor` keeping the data point under `center` fixed.
    pub fn zoom_at(&mut self, factor: f64, center: PixelPoint) {
        if !valid_factor(factor) {
            return;
        }
        let anchor_x = self.p2x(center.x);
        let anchor_y = self.p2y(center.y);

        self.scale_x *= factor;
        self.scale_y *= factor;

        self.pos_x = anchor_x - f64::from(center.x) / self.scale_x;
        self.pos_y = anchor_y + f64::from(center.y) / self.scale_y;
        self.sync_desired_x();
        self.sync_desired_y();
    }

    /// Scales the x axis keeping device column `pixel` fixed.
    pub fn zoom_x_at(&mut self, factor: f64, pixel: i32) {
        if !valid_factor(factor) {
            return;
        }
        let anchor = self.p2x(pixel);
        self.scale_x *= factor;
        self.pos_x = anchor - f64::from(pixel) / self.scale_x;
        self.sync_desired_x();
    }

    /// Scales the y axis keeping device row `pixel` fixed.
    pub fn zoom_y_at(&mut self, factor: f64, pixel: i32) {
        if !valid_factor(factor) {
            return;
        }
        let anchor = self.p2y(pixel);
        self.scale_y *= factor;
        self.pos_y = anchor + f64::from(pixel) / self.scale_y;
        self.sync_desired_y();
    }

    /// Scales the x axis anchored at the top-left device pixel.
    pub fn scale_axis_x(&mut self, factor: f64) {
        self.zoom_x_at(factor, 0);
    }

    /// Scales the y axis anchored at the top-left device pixel.
    pub fn scale_axis_y(&mut self, factor: f64) {
        self.zoom_y_at(factor, 0);
    }

    /// Moves the view by a device delta; positive `dx` reveals data to the right,
    /// positive `dy` reveals data below.
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        self.translate(dx / self.scale_x, -dy / self.scale_y);
    }

    /// Shifts position and desired bounds by a data-space delta.
    pub fn translate(&mut self, dx_units: f64, dy_units: f64) {
        self.pos_x += dx_units;
        self.pos_y += dy_units;
        self.desired.min_x += dx_units;
        self.desired.max_x += dx_units;
        self.desired.min_y += dy_units;
        self.desired.max_y += dy_units;
    }

    pub fn set_pos(&mut self, pos_x: f64, pos_y: f64) {
        self.pos_x = pos_x;
        self.pos_y = pos_y;
    }

    pub fn set_pos_x(&mut self, pos_x: f64) {
        self.pos_x = pos_x;
    }

    pub fn set_pos_y(&mut self, pos_y: f64) {
        self.pos_y = pos_y;
    }

    /// Zero scales are ignored.
    pub fn set_scale_x(&mut self, scale_x: f64) {
        if scale_x != 0.0 && scale_x.is_finite() {
            self.scale_x = scale_x;
            self.sync_desired_x();
        }
    }

    /// Zero scales are ignored.
    pub fn set_scale_y(&mut self, scale_y: f64) {
        if scale_y != 0.0 && scale_y.is_finite() {
            self.scale_y = scale_y;
            self.sync_desired_y();
        }
    }

    fn sync_desired_x(&mut self) {
        self.desired.min_x = self.p2x(self.margins.left);
        self.desired.max_x = self.desired.min_x + f64::from(self.plot_width()) / self.scale_x;
    }

    fn sync_desired_y(&mut self) {
        self.desired.max_y = self.p2y(self.margins.top);
        self.desired.min_y = self.desired.max_y - f64::from(self.plot_height()) / self.scale_y;
    }
}

fn axis_scale(extent_px: i32, delta: f64) -> f64 {
    if delta == 0.0 || !delta.is_finite() || extent_px <= 0 {
        debug!(extent_px, delta, "degenerate fit axis, using unit scale");
        return 1.0;
    }
    f64::from(extent_px) / delta
}

fn valid_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0
}

/// Truncates a device coordinate toward zero, saturating at the `i32` range.
#[must_use]
pub fn to_device(value: f64) -> i32 {
    if value.is_nan() { 0 } else { value as i32 }
}

#[cfg(test)]
mod tests {
    use super::{ViewTransform, to_device};
    use crate::core::{BoundingBox, DeviceSize, Margins, PixelPoint};

    #[test]
    fn fit_without_margins_puts_min_x_at_left_edge() {
        let mut view = ViewTransform::default();
        view.set_screen(DeviceSize::new(200, 100));
        view.fit(BoundingBox::new(0.0, 10.0, 0.0, 5.0));
        assert_eq!(view.pos_x(), 0.0);
        assert_eq!(view.pos_y(), 5.0);
        assert_eq!(view.scale_x(), 20.0);
        assert_eq!(view.scale_y(), 20.0);
    }

    #[test]
    fn desired_follows_margins_after_zoom() {
        let mut view = ViewTransform::default();
        view.set_screen(DeviceSize::new(300, 200));
        view.set_margins(Margins::new(10, 20, 30, 40));
        view.fit(BoundingBox::new(0.0, 24.0, 0.0, 16.0));
        view.zoom_at(2.0, PixelPoint::new(150, 100));
        let desired = view.desired();
        assert!((view.p2x(40) - desired.min_x).abs() < 1e-9);
        assert!((view.p2y(10) - desired.max_y).abs() < 1e-9);
    }

    #[test]
    fn device_conversion_truncates_toward_zero() {
        assert_eq!(to_device(2.9), 2);
        assert_eq!(to_device(-2.9), -2);
        assert_eq!(to_device(f64::NAN), 0);
        assert_eq!(to_device(1e300), i32::MAX);
    }
}
