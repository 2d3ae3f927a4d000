use std::f64::consts::FRAC_PI_2;

use approx::{abs_diff_eq, assert_abs_diff_eq};
use mathplot_rs::PlotError;
use mathplot_rs::api::{PlotWindow, PlotWindowConfig};
use mathplot_rs::core::DeviceSize;
use mathplot_rs::layers::{CovarianceEllipse, Layer, MovableShape, Polygon, Pose, ShapeLayer};
use mathplot_rs::render::RecordingContext;

fn unit_square() -> Polygon {
    let mut square = Polygon::new("square");
    square
        .set_points(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 1.0], true)
        .expect("matching vertices");
    square
}

#[test]
fn closed_polygon_repeats_its_first_vertex() {
    let square = unit_square();
    let (xs, ys) = square.shape().local_points();
    assert_eq!(xs, &[0.0, 1.0, 1.0, 0.0, 0.0]);
    assert_eq!(ys, &[0.0, 0.0, 1.0, 1.0, 0.0]);
}

#[test]
fn rotated_square_bounds_follow_the_pose() {
    let mut square = unit_square();
    square.set_pose(Pose::new(5.0, 5.0, FRAC_PI_2));

    let bounds = square.bounding_box().expect("square has vertices");
    assert_abs_diff_eq!(bounds.min_x, 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.max_x, 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.min_y, 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.max_y, 6.0, epsilon = 1e-12);
    assert_eq!(square.pose(), Pose::new(5.0, 5.0, FRAC_PI_2));
}

#[test]
fn mismatched_polygon_is_rejected() {
    let mut square = unit_square();
    let err = square
        .set_points(&[0.0, 1.0], &[0.0], false)
        .expect_err("mismatch must fail");
    assert!(matches!(err, PlotError::LengthMismatch { x_len: 2, y_len: 1 }));
    assert_eq!(square.shape().local_points().0.len(), 5);
}

#[test]
fn empty_shape_has_no_bounds() {
    let shape = MovableShape::new("empty");
    assert!(shape.bounding_box().is_none());
}

#[test]
fn ellipse_axes_follow_the_covariance() {
    let mut ellipse = CovarianceEllipse::new("cov");
    ellipse.set_covariance(4.0, 0.0, 1.0).expect("valid covariance");

    let bounds = ellipse.bounding_box().expect("ellipse outline");
    // Two standard deviations: semi-axes 4 along x and 2 along y.
    assert_abs_diff_eq!(bounds.max_x, 4.0, epsilon = 1e-9);
    assert!(bounds.min_x > -4.0 - 1e-9 && bounds.min_x < -3.9);
    assert!(bounds.max_y <= 2.0 + 1e-9 && bounds.max_y > 1.9);
    assert_eq!(
        ellipse.shape().local_points().0.len(),
        CovarianceEllipse::DEFAULT_SEGMENTS
    );
}

#[test]
fn correlated_ellipse_is_tilted() {
    let mut ellipse = CovarianceEllipse::new("cov");
    ellipse.set_covariance(2.0, 1.5, 2.0).expect("valid covariance");

    let (xs, ys) = ellipse.shape().transformed_points();
    // The major axis lies on the diagonal, so the first vertex has x == y.
    assert!(abs_diff_eq!(xs[0], ys[0], epsilon = 1e-9));
    assert!(xs[0] > 0.0);
}

#[test]
fn invalid_ellipse_parameters_keep_the_previous_outline() {
    let mut ellipse = CovarianceEllipse::new("cov");
    let before = ellipse.bounding_box();

    assert!(matches!(
        ellipse.set_covariance(1.0, 2.0, 1.0),
        Err(PlotError::InvalidShape(_))
    ));
    assert!(ellipse.set_quantiles(-1.0).is_err());
    assert!(ellipse.set_segments(1).is_err());

    assert_eq!(ellipse.covariance(), (1.0, 0.0, 1.0));
    assert_eq!(ellipse.segments(), CovarianceEllipse::DEFAULT_SEGMENTS);
    assert_eq!(ellipse.bounding_box(), before);
}

#[test]
fn shapes_take_part_in_auto_fit_and_draw_their_outline() {
    let mut plot = PlotWindow::new(PlotWindowConfig::new(DeviceSize::new(100, 100)))
        .expect("valid window config");
    let mut square = unit_square();
    square.set_pose(Pose::new(10.0, 20.0, 0.0));
    plot.add_layer(square, false);

    assert!(plot.auto_fit());
    assert_eq!(plot.bounding_box().min_x, 10.0);
    assert_eq!(plot.bounding_box().max_y, 21.0);

    let mut ctx = RecordingContext::new(DeviceSize::new(100, 100));
    plot.render(&mut ctx);
    assert_eq!(ctx.frame().lines().count(), 4);
    assert_eq!(ctx.frame().texts_matching("square").count(), 1);
}

#[test]
fn ellipse_accepts_the_smallest_valid_parameters() {
    let mut ellipse = CovarianceEllipse::new("cov");

    ellipse.set_segments(2).expect("two segments close the outline");
    assert_eq!(ellipse.shape().local_points().0.len(), 2);

    ellipse.set_quantiles(0.0).expect("zero quantiles are allowed");
    let (xs, ys) = ellipse.shape().local_points();
    assert!(xs.iter().chain(ys).all(|value| *value == 0.0));
}

#[test]
fn far_away_shape_renders_without_overflow() {
    let mut plot = PlotWindow::new(PlotWindowConfig::new(DeviceSize::new(100, 100)))
        .expect("valid window config");
    plot.fit(0.0, 100.0, 0.0, 100.0);
    let mut square = unit_square();
    square.set_pose(Pose::new(-1.0e10, 1.0e10, 0.0));
    plot.add_layer(square, false);

    let mut ctx = RecordingContext::new(DeviceSize::new(100, 100));
    plot.render(&mut ctx);

    let label = ctx.frame().texts_matching("square").next().expect("label");
    assert_eq!((label.x, label.y), (i32::MIN, i32::MIN));
}
