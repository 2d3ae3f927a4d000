use approx::assert_relative_eq;
use mathplot_rs::api::{PlotWindow, PlotWindowConfig};
use mathplot_rs::core::{BoundingBox, DeviceSize};
use mathplot_rs::layers::{AxisX, FunctionX, VectorLayer, XAxisAlign};

fn window() -> PlotWindow {
    PlotWindow::new(PlotWindowConfig::new(DeviceSize::new(400, 300)))
        .expect("valid window config")
}

#[test]
fn auto_fit_without_bounded_layers_is_a_no_op() {
    let mut plot = window();
    plot.add_layer(AxisX::new("x", XAxisAlign::Center, true), false);
    plot.add_layer(FunctionX::new("sin", f64::sin), false);
    let (scale_x, pos_x) = (plot.scale_x(), plot.pos_x());

    assert!(!plot.auto_fit());
    assert_eq!(plot.bounding_box(), BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    assert_eq!(plot.scale_x(), scale_x);
    assert_eq!(plot.pos_x(), pos_x);
}

#[test]
fn auto_fit_shows_padded_series_bounds() {
    let mut plot = window();
    let series = VectorLayer::from_data("data", vec![0.0, 5.0, 10.0], vec![0.0, 5.0, 2.0])
        .expect("matching lengths");
    plot.add_layer(series, false);

    assert!(plot.auto_fit());

    let expected = BoundingBox::new(-0.5, 10.5, -0.5, 5.5);
    assert_eq!(plot.bounding_box(), expected);
    assert_eq!(plot.desired_bounds(), expected);
    assert_relative_eq!(plot.data_to_pixel_x(-0.5), 0.0, epsilon = 1e-9);
    assert_relative_eq!(plot.data_to_pixel_x(10.5), 400.0, epsilon = 1e-9);
}

#[test]
fn auto_fit_unions_every_bounded_layer() {
    let mut plot = window();
    plot.add_layer(
        VectorLayer::from_data("a", vec![0.0, 1.0], vec![0.0, 1.0]).expect("matching lengths"),
        false,
    );
    plot.add_layer(
        FunctionX::new("line", |x| x).with_bounds(BoundingBox::new(-20.0, -10.0, 3.0, 40.0)),
        false,
    );

    assert!(plot.auto_fit());

    let bounds = plot.bounding_box();
    assert_relative_eq!(bounds.min_x, -20.0);
    assert_relative_eq!(bounds.max_x, 1.5);
    assert_relative_eq!(bounds.min_y, -0.5);
    assert_relative_eq!(bounds.max_y, 40.0);
}

#[test]
fn removing_every_layer_keeps_the_last_bounds() {
    let mut plot = window();
    let id = plot.add_layer(
        VectorLayer::from_data("a", vec![1.0, 2.0], vec![3.0, 4.0]).expect("matching lengths"),
        true,
    );
    let before = plot.bounding_box();

    assert!(plot.remove_layer(id, true).is_some());

    assert!(!plot.update_bounds());
    assert_eq!(plot.bounding_box(), before);
}

#[test]
fn fit_after_lock_toggle_keeps_requested_range_visible() {
    let mut plot = window();
    plot.add_layer(
        VectorLayer::from_data("a", vec![0.0, 100.0], vec![0.0, 1.0]).expect("matching lengths"),
        false,
    );
    plot.auto_fit();
    plot.lock_aspect(true);

    let visible = plot.view().visible_bounds();
    assert!(visible.min_x <= -0.5 + 1e-9);
    assert!(visible.max_x >= 100.5 - 1e-9);
    assert_eq!(plot.scale_x(), plot.scale_y());
}
