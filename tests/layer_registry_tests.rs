use mathplot_rs::api::PlotWindow;
use mathplot_rs::core::{PixelPoint, PixelRect};
use mathplot_rs::layers::{
    AxisY, FunctionX, InfoOverlay, Layer, LayerKind, TextLayer, VectorLayer, YAxisAlign,
};
use mathplot_rs::render::Brush;

fn series(name: &str) -> VectorLayer {
    VectorLayer::from_data(name, vec![0.0, 1.0], vec![0.0, 1.0]).expect("matching lengths")
}

#[test]
fn layers_keep_insertion_order() {
    let mut plot = PlotWindow::default();
    let first = plot.add_layer(series("first"), false);
    let axis = plot.add_layer(AxisY::new("y", YAxisAlign::Left, true), false);
    let last = plot.add_layer(series("last"), false);

    assert_eq!(plot.layer_ids().collect::<Vec<_>>(), vec![first, axis, last]);
    assert_eq!(plot.layer_at(1).map(|layer| layer.name()), Some("y"));
    assert_eq!(plot.layer_id_at(2), Some(last));
    assert!(plot.layer_at(3).is_none());
}

#[test]
fn counts_separate_bounded_layers() {
    let mut plot = PlotWindow::default();
    plot.add_layer(series("data"), false);
    plot.add_layer(AxisY::new("y", YAxisAlign::Center, true), false);
    plot.add_layer(FunctionX::new("f", |x| x * x), false);

    assert_eq!(plot.count_all_layers(), 3);
    assert_eq!(plot.count_layers(), 1);
}

#[test]
fn removal_keeps_order_of_remaining_layers() {
    let mut plot = PlotWindow::default();
    let a = plot.add_layer(series("a"), false);
    let b = plot.add_layer(series("b"), false);
    let c = plot.add_layer(series("c"), false);

    let removed = plot.remove_layer(b, true).expect("layer b exists");
    assert_eq!(removed.name(), "b");
    assert!(plot.remove_layer(b, true).is_none());
    assert_eq!(plot.layer_ids().collect::<Vec<_>>(), vec![a, c]);

    let rest = plot.remove_all_layers(true);
    assert_eq!(rest.len(), 2);
    assert_eq!(plot.count_all_layers(), 0);
}

#[test]
fn ids_are_not_reused() {
    let mut plot = PlotWindow::default();
    let a = plot.add_layer(series("a"), false);
    plot.remove_layer(a, false);
    let b = plot.add_layer(series("a"), false);

    assert_ne!(a, b);
    assert!(plot.layer(a).is_none());
}

#[test]
fn lookup_by_name_returns_first_match() {
    let mut plot = PlotWindow::default();
    let first = plot.add_layer(series("dup"), false);
    plot.add_layer(series("dup"), false);

    assert_eq!(plot.layer_id_by_name("dup"), Some(first));
    assert!(plot.layer_by_name("missing").is_none());
    assert_eq!(
        plot.layer_by_name("dup").map(|layer| layer.kind()),
        Some(LayerKind::Plot)
    );
}

#[test]
fn visibility_toggles_by_id_name_and_index() {
    let mut plot = PlotWindow::default();
    let id = plot.add_layer(series("data"), false);
    plot.add_layer(TextLayer::new("caption", 10, 10), false);

    assert!(plot.is_layer_visible(id));
    assert!(plot.set_layer_visible(id, false));
    assert!(!plot.is_layer_visible_by_name("data"));

    assert!(plot.set_layer_visible_by_name("caption", false));
    assert!(!plot.is_layer_visible_at(1));
    assert!(plot.set_layer_visible_at(1, true));
    assert!(plot.is_layer_visible_by_name("caption"));

    assert!(!plot.set_layer_visible_by_name("missing", true));
    assert!(!plot.set_layer_visible_at(7, true));
    assert!(!plot.is_layer_visible_by_name("missing"));
}

#[test]
fn typed_access_downcasts_to_the_concrete_layer() {
    let mut plot = PlotWindow::default();
    let id = plot.add_layer(series("data"), false);

    assert!(plot.layer_as::<FunctionX>(id).is_none());
    plot.layer_as_mut::<VectorLayer>(id)
        .expect("vector layer")
        .set_data(vec![4.0], vec![2.0])
        .expect("matching lengths");

    let (xs, ys) = plot.layer_as::<VectorLayer>(id).expect("vector layer").data();
    assert_eq!(xs, vec![4.0]);
    assert_eq!(ys, vec![2.0]);
}

#[test]
fn hidden_overlays_are_not_hit() {
    let mut plot = PlotWindow::default();
    let id = plot.add_layer(
        InfoOverlay::new(PixelRect::new(10, 10, 20, 20), Brush::Transparent),
        false,
    );
    let inside = PixelPoint::new(15, 15);

    assert_eq!(plot.info_layer_at(inside), Some(id));
    plot.set_layer_visible(id, false);
    assert_eq!(plot.info_layer_at(inside), None);
}
