use mathplot_rs::api::{PlotWindow, PlotWindowConfig};
use mathplot_rs::core::{DeviceSize, PixelPoint, PixelRect};
use mathplot_rs::layers::{
    AxisX, CoordinatesInfo, InfoLayer, InfoOverlay, Layer, LegendInfo, TextLayer, VectorLayer,
    XAxisAlign,
};
use mathplot_rs::render::{Brush, Color, Pen, RecordingContext, RenderFrame};

fn window() -> PlotWindow {
    let mut plot = PlotWindow::new(PlotWindowConfig::new(DeviceSize::new(200, 200)))
        .expect("valid window config");
    plot.fit(0.0, 200.0, 0.0, 200.0);
    plot
}

fn paint(plot: &mut PlotWindow, width: u32, height: u32) -> RenderFrame {
    let mut ctx = RecordingContext::new(DeviceSize::new(width, height));
    plot.render(&mut ctx);
    ctx.into_frame()
}

fn series(name: &str, pen: Pen) -> VectorLayer {
    let mut layer = VectorLayer::from_data(name, vec![10.0, 20.0], vec![10.0, 20.0])
        .expect("matching lengths");
    layer.common_mut().pen = pen;
    layer
}

#[test]
fn legend_lists_visible_plot_layers_in_order() {
    let mut plot = window();
    let red = Pen::new(Color::rgb(1.0, 0.0, 0.0), 1);
    plot.add_layer(series("alpha", red), false);
    plot.add_layer(AxisX::new("axis", XAxisAlign::Center, true), false);
    plot.add_layer(series("beta", Pen::default()), false);
    plot.add_layer(
        LegendInfo::new(PixelRect::new(10, 10, 20, 20), Brush::Solid(Color::WHITE)),
        false,
    );

    let frame = paint(&mut plot, 200, 200);

    // 7 px per char, 13 px per row: widest name "alpha" is 35 px.
    let legend = frame
        .rects()
        .find(|rect| rect.x == 10 && rect.y == 10)
        .expect("legend box is drawn");
    assert_eq!((legend.width, legend.height), (60, 36));

    let alpha = frame.texts_matching("alpha").last().expect("alpha row");
    assert_eq!((alpha.x, alpha.y), (30, 15));
    let beta = frame.texts_matching("beta").last().expect("beta row");
    assert_eq!((beta.x, beta.y), (30, 28));
    assert_eq!(frame.texts_matching("axis").count(), 1);

    let swatch = frame
        .lines()
        .find(|line| line.y1 == 21 && line.x1 == 15)
        .expect("alpha swatch");
    assert_eq!(swatch.x2, 25);
    assert_eq!(swatch.pen, red);
}

#[test]
fn legend_skips_hidden_layers_and_draws_nothing_when_empty() {
    let mut plot = window();
    let beta = plot.add_layer(series("beta", Pen::default()), false);
    plot.add_layer(
        LegendInfo::new(PixelRect::new(10, 10, 20, 20), Brush::Transparent),
        false,
    );

    plot.set_layer_visible(beta, false);
    let frame = paint(&mut plot, 200, 200);

    assert_eq!(frame.texts_matching("beta").count(), 0);
    assert!(frame.rects().all(|rect| rect.x != 10));
}

#[test]
fn coordinates_readout_grows_around_its_text() {
    let mut plot = window();
    let id = plot.add_layer(
        CoordinatesInfo::new(PixelRect::new(10, 10, 10, 10), Brush::Transparent),
        false,
    );

    plot.on_pointer_move(50, 20);
    let frame = paint(&mut plot, 200, 200);

    let text = "x = 50.000000\ny = 180.000000";
    let readout = frame.texts_matching(text).next().expect("readout text");
    assert_eq!((readout.x, readout.y), (15, 15));

    // Widest row is 14 chars at 7 px, two rows at 13 px, 5 px padding per side.
    let info = plot.layer(id).and_then(|layer| layer.as_info()).expect("info layer");
    assert_eq!(info.rect(), PixelRect::new(10, 10, 108, 36));
}

#[test]
fn overlays_follow_window_resizes() {
    let mut plot = window();
    let id = plot.add_layer(
        InfoOverlay::new(PixelRect::new(10, 10, 20, 20), Brush::Transparent),
        false,
    );

    paint(&mut plot, 200, 200);
    plot.on_resize(DeviceSize::new(400, 100));
    paint(&mut plot, 400, 100);

    let info = plot.layer(id).and_then(|layer| layer.as_info()).expect("info layer");
    assert_eq!(info.rect(), PixelRect::new(20, 5, 20, 20));
}

#[test]
fn text_layer_is_placed_by_percentage() {
    let mut plot = window();
    plot.add_layer(TextLayer::new("caption", 50, 25), false);
    plot.add_layer(TextLayer::new("fallback", 150, -3), false);

    let frame = paint(&mut plot, 200, 200);

    let caption = frame.texts_matching("caption").next().expect("caption");
    assert_eq!((caption.x, caption.y), (100, 50));
    let fallback = frame.texts_matching("fallback").next().expect("fallback");
    assert_eq!((fallback.x, fallback.y), (10, 100));
}

#[test]
fn text_layer_is_not_draggable() {
    let mut plot = window();
    plot.add_layer(TextLayer::new("caption", 0, 0), false);

    assert_eq!(plot.info_layer_at(PixelPoint::new(2, 2)), None);
}
