use mathplot_rs::PlotError;
use mathplot_rs::api::{ColourTheme, PlotWindow, PlotWindowConfig};
use mathplot_rs::core::{DEFAULT_ZOOM_FACTOR, DeviceSize, Margins, PixelRect};
use mathplot_rs::layers::{AxisX, Layer, LegendInfo, VectorLayer, XAxisAlign};
use mathplot_rs::render::{Brush, Color};

#[test]
fn config_json_roundtrip() {
    let config = PlotWindowConfig::new(DeviceSize::new(640, 480))
        .with_margins(Margins::new(5, 10, 15, 20))
        .with_lock_aspect(true)
        .with_zoom_factor(2.0)
        .with_mouse_navigation(false)
        .with_scrollbars(true)
        .with_theme(ColourTheme::new(Color::BLACK, Color::WHITE, Color::GREY));

    let json = config.to_json_pretty().expect("serialize");
    let parsed = PlotWindowConfig::from_json_str(&json).expect("parse");

    assert_eq!(parsed, config);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let parsed = PlotWindowConfig::from_json_str("{}").expect("parse");
    assert_eq!(parsed, PlotWindowConfig::default());
    assert_eq!(parsed.zoom_factor, DEFAULT_ZOOM_FACTOR);
    assert!(parsed.mouse_navigation);
    assert!(!parsed.scrollbars);
}

#[test]
fn malformed_json_is_reported_as_invalid_data() {
    let err = PlotWindowConfig::from_json_str("{ not json").expect_err("must fail");
    assert!(matches!(err, PlotError::InvalidData(_)));
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_screen = PlotWindowConfig::new(DeviceSize::new(0, 100));
    assert!(matches!(
        PlotWindow::new(zero_screen),
        Err(PlotError::InvalidViewport {
            width: 0,
            height: 100
        })
    ));

    let flat_zoom = PlotWindowConfig::default().with_zoom_factor(1.0);
    assert!(matches!(
        flat_zoom.validate(),
        Err(PlotError::InvalidData(_))
    ));
    assert!(
        PlotWindowConfig::default()
            .with_zoom_factor(f64::INFINITY)
            .validate()
            .is_err()
    );

    let negative_margin = PlotWindowConfig::default().with_margins(Margins::new(0, -1, 0, 0));
    assert!(PlotWindow::new(negative_margin).is_err());

    let bad_theme = ColourTheme::new(Color::rgb(2.0, 0.0, 0.0), Color::BLACK, Color::BLACK);
    assert!(PlotWindowConfig::default().with_theme(bad_theme).validate().is_err());
}

#[test]
fn window_reports_its_live_config() {
    let config = PlotWindowConfig::new(DeviceSize::new(300, 200))
        .with_margins(Margins::new(1, 2, 3, 4))
        .with_scrollbars(true);
    let mut plot = PlotWindow::new(config).expect("valid window config");
    assert_eq!(plot.config(), config);

    plot.lock_aspect(true);
    plot.set_zoom_factor(3.0).expect("valid zoom factor");
    let live = plot.config();
    assert!(live.lock_aspect);
    assert_eq!(live.zoom_factor, 3.0);
    assert_eq!(live.margins, Margins::new(1, 2, 3, 4));

    assert!(plot.set_zoom_factor(1.0).is_err());
    assert_eq!(plot.zoom_factor(), 3.0);
}

#[test]
fn colour_theme_recolours_axes_and_overlays_only() {
    let mut plot = PlotWindow::default();
    let axis = plot.add_layer(AxisX::new("x", XAxisAlign::Center, true), false);
    let legend = plot.add_layer(
        LegendInfo::new(PixelRect::new(10, 10, 20, 20), Brush::Transparent),
        false,
    );
    let series = plot.add_layer(
        VectorLayer::from_data("s", vec![0.0], vec![0.0]).expect("same length"),
        false,
    );

    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    plot.set_colour_theme(ColourTheme::new(Color::BLACK, blue, red))
        .expect("valid theme");

    let pen_color = |plot: &PlotWindow, id| plot.layer(id).map(|layer| layer.pen().color);
    assert_eq!(pen_color(&plot, axis), Some(red));
    assert_eq!(pen_color(&plot, legend), Some(blue));
    assert_eq!(pen_color(&plot, series), Some(Color::BLACK));
    assert_eq!(plot.config().theme.background, Color::BLACK);

    let before = plot.config().theme;
    let invalid = ColourTheme::new(Color::rgb(f64::NAN, 0.0, 0.0), blue, red);
    assert!(plot.set_colour_theme(invalid).is_err());
    assert_eq!(plot.config().theme, before);
}

#[test]
fn tracing_setup_is_opt_in_and_installs_once() {
    let first = mathplot_rs::telemetry::init_default_tracing();
    let second = mathplot_rs::telemetry::init_tracing_with_filter("debug");

    assert!(!second);
    if !cfg!(feature = "telemetry") {
        assert!(!first);
    }
}
