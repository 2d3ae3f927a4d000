use mathplot_rs::PlotError;
use mathplot_rs::api::{PlotWindow, PlotWindowConfig};
use mathplot_rs::core::{BoundingBox, DeviceSize, Margins};
use mathplot_rs::layers::{Corner, Layer, SequenceLayer, VectorLayer, VectorSeries, XySequence};
use mathplot_rs::render::{Color, Pen, RecordingContext, RenderFrame};

/// 100×100 window at one pixel per unit, data origin at the bottom-left.
fn window() -> PlotWindow {
    let mut plot = PlotWindow::new(PlotWindowConfig::new(DeviceSize::new(100, 100)))
        .expect("valid window config");
    plot.fit(0.0, 100.0, 0.0, 100.0);
    plot
}

fn paint(plot: &mut PlotWindow) -> RenderFrame {
    let mut ctx = RecordingContext::new(plot.screen_size());
    plot.render(&mut ctx);
    ctx.into_frame()
}

#[test]
fn mismatched_lengths_keep_previous_data() {
    let mut series = VectorSeries::from_data(vec![1.0, 2.0], vec![3.0, 4.0]).expect("same length");

    let err = series
        .set_data(vec![1.0, 2.0, 3.0], vec![1.0])
        .expect_err("mismatch must fail");

    assert!(matches!(err, PlotError::LengthMismatch { x_len: 3, y_len: 1 }));
    assert_eq!(series.xs(), &[1.0, 2.0]);
    assert_eq!(series.ys(), &[3.0, 4.0]);
}

#[test]
fn empty_series_reports_unit_box() {
    let mut series = VectorSeries::new();
    assert!(series.is_empty());
    assert_eq!(series.bounds(), BoundingBox::new(-1.0, 1.0, -1.0, 1.0));

    series.set_data(vec![2.0], vec![5.0]).expect("same length");
    series.clear();
    assert_eq!(series.bounds(), BoundingBox::new(-1.0, 1.0, -1.0, 1.0));
}

#[test]
fn bounds_are_padded_by_half_a_unit() {
    let series = VectorSeries::from_data(vec![1.0, 4.0, 2.0], vec![-3.0, 0.0, 8.0])
        .expect("same length");
    assert_eq!(series.bounds(), BoundingBox::new(0.5, 4.5, -3.5, 8.5));
    assert_eq!(series.len(), 3);
}

#[test]
fn dots_outside_the_plot_area_are_dropped() {
    let config = PlotWindowConfig::new(DeviceSize::new(100, 100))
        .with_margins(Margins::new(10, 10, 10, 10));
    let mut plot = PlotWindow::new(config).expect("valid window config");
    plot.fit(10.0, 90.0, 10.0, 90.0);
    let mut layer = VectorLayer::from_data("pts", vec![50.0, 5.0, 95.0], vec![50.0, 50.0, 50.0])
        .expect("same length");
    layer.common_mut().draw_outside_margins = false;
    layer.common_mut().show_name = false;
    plot.add_layer(layer, false);

    let frame = paint(&mut plot);

    let points: Vec<(i32, i32)> = frame.points().map(|point| (point.x, point.y)).collect();
    assert_eq!(points, vec![(50, 50)]);
}

#[test]
fn thick_pens_draw_dots_as_zero_length_lines() {
    let mut plot = window();
    let mut layer =
        VectorLayer::from_data("pts", vec![10.0, 20.0], vec![90.0, 80.0]).expect("same length");
    layer.common_mut().pen = Pen::new(Color::BLACK, 3);
    plot.add_layer(layer, false);

    let frame = paint(&mut plot);

    assert_eq!(frame.points().count(), 0);
    let dots: Vec<(i32, i32)> = frame
        .lines()
        .filter(|line| line.is_dot())
        .map(|line| (line.x1, line.y1))
        .collect();
    assert_eq!(dots, vec![(10, 10), (20, 20)]);
}

#[test]
fn continuous_series_draws_clipped_segments() {
    let config = PlotWindowConfig::new(DeviceSize::new(100, 100))
        .with_margins(Margins::new(10, 10, 10, 10));
    let mut plot = PlotWindow::new(config).expect("valid window config");
    plot.fit(10.0, 90.0, 10.0, 90.0);
    let mut layer = VectorLayer::from_data("line", vec![50.0, 50.0], vec![50.0, 200.0])
        .expect("same length")
        .with_continuous(true);
    layer.common_mut().draw_outside_margins = false;
    plot.add_layer(layer, false);

    let frame = paint(&mut plot);

    let segment = frame.lines().next().expect("one segment");
    assert_eq!((segment.x1, segment.y1), (50, 50));
    assert_eq!((segment.x2, segment.y2), (50, 10));
}

#[test]
fn label_sits_in_the_requested_corner_of_the_drawn_extent() {
    let mut plot = window();
    let layer = VectorLayer::from_data("abc", vec![10.0, 60.0], vec![90.0, 40.0])
        .expect("same length")
        .with_corner(Corner::SouthWest);
    let id = plot.add_layer(layer, false);

    let frame = paint(&mut plot);

    // Drawn extent is x 10..60, y 10..60; "abc" measures 21×13.
    let label = frame.texts_matching("abc").next().expect("label");
    assert_eq!((label.x, label.y), (18, 39));
    let drawn = plot
        .layer_as::<VectorLayer>(id)
        .and_then(VectorLayer::last_drawn)
        .expect("drawn extent");
    assert_eq!((drawn.min_x, drawn.max_x), (10, 60));
}

/// Parametric spiral sampled on demand.
struct Spiral {
    step: usize,
    steps: usize,
}

impl XySequence for Spiral {
    fn rewind(&mut self) {
        self.step = 0;
    }

    fn next_xy(&mut self) -> Option<(f64, f64)> {
        if self.step >= self.steps {
            return None;
        }
        let t = self.step as f64 * 0.5;
        self.step += 1;
        Some((50.0 + t * t.cos(), 50.0 + t * t.sin()))
    }
}

#[test]
fn custom_sequences_are_rewound_on_every_pass() {
    let mut plot = window();
    let mut layer = SequenceLayer::new("spiral", Spiral { step: 0, steps: 12 });
    layer.common_mut().show_name = false;
    let id = plot.add_layer(layer, false);

    let first = paint(&mut plot).points().count();
    let second = paint(&mut plot).points().count();

    assert_eq!(first, 12);
    assert_eq!(second, 12);
    assert!(plot.layer(id).and_then(|layer| layer.bounding_box()).is_none());
}
