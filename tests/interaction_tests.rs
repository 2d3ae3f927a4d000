use approx::assert_relative_eq;
use mathplot_rs::api::{PlotWindow, PlotWindowConfig};
use mathplot_rs::core::{DeviceSize, PixelRect};
use mathplot_rs::interaction::{
    ContextCommand, Gesture, InteractionOutcome, MOUSE_HELP_TEXT, Modifiers, ScrollAction,
    ScrollOrientation,
};
use mathplot_rs::layers::{CoordinatesInfo, InfoLayer, InfoOverlay, VectorLayer};
use mathplot_rs::render::{Brush, PenStyle, RecordingContext};

/// 200×100 window showing [0, 20]×[0, 10] at 10 px per unit.
fn window() -> PlotWindow {
    window_with(PlotWindowConfig::new(DeviceSize::new(200, 100)))
}

fn window_with(config: PlotWindowConfig) -> PlotWindow {
    let mut plot = PlotWindow::new(config).expect("valid window config");
    plot.fit(0.0, 20.0, 0.0, 10.0);
    plot
}

#[test]
fn left_drag_zooms_to_marked_area() {
    let mut plot = window();

    assert_eq!(plot.on_left_down(20, 10), InteractionOutcome::None);
    assert_eq!(plot.on_pointer_move(120, 60), InteractionOutcome::Redraw);
    assert_eq!(
        plot.interaction_state().rubber_band(),
        Some(PixelRect::new(20, 10, 100, 50))
    );

    let mut ctx = RecordingContext::new(DeviceSize::new(200, 100));
    plot.render(&mut ctx);
    let band = ctx
        .frame()
        .rects()
        .find(|rect| rect.pen.style == PenStyle::Dot)
        .expect("rubber band is drawn");
    assert_eq!((band.x, band.y, band.width, band.height), (20, 10, 100, 50));

    assert_eq!(plot.on_left_up(120, 60), InteractionOutcome::Redraw);
    let desired = plot.desired_bounds();
    assert_relative_eq!(desired.min_x, 2.0, epsilon = 1e-9);
    assert_relative_eq!(desired.max_x, 12.0, epsilon = 1e-9);
    assert_relative_eq!(desired.min_y, 4.0, epsilon = 1e-9);
    assert_relative_eq!(desired.max_y, 9.0, epsilon = 1e-9);
    assert_eq!(plot.interaction_state().gesture(), Gesture::Idle);
}

#[test]
fn left_click_without_drag_keeps_the_view() {
    let mut plot = window();
    let view = *plot.view();

    plot.on_left_down(50, 50);
    assert_eq!(plot.on_left_up(50, 50), InteractionOutcome::None);
    assert_eq!(*plot.view(), view);
}

#[test]
fn right_drag_pans_and_suppresses_menu() {
    let mut plot = window();
    let (pos_x, pos_y) = (plot.pos_x(), plot.pos_y());

    plot.on_right_down(100, 50);
    assert_eq!(plot.on_pointer_move(90, 40), InteractionOutcome::Redraw);
    assert_relative_eq!(plot.pos_x(), pos_x + 1.0, epsilon = 1e-9);
    assert_relative_eq!(plot.pos_y(), pos_y - 1.0, epsilon = 1e-9);

    assert_eq!(plot.on_right_up(90, 40), InteractionOutcome::None);
    assert_eq!(plot.interaction_state().gesture(), Gesture::Idle);
}

#[test]
fn right_click_requests_menu_and_center_recenters_on_it() {
    let mut plot = window();
    let (x, y) = (plot.p2x(30), plot.p2y(40));

    plot.on_right_down(30, 40);
    assert_eq!(
        plot.on_right_up(30, 40),
        InteractionOutcome::ShowContextMenu { x: 30, y: 40 }
    );

    assert_eq!(
        plot.execute_command(ContextCommand::Center),
        InteractionOutcome::Redraw
    );
    assert_relative_eq!(plot.p2x(100), x, epsilon = 1e-9);
    assert_relative_eq!(plot.p2y(50), y, epsilon = 1e-9);
}

#[test]
fn middle_click_also_requests_menu() {
    let mut plot = window();
    assert_eq!(
        plot.on_middle_up(7, 8),
        InteractionOutcome::ShowContextMenu { x: 7, y: 8 }
    );
}

#[test]
fn menu_zoom_in_uses_the_click_position() {
    let mut plot = window();
    let x = plot.p2x(30);
    plot.on_right_down(30, 40);
    plot.on_right_up(30, 40);

    plot.execute_command(ContextCommand::ZoomIn);

    assert_relative_eq!(plot.scale_x(), 15.0);
    assert_relative_eq!(plot.p2x(30), x, epsilon = 1e-9);

    plot.execute_command(ContextCommand::ZoomOut);
    assert_relative_eq!(plot.scale_x(), 10.0, epsilon = 1e-9);
}

#[test]
fn menu_fit_lock_and_help() {
    let mut plot = window();
    plot.add_layer(
        VectorLayer::from_data("data", vec![0.0, 4.0], vec![0.0, 2.0]).expect("matching lengths"),
        false,
    );

    plot.execute_command(ContextCommand::Fit);
    assert_relative_eq!(plot.desired_bounds().max_x, 4.5);

    assert!(!plot.is_aspect_locked());
    plot.execute_command(ContextCommand::ToggleLockAspect);
    assert!(plot.is_aspect_locked());
    assert_eq!(plot.scale_x(), plot.scale_y());

    assert_eq!(
        plot.execute_command(ContextCommand::MouseHelp),
        InteractionOutcome::ShowHelp(MOUSE_HELP_TEXT)
    );
    assert_eq!(ContextCommand::ALL.len(), 6);
}

#[test]
fn ctrl_wheel_zooms_around_the_pointer() {
    let mut plot = window();
    let x = plot.p2x(150);

    assert_eq!(
        plot.on_wheel(150, 20, 120, Modifiers::CONTROL),
        InteractionOutcome::Redraw
    );
    assert_relative_eq!(plot.scale_x(), 15.0);
    assert_relative_eq!(plot.p2x(150), x, epsilon = 1e-9);

    plot.on_wheel(150, 20, -120, Modifiers::CONTROL);
    assert_relative_eq!(plot.scale_x(), 10.0, epsilon = 1e-9);
}

#[test]
fn plain_and_shift_wheel_scroll() {
    let mut plot = window();
    let (pos_x, pos_y) = (plot.pos_x(), plot.pos_y());

    plot.on_wheel(0, 0, 120, Modifiers::NONE);
    assert_relative_eq!(plot.pos_y(), pos_y + 12.0, epsilon = 1e-9);
    assert_relative_eq!(plot.pos_x(), pos_x);

    plot.on_wheel(0, 0, 120, Modifiers::SHIFT);
    assert_relative_eq!(plot.pos_x(), pos_x - 12.0, epsilon = 1e-9);
}

#[test]
fn disabled_navigation_ignores_drags_and_wheel_but_keeps_menu() {
    let mut plot = window_with(
        PlotWindowConfig::new(DeviceSize::new(200, 100)).with_mouse_navigation(false),
    );
    let view = *plot.view();

    assert_eq!(plot.on_left_down(10, 10), InteractionOutcome::None);
    assert_eq!(plot.on_pointer_move(90, 90), InteractionOutcome::None);
    assert_eq!(plot.on_left_up(90, 90), InteractionOutcome::None);
    assert_eq!(plot.on_wheel(10, 10, 120, Modifiers::CONTROL), InteractionOutcome::None);
    assert_eq!(*plot.view(), view);

    plot.on_right_down(5, 5);
    assert_eq!(
        plot.on_right_up(5, 5),
        InteractionOutcome::ShowContextMenu { x: 5, y: 5 }
    );
}

#[test]
fn scroll_events_need_scrollbars() {
    let mut plot = window();
    assert!(plot.scrollbars().is_none());
    assert_eq!(
        plot.on_scroll(ScrollOrientation::Horizontal, ScrollAction::Top),
        InteractionOutcome::None
    );
}

#[test]
fn scrollbars_track_content_and_move_the_view() {
    let mut plot = window_with(
        PlotWindowConfig::new(DeviceSize::new(200, 100)).with_scrollbars(true),
    );
    plot.add_layer(
        VectorLayer::from_data("data", vec![0.0, 20.0], vec![0.0, 10.0])
            .expect("matching lengths"),
        true,
    );

    let bars = plot.scrollbars().expect("scrollbars enabled");
    assert_eq!(bars.horizontal.position, 5);
    assert_eq!(bars.horizontal.thumb, 200);
    assert_eq!(bars.horizontal.range, 210);
    assert_eq!(bars.vertical.position, 5);
    assert_eq!(bars.vertical.range, 110);

    plot.on_scroll(ScrollOrientation::Horizontal, ScrollAction::Top);
    assert_relative_eq!(plot.pos_x(), -0.5, epsilon = 1e-9);
    let bars = plot.scrollbars().expect("scrollbars enabled");
    assert_eq!(bars.horizontal.position, 0);

    plot.on_scroll(ScrollOrientation::Vertical, ScrollAction::LineDown);
    assert_relative_eq!(plot.pos_y(), 9.5, epsilon = 1e-9);
}

#[test]
fn left_drag_on_overlay_moves_it_instead_of_zooming() {
    let mut plot = window();
    let id = plot.add_layer(
        InfoOverlay::new(PixelRect::new(10, 10, 50, 30), Brush::Transparent),
        false,
    );
    let view = *plot.view();

    plot.on_left_down(20, 20);
    assert!(matches!(
        plot.interaction_state().gesture(),
        Gesture::DraggingInfo { layer, .. } if layer == id
    ));
    plot.on_pointer_move(40, 50);
    assert_eq!(plot.on_left_up(40, 50), InteractionOutcome::Redraw);

    let rect = |plot: &PlotWindow| {
        plot.layer(id)
            .and_then(|layer| layer.as_info())
            .map(|info| info.rect())
            .expect("overlay exists")
    };
    assert_eq!(rect(&plot), PixelRect::new(30, 40, 50, 30));
    assert_eq!(*plot.view(), view);

    // A second drag starts from where the first one ended.
    plot.on_left_down(35, 45);
    plot.on_pointer_move(45, 45);
    plot.on_left_up(45, 45);
    assert_eq!(rect(&plot), PixelRect::new(40, 40, 50, 30));
}

#[test]
fn removing_the_dragged_overlay_ends_the_drag() {
    let mut plot = window();
    let id = plot.add_layer(
        InfoOverlay::new(PixelRect::new(10, 10, 50, 30), Brush::Transparent),
        false,
    );
    plot.on_left_down(20, 20);
    plot.remove_layer(id, true);

    assert_eq!(plot.interaction_state().gesture(), Gesture::Idle);
}

#[test]
fn hover_refreshes_every_overlay_in_one_region() {
    let mut plot = window();
    let coords = plot.add_layer(
        CoordinatesInfo::new(PixelRect::new(10, 10, 10, 10), Brush::Transparent),
        false,
    );
    plot.add_layer(
        InfoOverlay::new(PixelRect::new(50, 60, 5, 5), Brush::Transparent),
        false,
    );

    assert_eq!(
        plot.on_pointer_move(50, 20),
        InteractionOutcome::RefreshRegion(PixelRect::new(10, 10, 45, 55))
    );
    let readout = plot
        .layer_as::<CoordinatesInfo>(coords)
        .expect("coordinates layer")
        .content();
    assert_eq!(readout, "x = 5.000000\ny = 8.000000");
}
