//! GTK4 wiring for a [`PlotWindow`].
//!
//! The adapter owns a `DrawingArea`, paints the window through a
//! [`CairoContext`] and forwards button, motion, wheel and resize events.
//! Outcomes that the widget cannot act on itself (context menu, help text)
//! go to an optional host callback.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk::gdk::ModifierType;
use gtk::prelude::*;
use tracing::warn;

use crate::api::PlotWindow;
use crate::core::DeviceSize;
use crate::core::transform::to_device;
use crate::interaction::{InteractionOutcome, Modifiers};
use crate::render::CairoContext;

/// Shared handle used by GTK callbacks.
pub type SharedPlotWindow = Rc<RefCell<PlotWindow>>;

type OutcomeHandler = Rc<RefCell<Option<Box<dyn Fn(InteractionOutcome)>>>>;

/// Wheel units per GTK scroll step.
const WHEEL_DELTA: f64 = 120.0;

pub struct GtkPlotAdapter {
    window: SharedPlotWindow,
    drawing_area: gtk::DrawingArea,
    outcome_handler: OutcomeHandler,
}

impl GtkPlotAdapter {
    #[must_use]
    pub fn new(window: PlotWindow) -> Self {
        let adapter = Self {
            window: Rc::new(RefCell::new(window)),
            drawing_area: gtk::DrawingArea::new(),
            outcome_handler: Rc::new(RefCell::new(None)),
        };
        adapter.drawing_area.set_hexpand(true);
        adapter.drawing_area.set_vexpand(true);
        adapter.attach_draw_func();
        adapter.attach_buttons();
        adapter.attach_motion();
        adapter.attach_wheel();
        adapter.attach_resize();
        adapter
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn window(&self) -> SharedPlotWindow {
        Rc::clone(&self.window)
    }

    /// Receives context-menu and help requests produced by input handlers.
    pub fn set_outcome_handler(&self, handler: impl Fn(InteractionOutcome) + 'static) {
        *self.outcome_handler.borrow_mut() = Some(Box::new(handler));
    }

    fn attach_draw_func(&self) {
        let window = Rc::clone(&self.window);
        self.drawing_area.set_draw_func(move |_area, context, width, height| {
            let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
                return;
            };
            let Ok(mut plot) = window.try_borrow_mut() else {
                return;
            };
            let mut ctx = CairoContext::new(context.clone(), DeviceSize::new(width, height));
            plot.render(&mut ctx);
            if let Some(err) = ctx.take_error() {
                warn!(error = %err, "plot paint failed");
            }
        });
    }

    fn attach_buttons(&self) {
        let click = gtk::GestureClick::new();
        click.set_button(0);
        {
            let dispatch = self.dispatcher();
            click.connect_pressed(move |gesture, _n_press, x, y| {
                let (x, y) = (to_device(x), to_device(y));
                dispatch(&|plot: &mut PlotWindow| match gesture.current_button() {
                    1 => plot.on_left_down(x, y),
                    3 => plot.on_right_down(x, y),
                    _ => InteractionOutcome::None,
                });
            });
        }
        {
            let dispatch = self.dispatcher();
            click.connect_released(move |gesture, _n_press, x, y| {
                let (x, y) = (to_device(x), to_device(y));
                dispatch(&|plot: &mut PlotWindow| match gesture.current_button() {
                    1 => plot.on_left_up(x, y),
                    2 => plot.on_middle_up(x, y),
                    3 => plot.on_right_up(x, y),
                    _ => InteractionOutcome::None,
                });
            });
        }
        self.drawing_area.add_controller(click);
    }

    fn attach_motion(&self) {
        let motion = gtk::EventControllerMotion::new();
        let dispatch = self.dispatcher();
        motion.connect_motion(move |_, x, y| {
            let (x, y) = (to_device(x), to_device(y));
            dispatch(&|plot: &mut PlotWindow| plot.on_pointer_move(x, y));
        });
        self.drawing_area.add_controller(motion);
    }

    fn attach_wheel(&self) {
        let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::BOTH_AXES);
        let dispatch = self.dispatcher();
        scroll.connect_scroll(move |controller, dx, dy| {
            let state = controller.current_event_state();
            let modifiers = Modifiers {
                control: state.contains(ModifierType::CONTROL_MASK),
                shift: state.contains(ModifierType::SHIFT_MASK),
            };
            let delta = if dy.abs() > f64::EPSILON { dy } else { dx };
            // GTK reports scrolling up as a negative delta.
            let rotation = to_device(-delta * WHEEL_DELTA);
            dispatch(&|plot: &mut PlotWindow| {
                let pointer = plot.interaction_state().pointer();
                plot.on_wheel(pointer.x, pointer.y, rotation, modifiers)
            });
            gtk::glib::Propagation::Stop
        });
        self.drawing_area.add_controller(scroll);
    }

    fn attach_resize(&self) {
        let dispatch = self.dispatcher();
        self.drawing_area.connect_resize(move |_, width, height| {
            let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
                return;
            };
            dispatch(&|plot: &mut PlotWindow| plot.on_resize(DeviceSize::new(width, height)));
        });
    }

    /// Runs a handler against the window and reacts to its outcome.
    fn dispatcher(&self) -> impl Fn(&dyn Fn(&mut PlotWindow) -> InteractionOutcome) + 'static {
        let window = Rc::clone(&self.window);
        let area = self.drawing_area.clone();
        let handler = Rc::clone(&self.outcome_handler);
        move |event: &dyn Fn(&mut PlotWindow) -> InteractionOutcome| {
            let outcome = match window.try_borrow_mut() {
                Ok(mut plot) => event(&mut *plot),
                Err(_) => return,
            };
            if outcome.needs_repaint() {
                area.queue_draw();
            }
            if matches!(
                outcome,
                InteractionOutcome::ShowContextMenu { .. } | InteractionOutcome::ShowHelp(_)
            ) {
                if let Some(callback) = handler.borrow().as_ref() {
                    callback(outcome);
                }
            }
        }
    }
}
