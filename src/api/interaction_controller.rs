use tracing::trace;

use crate::core::{DeviceSize, PixelPoint, PixelRect};
use crate::interaction::{
    ContextCommand, Gesture, InteractionOutcome, MOUSE_HELP_TEXT, Modifiers, ScrollAction,
    ScrollOrientation,
};
use crate::render::DrawContext;

use super::PlotWindow;
use super::scrollbar::scroll_view_to;

impl PlotWindow {
    pub fn on_paint(&mut self, ctx: &mut dyn DrawContext) {
        self.render(ctx);
    }

    /// Host resize: keeps the requested data rectangle in view.
    pub fn on_resize(&mut self, size: DeviceSize) -> InteractionOutcome {
        if self.set_screen_size(size).is_err() {
            return InteractionOutcome::None;
        }
        self.fit_bounds(self.view.desired());
        InteractionOutcome::Redraw
    }

    /// Starts an overlay drag when the press lands on an info overlay,
    /// otherwise a rubber-band zoom.
    pub fn on_left_down(&mut self, x: i32, y: i32) -> InteractionOutcome {
        let at = PixelPoint::new(x, y);
        self.interaction.set_pointer(at);
        if !self.mouse_navigation {
            return InteractionOutcome::None;
        }
        let gesture = match self.info_layer_at(at) {
            Some(layer) => Gesture::DraggingInfo { layer, origin: at },
            None => Gesture::RubberBand {
                origin: at,
                current: at,
            },
        };
        trace!(x, y, ?gesture, "left press");
        self.interaction.set_gesture(gesture);
        InteractionOutcome::None
    }

    pub fn on_left_up(&mut self, x: i32, y: i32) -> InteractionOutcome {
        let release = PixelPoint::new(x, y);
        self.interaction.set_pointer(release);
        let gesture = self.interaction.gesture();
        match gesture {
            Gesture::DraggingInfo { layer, .. } => {
                self.interaction.set_gesture(Gesture::Idle);
                if let Some(info) = self.layer_mut(layer).and_then(|layer| layer.as_info_mut()) {
                    info.update_reference();
                }
                InteractionOutcome::Redraw
            }
            Gesture::RubberBand { origin, .. } => {
                self.interaction.set_gesture(Gesture::Idle);
                if origin == release {
                    return InteractionOutcome::None;
                }
                trace!(?origin, ?release, "zoom to marked area");
                self.zoom_to_rect(origin, release);
                InteractionOutcome::Redraw
            }
            Gesture::Idle | Gesture::Panning { .. } => InteractionOutcome::None,
        }
    }

    pub fn on_right_down(&mut self, x: i32, y: i32) -> InteractionOutcome {
        let at = PixelPoint::new(x, y);
        self.interaction.set_pointer(at);
        self.interaction.on_right_down(at);
        InteractionOutcome::None
    }

    /// A release without any pan motion asks for the context menu.
    pub fn on_right_up(&mut self, x: i32, y: i32) -> InteractionOutcome {
        self.menu_button_up(x, y)
    }

    pub fn on_middle_up(&mut self, x: i32, y: i32) -> InteractionOutcome {
        self.menu_button_up(x, y)
    }

    fn menu_button_up(&mut self, x: i32, y: i32) -> InteractionOutcome {
        let at = PixelPoint::new(x, y);
        self.interaction.set_pointer(at);
        match self.interaction.on_menu_button_up(at) {
            Some(anchor) => InteractionOutcome::ShowContextMenu {
                x: anchor.x,
                y: anchor.y,
            },
            None => InteractionOutcome::None,
        }
    }

    pub fn on_pointer_move(&mut self, x: i32, y: i32) -> InteractionOutcome {
        let at = PixelPoint::new(x, y);
        self.interaction.set_pointer(at);
        if !self.mouse_navigation {
            return InteractionOutcome::None;
        }

        match self.interaction.gesture() {
            Gesture::Panning { .. } => {
                let Some(delta) = self.interaction.on_pan_motion(at) else {
                    return InteractionOutcome::None;
                };
                trace!(dx = delta.x, dy = delta.y, "pan");
                self.pan_by_pixels(f64::from(delta.x), f64::from(delta.y));
                InteractionOutcome::Redraw
            }
            Gesture::RubberBand { origin, .. } => {
                self.interaction.set_gesture(Gesture::RubberBand {
                    origin,
                    current: at,
                });
                InteractionOutcome::Redraw
            }
            Gesture::DraggingInfo { layer, origin } => {
                let delta = PixelPoint::new(at.x - origin.x, at.y - origin.y);
                if let Some(info) = self.layer_mut(layer).and_then(|layer| layer.as_info_mut()) {
                    info.move_by(delta);
                }
                InteractionOutcome::Redraw
            }
            Gesture::Idle => self.refresh_info_layers(at),
        }
    }

    /// Lets every visible overlay track the pointer and reports the area to
    /// repaint.
    fn refresh_info_layers(&mut self, at: PixelPoint) -> InteractionOutcome {
        let view = &self.view;
        let mut region: Option<PixelRect> = None;
        for layer in self.layers.values_mut() {
            if !layer.is_visible() {
                continue;
            }
            let Some(info) = layer.as_info_mut() else {
                continue;
            };
            info.update_info(view, at);
            let rect = info.rect();
            region = Some(region.map_or(rect, |region| union_rect(region, rect)));
        }
        region.map_or(InteractionOutcome::None, InteractionOutcome::RefreshRegion)
    }

    /// CTRL zooms around the pointer, SHIFT scrolls horizontally, a plain
    /// wheel scrolls vertically.
    pub fn on_wheel(
        &mut self,
        x: i32,
        y: i32,
        rotation: i32,
        modifiers: Modifiers,
    ) -> InteractionOutcome {
        if !self.mouse_navigation {
            return InteractionOutcome::None;
        }
        trace!(x, y, rotation, ?modifiers, "wheel");
        if modifiers.control {
            let center = Some(PixelPoint::new(x, y));
            if rotation > 0 {
                self.zoom_in(center);
            } else {
                self.zoom_out(center);
            }
            return InteractionOutcome::Redraw;
        }

        let change = -f64::from(rotation);
        if modifiers.shift {
            self.view.translate(change / self.view.scale_x(), 0.0);
        } else {
            self.view.translate(0.0, -change / self.view.scale_y());
        }
        self.update_all();
        InteractionOutcome::Redraw
    }

    /// Applies a scrollbar event; ignored while scrollbars are disabled.
    pub fn on_scroll(
        &mut self,
        orientation: ScrollOrientation,
        action: ScrollAction,
    ) -> InteractionOutcome {
        if !self.scrollbars_enabled {
            return InteractionOutcome::None;
        }
        let position = self.scrollbars.get(orientation).target(action);
        trace!(?orientation, ?action, position, "scroll");
        scroll_view_to(&mut self.view, self.content_bounds, orientation, position);
        self.update_all();
        InteractionOutcome::Redraw
    }

    /// Runs a context-menu entry chosen after `ShowContextMenu`.
    pub fn execute_command(&mut self, command: ContextCommand) -> InteractionOutcome {
        trace!(?command, "context command");
        match command {
            ContextCommand::Center => {
                let anchor = self.interaction.menu_anchor();
                let half_width = self.view.plot_width() / 2;
                let half_height = self.view.plot_height() / 2;
                let pos_x = self.view.p2x(anchor.x - half_width);
                let pos_y = self.view.p2y(anchor.y - half_height);
                self.set_pos(pos_x, pos_y);
            }
            ContextCommand::Fit => {
                self.auto_fit();
            }
            ContextCommand::ZoomIn => self.zoom_in(Some(self.interaction.right_click())),
            ContextCommand::ZoomOut => self.zoom_out(None),
            ContextCommand::ToggleLockAspect => self.lock_aspect(!self.is_aspect_locked()),
            ContextCommand::MouseHelp => return InteractionOutcome::ShowHelp(MOUSE_HELP_TEXT),
        }
        InteractionOutcome::Redraw
    }
}

fn union_rect(a: PixelRect, b: PixelRect) -> PixelRect {
    let left = a.x.min(b.x);
    let top = a.y.min(b.y);
    let right = (a.x + a.width).max(b.x + b.width);
    let bottom = (a.y + a.height).max(b.y + b.height);
    PixelRect::new(left, top, right - left, bottom - top)
}
