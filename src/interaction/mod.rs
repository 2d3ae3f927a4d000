use serde::{Deserialize, Serialize};

use crate::core::{PixelPoint, PixelRect};
use crate::layers::LayerId;

/// Text shown for [`ContextCommand::MouseHelp`].
pub const MOUSE_HELP_TEXT: &str = "Supported mouse commands:\n\
    - Left button down + mark area: rectangular zoom\n\
    - Right button down + move: pan\n\
    - Wheel: vertical scroll\n\
    - Wheel + SHIFT: horizontal scroll\n\
    - Wheel + CTRL: zoom in/out";

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        control: false,
        shift: false,
    };
    pub const CONTROL: Self = Self {
        control: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        control: false,
        shift: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollOrientation {
    Horizontal,
    Vertical,
}

/// Scrollbar event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollAction {
    ThumbTrack(i32),
    PageUp,
    PageDown,
    LineUp,
    LineDown,
    Top,
    Bottom,
}

/// Entries of the plot context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextCommand {
    Center,
    Fit,
    ZoomIn,
    ZoomOut,
    ToggleLockAspect,
    MouseHelp,
}

impl ContextCommand {
    pub const ALL: [Self; 6] = [
        Self::Center,
        Self::Fit,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ToggleLockAspect,
        Self::MouseHelp,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::Fit => "Fit",
            Self::ZoomIn => "Zoom in",
            Self::ZoomOut => "Zoom out",
            Self::ToggleLockAspect => "Lock aspect",
            Self::MouseHelp => "Show mouse commands...",
        }
    }
}

/// What the host should do after an input handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    None,
    /// Repaint the whole window.
    Redraw,
    /// Repaint only this device rectangle.
    RefreshRegion(PixelRect),
    /// Pop the context menu up at this device position.
    ShowContextMenu { x: i32, y: i32 },
    /// Present this help text to the user.
    ShowHelp(&'static str),
}

impl InteractionOutcome {
    #[must_use]
    pub fn needs_repaint(self) -> bool {
        matches!(self, Self::Redraw | Self::RefreshRegion(_))
    }
}

/// Gesture in progress between a button press and its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Left drag outside any overlay; the release zooms to the marked area.
    RubberBand { origin: PixelPoint, current: PixelPoint },
    /// Left drag that started inside an info overlay.
    DraggingInfo { layer: LayerId, origin: PixelPoint },
    /// Right button held; motion pans the view.
    Panning { last: PixelPoint },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    gesture: Gesture,
    moved_after_right_click: bool,
    right_click: PixelPoint,
    menu_anchor: PixelPoint,
    pointer: PixelPoint,
}

impl InteractionState {
    #[must_use]
    pub fn gesture(self) -> Gesture {
        self.gesture
    }

    pub fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    /// Last pointer position seen by any handler.
    #[must_use]
    pub fn pointer(self) -> PixelPoint {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: PixelPoint) {
        self.pointer = pointer;
    }

    /// Position of the right press that opened the current pan or menu.
    #[must_use]
    pub fn right_click(self) -> PixelPoint {
        self.right_click
    }

    /// Position where the context menu was last requested.
    #[must_use]
    pub fn menu_anchor(self) -> PixelPoint {
        self.menu_anchor
    }

    #[must_use]
    pub fn moved_after_right_click(self) -> bool {
        self.moved_after_right_click
    }

    pub fn on_right_down(&mut self, at: PixelPoint) {
        self.moved_after_right_click = false;
        self.right_click = at;
        self.gesture = Gesture::Panning { last: at };
    }

    /// Returns the pan delta (previous minus current position) while panning.
    pub fn on_pan_motion(&mut self, at: PixelPoint) -> Option<PixelPoint> {
        let Gesture::Panning { last } = self.gesture else {
            return None;
        };
        self.moved_after_right_click = true;
        self.gesture = Gesture::Panning { last: at };
        Some(PixelPoint::new(last.x - at.x, last.y - at.y))
    }

    /// Ends a right or middle click; returns the menu anchor when it was a
    /// click rather than a drag.
    pub fn on_menu_button_up(&mut self, at: PixelPoint) -> Option<PixelPoint> {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
        if self.moved_after_right_click {
            return None;
        }
        self.menu_anchor = at;
        Some(at)
    }

    /// Current rubber-band rectangle, if a zoom drag is running.
    #[must_use]
    pub fn rubber_band(self) -> Option<PixelRect> {
        match self.gesture {
            Gesture::RubberBand { origin, current } => Some(PixelRect::new(
                origin.x,
                origin.y,
                current.x - origin.x,
                current.y - origin.y,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Gesture, InteractionState};
    use crate::core::{PixelPoint, PixelRect};

    #[test]
    fn right_click_without_motion_requests_menu() {
        let mut state = InteractionState::default();
        state.on_right_down(PixelPoint::new(10, 20));
        assert_eq!(
            state.on_menu_button_up(PixelPoint::new(10, 20)),
            Some(PixelPoint::new(10, 20))
        );
        assert_eq!(state.gesture(), Gesture::Idle);
    }

    #[test]
    fn right_drag_pans_and_suppresses_menu() {
        let mut state = InteractionState::default();
        state.on_right_down(PixelPoint::new(10, 20));
        assert_eq!(
            state.on_pan_motion(PixelPoint::new(15, 18)),
            Some(PixelPoint::new(-5, 2))
        );
        assert_eq!(
            state.on_pan_motion(PixelPoint::new(16, 18)),
            Some(PixelPoint::new(-1, 0))
        );
        assert_eq!(state.on_menu_button_up(PixelPoint::new(16, 18)), None);
    }

    #[test]
    fn rubber_band_may_extend_up_and_left() {
        let mut state = InteractionState::default();
        state.set_gesture(Gesture::RubberBand {
            origin: PixelPoint::new(50, 50),
            current: PixelPoint::new(20, 30),
        });
        assert_eq!(state.rubber_band(), Some(PixelRect::new(50, 50, -30, -20)));
    }
}
