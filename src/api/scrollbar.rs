use serde::{Deserialize, Serialize};

use crate::core::transform::to_device;
use crate::core::{BoundingBox, ViewTransform};
use crate::interaction::{ScrollAction, ScrollOrientation};

/// Scroll distance of one line step, in device pixels.
pub const SCROLL_LINE_PX: i32 = 10;

/// Host scrollbar geometry in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollbarState {
    pub position: i32,
    pub thumb: i32,
    pub range: i32,
}

impl ScrollbarState {
    /// Thumb position after `action`, clamped the way host scrollbars clamp.
    #[must_use]
    pub fn target(self, action: ScrollAction) -> i32 {
        let last = self.range - self.thumb;
        match action {
            ScrollAction::ThumbTrack(position) => position,
            ScrollAction::PageUp => (self.position - self.thumb).max(0),
            ScrollAction::PageDown => (self.position + self.thumb).min(last),
            ScrollAction::LineUp => (self.position - SCROLL_LINE_PX).max(0),
            ScrollAction::LineDown => (self.position + SCROLL_LINE_PX).min(last),
            ScrollAction::Top => 0,
            ScrollAction::Bottom => last,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scrollbars {
    pub horizontal: ScrollbarState,
    pub vertical: ScrollbarState,
}

impl Scrollbars {
    #[must_use]
    pub fn get(self, orientation: ScrollOrientation) -> ScrollbarState {
        match orientation {
            ScrollOrientation::Horizontal => self.horizontal,
            ScrollOrientation::Vertical => self.vertical,
        }
    }

    /// Scrollable range spans both the content and the requested view.
    #[must_use]
    pub fn compute(view: &ViewTransform, content: BoundingBox) -> Self {
        let margins = view.margins();
        let desired = view.desired();

        let left_margin = f64::from(margins.left) / view.scale_x();
        let view_left = view.pos_x() + left_margin;
        let max_x = desired.max_x.max(content.max_x);
        let min_x = desired.min_x.min(content.min_x).min(view_left);
        let horizontal = ScrollbarState {
            position: to_device((view_left - min_x) * view.scale_x()),
            thumb: view.plot_width(),
            range: to_device((max_x - min_x) * view.scale_x()),
        };

        let top_margin = f64::from(margins.top) / view.scale_y();
        let view_top = view.pos_y() - top_margin;
        let max_y = desired.max_y.max(content.max_y).max(view_top);
        let min_y = desired.min_y.min(content.min_y);
        let vertical = ScrollbarState {
            position: to_device((max_y - view_top) * view.scale_y()),
            thumb: view.plot_height(),
            range: to_device((max_y - min_y) * view.scale_y()),
        };

        Self {
            horizontal,
            vertical,
        }
    }
}

/// Moves the view so the scrollbar thumb sits at `position`.
pub(crate) fn scroll_view_to(
    view: &mut ViewTransform,
    content: BoundingBox,
    orientation: ScrollOrientation,
    position: i32,
) {
    let desired = view.desired();
    match orientation {
        ScrollOrientation::Vertical => {
            let top_margin = f64::from(view.margins().top) / view.scale_y();
            let max_y = desired.max_y.max(content.max_y);
            view.set_pos_y(max_y - f64::from(position) / view.scale_y() + top_margin);
        }
        ScrollOrientation::Horizontal => {
            let left_margin = f64::from(view.margins().left) / view.scale_x();
            let min_x = desired.min_x.min(content.min_x);
            view.set_pos_x(min_x + f64::from(position) / view.scale_x() - left_margin);
        }
    }
}
