//! Device-space clipping helpers shared by the plot layers.

/// Inclusive device rectangle a layer is allowed to draw into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBand {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl ClipBand {
    #[must_use]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn contains_y(self, y: i32) -> bool {
        y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn contains_x(self, x: i32) -> bool {
        x >= self.left && x <= self.right
    }

    #[must_use]
    pub fn clamp_y(self, y: i32) -> i32 {
        y.clamp(self.top, self.bottom.max(self.top))
    }
}

/// Device segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Segment {
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Parametric (Liang-Barsky) clipping of a segment against `band`.
///
/// The fractional intersection with each boundary shortens the segment; a
/// segment lying wholly outside returns `None`. Endpoints cut by a boundary
/// land exactly on that boundary's pixel.
#[must_use]
pub fn clip_segment(segment: Segment, band: ClipBand) -> Option<Segment> {
    let x0 = f64::from(segment.x0);
    let y0 = f64::from(segment.y0);
    let dx = f64::from(segment.x1) - x0;
    let dy = f64::from(segment.y1) - y0;

    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let mut enter_edge = None;
    let mut exit_edge = None;

    let edges = [
        (-dx, x0 - f64::from(band.left), Edge::Left),
        (dx, f64::from(band.right) - x0, Edge::Right),
        (-dy, y0 - f64::from(band.top), Edge::Top),
        (dy, f64::from(band.bottom) - y0, Edge::Bottom),
    ];

    for (p, q, edge) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t_exit {
                return None;
            }
            if t > t_enter {
                t_enter = t;
                enter_edge = Some(edge);
            }
        } else {
            if t < t_enter {
                return None;
            }
            if t < t_exit {
                t_exit = t;
                exit_edge = Some(edge);
            }
        }
    }

    let point_at = |t: f64, edge: Option<Edge>, fallback: (i32, i32)| -> (i32, i32) {
        let Some(edge) = edge else {
            return fallback;
        };
        let x = (x0 + t * dx).round() as i32;
        let y = (y0 + t * dy).round() as i32;
        match edge {
            Edge::Left => (band.left, y),
            Edge::Right => (band.right, y),
            Edge::Top => (x, band.top),
            Edge::Bottom => (x, band.bottom),
        }
    };

    let (cx0, cy0) = point_at(t_enter, enter_edge, (segment.x0, segment.y0));
    let (cx1, cy1) = point_at(t_exit, exit_edge, (segment.x1, segment.y1));
    Some(Segment::new(cx0, cy0, cx1, cy1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::{ClipBand, Segment, clip_segment};

    const BAND: ClipBand = ClipBand::new(10, 90, 20, 80);

    #[test]
    fn inside_segment_is_untouched() {
        let seg = Segment::new(15, 25, 85, 75);
        assert_eq!(clip_segment(seg, BAND), Some(seg));
    }

    #[test]
    fn segment_above_band_is_dropped() {
        assert_eq!(clip_segment(Segment::new(15, 5, 85, 10), BAND), None);
    }

    #[test]
    fn segment_crossing_top_is_cut_on_the_boundary() {
        let clipped = clip_segment(Segment::new(50, 50, 50, 0), BAND).expect("visible");
        assert_eq!(clipped, Segment::new(50, 50, 50, 20));
    }

    #[test]
    fn diagonal_crossing_left_and_bottom_is_shortened_on_both_ends() {
        let clipped = clip_segment(Segment::new(0, 40, 40, 100), BAND).expect("visible");
        assert_eq!((clipped.x0, clipped.y0), (10, 55));
        assert_eq!(clipped.y1, 80);
        assert!(clipped.x1 > 10 && clipped.x1 < 40);
    }

    #[test]
    fn degenerate_point_outside_is_dropped() {
        assert_eq!(clip_segment(Segment::new(5, 50, 5, 50), BAND), None);
    }
}
