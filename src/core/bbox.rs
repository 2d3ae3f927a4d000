use serde::{Deserialize, Serialize};

/// Axis-aligned data-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Tight box around a point cloud, `None` for an empty cloud.
    #[must_use]
    pub fn from_points(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let (&x0, &y0) = (xs.first()?, ys.first()?);
        let mut bbox = Self::new(x0, x0, y0, y0);
        for &x in xs {
            bbox.min_x = bbox.min_x.min(x);
            bbox.max_x = bbox.max_x.max(x);
        }
        for &y in ys {
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Grows the box by `amount` on every side.
    #[must_use]
    pub fn padded(self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            max_x: self.max_x + amount,
            min_y: self.min_y - amount,
            max_y: self.max_y + amount,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;

    #[test]
    fn union_takes_outer_extent() {
        let a = BoundingBox::new(0.0, 10.0, 0.0, 5.0);
        let b = BoundingBox::new(-2.0, 3.0, 1.0, 8.0);
        assert_eq!(a.union(b), BoundingBox::new(-2.0, 10.0, 0.0, 8.0));
    }

    #[test]
    fn empty_cloud_has_no_box() {
        assert!(BoundingBox::from_points(&[], &[]).is_none());
    }
}
