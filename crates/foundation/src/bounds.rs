use crate::math::Vec2;

/// Axis-aligned rectangle in view-local pixels.
///
/// `min` is the top-left corner, `max` the bottom-right (y grows downwards).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Rect2 { min, max }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Rect2::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Builds a normalized rectangle from two arbitrary drag corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Rect2 {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    pub fn center(&self) -> Vec2 {
        self.min.lerp(self.max, 0.5)
    }

    pub fn translate(&self, by: Vec2) -> Self {
        Rect2::new(self.min + by, self.max + by)
    }

    /// Inclusive containment; NaN points are never contained.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamps `self` into `extent`. Returns `None` when the two do not overlap.
    pub fn clamp_to(&self, extent: &Rect2) -> Option<Self> {
        let min = Vec2::new(self.min.x.max(extent.min.x), self.min.y.max(extent.min.y));
        let max = Vec2::new(self.max.x.min(extent.max.x), self.max.y.min(extent.max.y));
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some(Rect2::new(min, max))
    }
}
