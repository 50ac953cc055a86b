use super::vector::Vec2;

/// Axis-aligned box stored as a minimum corner plus a size.
///
/// Invariant: `min <= min + size` on both axes. The constructors normalize
/// corner order; the `*_unchecked` mutators do not, and callers must hand them
/// already-sorted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionBox {
    min: Vec2,
    size: Vec2,
}

impl CollisionBox {
    /// Builds a box from a corner and a possibly negative size.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        let (min_x, size_x) = normalize_axis(position.x, size.x);
        let (min_y, size_y) = normalize_axis(position.y, size.y);
        Self {
            min: Vec2::new(min_x, min_y),
            size: Vec2::new(size_x, size_y),
        }
    }

    /// Builds a box spanning two arbitrary opposite corners.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::new(a, b - a)
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Zero-area, NaN-bearing or infinite boxes never collide with anything.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.size.is_finite())
            || self.size.x <= 0.0
            || self.size.y <= 0.0
    }

    /// Strict overlap: boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &CollisionBox) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// The shortest single-axis displacement that moves `self` out of `other`,
    /// or `None` when they don't overlap. Ties resolve vertically.
    pub fn minimum_translation(&self, other: &CollisionBox) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }

        let overlap_x = self.right().min(other.right()) - self.left().max(other.left());
        let overlap_y = self.bottom().min(other.bottom()) - self.top().max(other.top());

        if overlap_x < overlap_y {
            let push = if self.center().x < other.center().x {
                -overlap_x
            } else {
                overlap_x
            };
            Some(Vec2::new(push, 0.0))
        } else {
            let push = if self.center().y < other.center().y {
                -overlap_y
            } else {
                overlap_y
            };
            Some(Vec2::new(0.0, push))
        }
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        let mut moved = *self;
        moved.move_by_unchecked(delta);
        moved
    }

    /// A strip of height `depth` directly beneath this box, used to test what
    /// the box is standing on.
    pub fn footprint(&self, depth: f32) -> Self {
        Self::new(Vec2::new(self.left(), self.bottom()), Vec2::new(self.size.x, depth))
    }

    pub fn move_by_unchecked(&mut self, delta: Vec2) {
        self.min += delta;
    }

    pub fn resize_unchecked(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn teleport_unchecked(&mut self, min: Vec2) {
        self.min = min;
    }
}

fn normalize_axis(start: f32, length: f32) -> (f32, f32) {
    if length < 0.0 {
        (start + length, -length)
    } else {
        (start, length)
    }
}
