//! Positions, bounding boxes and the overlap test shared by every entity.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector scaled to `speed`, or `None` for a zero-length vector.
    pub fn scaled_to(&self, speed: f32) -> Option<Vec2> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Vec2::new(self.x / len * speed, self.y / len * speed))
    }
}

/// Axis-aligned box in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        overlaps(*self, *other)
    }
}

/// Inclusive overlap: boxes that share an edge count as colliding.
pub fn overlaps(a: BoundingBox, b: BoundingBox) -> bool {
    a.bottom >= b.top && a.top <= b.bottom && a.right >= b.left && a.left <= b.right
}

/// Position, size and per-tick velocity of anything that moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: Vec2,
}

impl Entity {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity: Vec2::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn advance(&mut self) {
        self.x += self.velocity.x;
        self.y += self.velocity.y;
    }

    /// True once the whole box has left the `width` x `height` canvas.
    pub fn is_outside(&self, width: f32, height: f32) -> bool {
        self.y + self.height < 0.0
            || self.y > height
            || self.x + self.width < 0.0
            || self.x > width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let below = BoundingBox::new(0.0, 10.0, 10.0, 10.0);
        let right = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, below));
        assert!(overlaps(a, right));
        assert!(overlaps(below, a));
    }

    #[test]
    fn separated_boxes_do_not_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.5, 0.0, 10.0, 10.0);
        let c = BoundingBox::new(0.0, 10.01, 10.0, 10.0);
        assert!(!overlaps(a, b));
        assert!(!overlaps(a, c));
    }

    #[test]
    fn contained_box_overlaps() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = BoundingBox::new(40.0, 40.0, 4.0, 12.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(Vec2::new(0.0, 0.0).scaled_to(5.0), None);
        let v = Vec2::new(3.0, 4.0).scaled_to(10.0).unwrap();
        assert!((v.x - 6.0).abs() < 1e-5);
        assert!((v.y - 8.0).abs() < 1e-5);
    }

    #[test]
    fn entity_leaves_canvas_only_when_fully_out() {
        let mut e = Entity::new(10.0, -11.0, 4.0, 12.0);
        assert!(!e.is_outside(100.0, 100.0));
        e.y = -12.5;
        assert!(e.is_outside(100.0, 100.0));
        let side = Entity::new(101.0, 50.0, 4.0, 4.0);
        assert!(side.is_outside(100.0, 100.0));
    }
}
