use crate::math::vec2::Vec2;

/// A line segment with a rounded skin of `radius` on both sides.
/// Collision treats it as the slab `[a, b]` thickened by `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f64,
}

impl LineSegment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b, radius: 0.0 }
    }

    pub fn with_radius(a: Vec2, b: Vec2, radius: f64) -> Self {
        assert!(radius >= 0.0, "Segment radius cannot be negative");
        Self { a, b, radius }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) / 2.0
    }

    /// Returns the direction vector of the line segment (from a to b).
    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    /// The four corners of the thickened segment, given already-transformed endpoints.
    /// Returns `None` for a zero-length segment.
    pub fn slab_corners(a: Vec2, b: Vec2, radius: f64) -> Option<[Vec2; 4]> {
        let dir = b - a;
        if dir.magnitude_squared() < 1e-12 {
            return None;
        }
        let offset = dir.perpendicular().normalize() * radius;
        Some([a + offset, b + offset, b - offset, a - offset])
    }
}
