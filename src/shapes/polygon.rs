use crate::math::vec2::Vec2;

/// A convex polygon defined by its vertices in local space.
/// Vertices must be ordered consistently; either winding works.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    ///
    /// Panics if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        if vertices.len() < 3 {
            panic!("Polygon must have at least 3 vertices.");
        }
        Polygon { vertices }
    }

    /// Axis-aligned box centred on the local origin.
    pub fn new_box(half_width: f64, half_height: f64) -> Self {
        Polygon::new(vec![
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ])
    }

    /// Area by the shoelace formula.
    pub fn calculate_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut area = 0.0;
        for i in 0..n {
            area += self.vertices[i].cross(self.vertices[(i + 1) % n]);
        }
        (area / 2.0).abs()
    }

    /// Centroid (center of mass for uniform density), by triangle fan from vertex 0.
    pub fn calculate_centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        let origin = self.vertices[0];
        let mut centroid = Vec2::ZERO;
        let mut signed_area_sum = 0.0;

        for i in 1..(n - 1) {
            let v2 = self.vertices[i];
            let v3 = self.vertices[i + 1];
            let triangle_signed_area = (v2 - origin).cross(v3 - origin) / 2.0;
            signed_area_sum += triangle_signed_area;
            centroid += (origin + v2 + v3) / 3.0 * triangle_signed_area;
        }

        if signed_area_sum.abs() < 1e-10 {
            // Degenerate (collinear) polygon: fall back to the vertex average.
            let sum = self.vertices.iter().fold(Vec2::ZERO, |acc, v| acc + *v);
            sum / n as f64
        } else {
            centroid / signed_area_sum
        }
    }

    /// Moment of inertia about the centroid for the given total mass.
    pub fn calculate_inertia(&self, mass: f64) -> f64 {
        let n = self.vertices.len();
        let centroid = self.calculate_centroid();

        // Second moment of area about the centroid, shoelace style.
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for i in 0..n {
            let v1 = self.vertices[i] - centroid;
            let v2 = self.vertices[(i + 1) % n] - centroid;
            let cross = v1.cross(v2).abs();
            numerator += cross * (v1.dot(v1) + v1.dot(v2) + v2.dot(v2));
            denominator += cross;
        }
        if denominator < 1e-12 {
            return 0.0;
        }
        mass * numerator / (6.0 * denominator)
    }
}
