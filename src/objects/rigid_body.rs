use crate::collision::AABB;
use crate::common::Material;
use crate::math::{Transform, Vec2};
use crate::shapes::{LineSegment, Shape};

/// Collision tag for bodies nobody has registered a handler for.
pub const DEFAULT_COLLISION_TYPE: u32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    // Geometry
    pub shape: Shape,
    pub local_center_of_mass: Vec2, // Offset from shape's origin to center of mass
    pub material: Material,
    /// Tag matched against registered collision handlers.
    pub collision_type: u32,

    // Primary state
    pub position: Vec2, // World position of the center of mass
    pub rotation: f64,  // Radians
    pub linear_velocity: Vec2,
    pub angular_velocity: f64, // Radians per second

    pub mass: f64,
    pub inv_mass: f64, // 0.0 for static
    pub inertia: f64,
    pub inv_inertia: f64, // 0.0 for static / infinite inertia
}

impl RigidBody {
    /// Creates a dynamic body of the given total mass.
    /// Inertia and center of mass are derived from the shape assuming uniform density.
    /// A non-positive mass yields a static body placed at the origin.
    pub fn new_dynamic(mass: f64, shape: Shape) -> Self {
        if mass <= 0.0 {
            return Self::new_static(shape, Vec2::ZERO, 0.0);
        }

        let (inertia, local_com) = match &shape {
            Shape::Segment(segment) => {
                let length = segment.length();
                ((1.0 / 12.0) * mass * length * length, segment.midpoint())
            }
            Shape::Polygon(polygon) => (
                polygon.calculate_inertia(mass),
                polygon.calculate_centroid(),
            ),
        };
        let inv_inertia = if inertia.is_finite() && inertia > 0.0 {
            1.0 / inertia
        } else {
            0.0
        };

        Self {
            shape,
            local_center_of_mass: local_com,
            material: Material::default(),
            collision_type: DEFAULT_COLLISION_TYPE,
            position: Vec2::ZERO,
            rotation: 0.0,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass,
            inv_mass: 1.0 / mass,
            inertia,
            inv_inertia,
        }
    }

    /// Creates a new static RigidBody with the given shape.
    /// `position` is the world location of the shape's local origin; the body's
    /// `position` field stores the resulting world center of mass.
    pub fn new_static(shape: Shape, position: Vec2, rotation: f64) -> Self {
        let local_com = match &shape {
            Shape::Segment(segment) => segment.midpoint(),
            Shape::Polygon(polygon) => polygon.calculate_centroid(),
        };

        Self {
            shape,
            local_center_of_mass: local_com,
            material: Material::default(),
            collision_type: DEFAULT_COLLISION_TYPE,
            position: position + local_com.rotate(rotation),
            rotation,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: f64::INFINITY,
            inv_inertia: 0.0,
        }
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Local-to-world transform of the shape's frame.
    pub fn transform(&self) -> Transform {
        Transform::new(
            self.position - self.local_center_of_mass.rotate(self.rotation),
            self.rotation,
        )
    }

    /// World-space endpoints of a segment shape.
    pub fn world_segment(&self) -> Option<(Vec2, Vec2)> {
        match &self.shape {
            Shape::Segment(segment) => {
                let t = self.transform();
                Some((t.apply(segment.a), t.apply(segment.b)))
            }
            Shape::Polygon(_) => None,
        }
    }

    /// Convex outline of the body in world space, as used by the narrow phase.
    /// Segments become their thickened slab. `None` for a degenerate segment.
    pub fn world_hull(&self) -> Option<Vec<Vec2>> {
        let t = self.transform();
        match &self.shape {
            Shape::Polygon(polygon) => Some(polygon.vertices.iter().map(|&v| t.apply(v)).collect()),
            Shape::Segment(segment) => {
                let (a, b) = (t.apply(segment.a), t.apply(segment.b));
                LineSegment::slab_corners(a, b, segment.radius).map(|c| c.to_vec())
            }
        }
    }

    /// Calculates the world-space Axis-Aligned Bounding Box (AABB) for this body.
    pub fn calculate_aabb(&self) -> AABB {
        match &self.shape {
            Shape::Segment(segment) => {
                let t = self.transform();
                let skin = Vec2::new(segment.radius, segment.radius);
                let (a, b) = (t.apply(segment.a), t.apply(segment.b));
                let bounds = AABB::new(a, b);
                AABB::new(bounds.min - skin, bounds.max + skin)
            }
            Shape::Polygon(_) => self
                .world_hull()
                .and_then(|hull| AABB::from_points(&hull))
                .unwrap_or_else(|| AABB::new(self.position, self.position)),
        }
    }

    /// Velocity of the material point currently at `point_world`.
    pub fn velocity_at(&self, point_world: Vec2) -> Vec2 {
        self.linear_velocity + (point_world - self.position).cross_scalar(self.angular_velocity)
    }

    /// Applies an impulse at a world point, changing linear and angular velocity at once.
    pub fn apply_impulse(&mut self, impulse: Vec2, point_world: Vec2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += (point_world - self.position).cross(impulse) * self.inv_inertia;
    }
}
