use crate::collision::CollisionManifold;
use crate::math::vec2::Vec2;

/// Index of a body inside the space that created it.
pub type BodyHandle = usize;

/// Callback invoked after the solver has resolved a contact between two tagged bodies.
pub type PostSolveHandler = Box<dyn FnMut(&CollisionManifold)>;

/// Description of a dynamic square body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxDesc {
    pub mass: f64,
    pub half_extent: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub elasticity: f64,
    pub collision_type: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Segment { a: Vec2, b: Vec2, radius: f64 },
    Polygon(Vec<Vec2>),
}

/// World-space outline of one body, for debug drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugShape {
    pub body: BodyHandle,
    pub is_static: bool,
    pub outline: Outline,
}

/// The narrow surface a simulation needs from a physics engine.
pub trait Space {
    /// Adds an immovable segment. `thickness` is the skin radius around the centre line.
    fn add_segment(&mut self, start: Vec2, end: Vec2, thickness: f64, elasticity: f64) -> BodyHandle;

    fn add_box(&mut self, desc: BoxDesc) -> BodyHandle;

    fn set_gravity(&mut self, gravity: Vec2);

    /// Registers `handler` for contacts between bodies tagged `tag_a` and `tag_b`, in either order.
    fn add_post_solve_handler(&mut self, tag_a: u32, tag_b: u32, handler: PostSolveHandler);

    fn step(&mut self, dt: f64);

    fn debug_shapes(&self) -> Vec<DebugShape>;

    fn body_position(&self, handle: BodyHandle) -> Option<Vec2>;

    fn body_velocity(&self, handle: BodyHandle) -> Option<Vec2>;
}
