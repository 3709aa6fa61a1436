pub mod app;
pub mod collision;
pub mod common;
pub mod integration;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use common::Material;
pub use math::vec2::Vec2;
pub use objects::rigid_body::RigidBody;
pub use shapes::{LineSegment, Polygon, Shape};
pub use world::{PhysicsWorld, Space};
