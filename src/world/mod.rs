pub mod physics_world;
pub mod space;

pub use physics_world::PhysicsWorld;
pub use space::{BodyHandle, BoxDesc, DebugShape, Outline, PostSolveHandler, Space};
