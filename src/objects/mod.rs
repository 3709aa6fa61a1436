pub mod rigid_body;

pub use rigid_body::{RigidBody, DEFAULT_COLLISION_TYPE};
