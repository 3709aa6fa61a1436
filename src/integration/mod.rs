pub mod integrator;

pub use integrator::{integrate_position, integrate_velocity};
