use crate::math::vec2::Vec2;
use crate::objects::rigid_body::RigidBody;

/// First half of a Semi-Implicit Euler step: gravity goes into the velocity.
pub fn integrate_velocity(body: &mut RigidBody, gravity: Vec2, dt: f64) {
    if body.is_static() {
        return;
    }

    body.linear_velocity += gravity * dt;
}

/// Second half: positions and rotation follow the (already resolved) velocities.
pub fn integrate_position(body: &mut RigidBody, dt: f64) {
    if body.is_static() {
        return;
    }

    body.position += body.linear_velocity * dt;
    body.rotation = wrap_angle(body.rotation + body.angular_velocity * dt);
}

/// Wraps an angle in radians to the range [-PI, PI].
fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
