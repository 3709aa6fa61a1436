//! Surface properties consulted by the contact solver.

/// Represents the physical properties of a rigid body affecting collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Elasticity in [0, 1]. A contact's restitution is the product of both sides.
    pub restitution: f64,
}

impl Material {
    /// Creates a material with the given elasticity, clamped to [0, 1].
    pub fn elastic(restitution: f64) -> Self {
        Material {
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    pub fn combine(&self, other: &Material) -> Material {
        Material {
            restitution: self.restitution * other.restitution,
        }
    }
}

impl Default for Material {
    /// Perfectly inelastic.
    fn default() -> Self {
        Material { restitution: 0.0 }
    }
}
