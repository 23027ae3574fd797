//! Forces acting on the ball.
//!
//! Only uniform gravity is modeled: no drag, no lift, no spin.

use crate::integrator::ForceModel;
use crate::types::{RigidBody, Vec3};

/// Constant acceleration field, independent of body state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGravity {
    pub gravity: Vec3,
}

impl UniformGravity {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }
}

impl ForceModel for UniformGravity {
    fn acceleration(&self, _body: &RigidBody) -> Vec3 {
        self.gravity
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_ignores_state() {
        let forces = UniformGravity::new(Vec3::new(0.0, -9.8, 0.0));
        let mut body = RigidBody::new(1.0).unwrap();
        let at_rest = forces.acceleration(&body);

        body.set_state(Vec3::new(5.0, 100.0, -2.0), Vec3::new(3.0, -40.0, 1.0));
        let moving = forces.acceleration(&body);

        assert_eq!(at_rest, moving);
        assert_eq!(moving, Vec3::new(0.0, -9.8, 0.0));
    }
}
