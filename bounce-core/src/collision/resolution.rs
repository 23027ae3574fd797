//! Collision response for floor contacts.
//!
//! The floor is treated as infinitely massive and the impact as
//! instantaneous: only the vertical velocity changes, horizontal motion and
//! position are untouched.

use crate::types::RigidBody;

/// Reverse the vertical velocity and scale it by `restitution`.
///
/// `restitution = 1` keeps the full speed, `0` stops vertical motion dead.
pub fn resolve_rebound(body: &mut RigidBody, restitution: f64) {
    body.velocity.y = -body.velocity.y * restitution;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn falling(vy: f64) -> RigidBody {
        let mut body = RigidBody::new(1.0).unwrap();
        body.set_state(Vec3::new(1.0, 0.2, -4.0), Vec3::new(3.0, vy, -1.0));
        body
    }

    #[test]
    fn test_rebound_scales_by_restitution() {
        let mut body = falling(-4.0);
        resolve_rebound(&mut body, 0.75);
        assert_eq!(body.velocity.y, 3.0);
    }

    #[test]
    fn test_elastic_and_inelastic_limits() {
        let mut elastic = falling(-4.0);
        resolve_rebound(&mut elastic, 1.0);
        assert_eq!(elastic.velocity.y, 4.0);

        let mut dead = falling(-4.0);
        resolve_rebound(&mut dead, 0.0);
        assert_eq!(dead.velocity.y, 0.0);
    }

    #[test]
    fn test_other_components_untouched() {
        let mut body = falling(-4.0);
        resolve_rebound(&mut body, 0.5);
        assert_eq!(body.velocity.x, 3.0);
        assert_eq!(body.velocity.z, -1.0);
        assert_eq!(body.position, Vec3::new(1.0, 0.2, -4.0));
    }
}
