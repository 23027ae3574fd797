//! Sphere-vs-floor contact detection.

use serde::Serialize;

use crate::types::{RigidBody, StaticPlane};

/// Details of a contact that triggers a rebound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorContact {
    /// Distance from the ball's center to the floor (may be negative)
    pub separation: f64,
    /// How far the ball's bottom has sunk past the floor
    pub penetration: f64,
    /// Downward speed at the moment of contact
    pub impact_speed: f64,
}

/// Check whether the body is touching the floor and still moving into it.
///
/// Both conditions must hold: a ball inside the radius band that is already
/// moving upward is left alone, which stops it from being flipped back down
/// on the step after a rebound.
pub fn detect_floor_contact(body: &RigidBody, floor: &StaticPlane) -> Option<FloorContact> {
    let separation = body.position.y - floor.height();
    let approaching = body.velocity.y < 0.0;

    if separation < body.radius() && approaching {
        Some(FloorContact {
            separation,
            penetration: body.radius() - separation,
            impact_speed: -body.velocity.y,
        })
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn body_at(y: f64, vy: f64) -> RigidBody {
        let mut body = RigidBody::new(1.0).unwrap();
        body.set_state(Vec3::new(0.0, y, 0.0), Vec3::new(0.0, vy, 0.0));
        body
    }

    #[test]
    fn test_contact_when_close_and_falling() {
        let floor = StaticPlane::at_height(0.0);
        let contact = detect_floor_contact(&body_at(0.5, -2.0), &floor);

        let info = contact.expect("Should detect floor contact");
        assert_eq!(info.separation, 0.5);
        assert_eq!(info.penetration, 0.5);
        assert_eq!(info.impact_speed, 2.0);
    }

    #[test]
    fn test_no_contact_when_rising_inside_radius() {
        // Both conditions are required, not either one
        let floor = StaticPlane::at_height(0.0);
        assert!(detect_floor_contact(&body_at(0.5, 2.0), &floor).is_none());
    }

    #[test]
    fn test_no_contact_when_falling_above_radius() {
        let floor = StaticPlane::at_height(0.0);
        assert!(detect_floor_contact(&body_at(3.0, -2.0), &floor).is_none());
    }

    #[test]
    fn test_no_contact_at_rest_on_floor() {
        let floor = StaticPlane::at_height(0.0);
        assert!(detect_floor_contact(&body_at(0.5, 0.0), &floor).is_none());
    }

    #[test]
    fn test_exactly_one_radius_is_not_contact() {
        let floor = StaticPlane::at_height(-4.0);
        assert!(detect_floor_contact(&body_at(-3.0, -1.0), &floor).is_none());
        assert!(detect_floor_contact(&body_at(-3.0001, -1.0), &floor).is_some());
    }

    #[test]
    fn test_deep_penetration_still_detected() {
        let floor = StaticPlane::at_height(0.0);
        let info = detect_floor_contact(&body_at(-2.0, -5.0), &floor).unwrap();
        assert_eq!(info.separation, -2.0);
        assert_eq!(info.penetration, 3.0);
    }
}
