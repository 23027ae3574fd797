//! Core types for the physics simulation.
//!
//! Units follow whatever the scenario chooses; the reference setup uses
//! meters and seconds:
//! - Position: meters (m)
//! - Velocity: meters per second (m/s)
//! - Gravity: meters per second squared (m/s²)

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use thiserror::Error;

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities and accelerations.
///
/// Coordinate system:
/// - X: horizontal
/// - Y: vertical (positive upward, gravity normally points to -Y)
/// - Z: horizontal, toward the viewer
///
/// Serialized as a `[x, y, z]` sequence so scenario files stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

// Operator overloads for Vec3
impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Rigid Body
// =============================================================================

/// Raised when a body is built from a non-positive or non-finite radius.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("sphere radius must be positive and finite, got {0}")]
pub struct InvalidRadius(pub f64);

/// The dynamic sphere (the ball).
///
/// `position` is the translation accumulated since creation; the sphere's
/// centroid sits at the local origin. The radius is fixed once the body
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    radius: f64,
}

impl RigidBody {
    /// Create a body at the origin, at rest.
    pub fn new(radius: f64) -> Result<Self, InvalidRadius> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(InvalidRadius(radius));
        }
        Ok(Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Move the body by `delta`, accumulating onto its current translation.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Hard reset: replace position and velocity, dropping translation history.
    pub fn set_state(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Column-major 4x4 model matrix for renderers (pure translation).
    pub fn transform(&self) -> [[f64; 4]; 4] {
        [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [self.position.x, self.position.y, self.position.z, 1.0],
        ]
    }
}

// =============================================================================
// Static Plane
// =============================================================================

/// The floor.
///
/// Treated as an infinite horizontal plane at `position.y`; the mesh extents
/// used to draw it play no part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticPlane {
    pub position: Vec3,
}

impl StaticPlane {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Plane at the given height, centered on the vertical axis
    pub fn at_height(y: f64) -> Self {
        Self::new(Vec3::new(0.0, y, 0.0))
    }

    /// Y coordinate used for contact tests
    pub fn height(&self) -> f64 {
        self.position.y
    }
}

impl Default for StaticPlane {
    fn default() -> Self {
        Self::at_height(0.0)
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants used in the simulation.
pub mod constants {
    /// Default gravitational acceleration magnitude (m/s²)
    pub const STANDARD_GRAVITY: f64 = 9.8;

    /// Fixed physics rate in steps per second
    pub const DEFAULT_PHYSICS_TICK: u32 = 60;

    /// Default render frame rate cap
    pub const DEFAULT_FPS: u32 = 60;

    /// Rebounds slower than this are not worth a log line
    pub const REBOUND_LOG_THRESHOLD: f64 = 0.001;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vec3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_vec3_magnitude() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-10);
        assert!((Vec3::ZERO.distance(&v) - 5.0).abs() < 1e-10);
        assert_eq!(v.dot(&Vec3::new(0.0, 1.0, 0.0)), 4.0);
    }

    #[test]
    fn test_vec3_serializes_as_sequence() {
        let v: Vec3 = serde_yaml::from_str("[1.0, -2.5, 3.0]").unwrap();
        assert_eq!(v, Vec3::new(1.0, -2.5, 3.0));
    }

    #[test]
    fn test_body_rejects_bad_radius() {
        assert_eq!(RigidBody::new(0.0), Err(InvalidRadius(0.0)));
        assert!(RigidBody::new(-1.0).is_err());
        assert!(RigidBody::new(f64::NAN).is_err());
        assert!(RigidBody::new(f64::INFINITY).is_err());
        assert!(RigidBody::new(0.5).is_ok());
    }

    #[test]
    fn test_set_state_discards_translation() {
        let mut body = RigidBody::new(1.0).unwrap();
        body.translate(Vec3::new(0.0, 0.0, -4.0));
        body.translate(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.position, Vec3::new(1.0, 0.0, -4.0));

        body.set_state(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_transform_carries_translation() {
        let mut body = RigidBody::new(1.0).unwrap();
        body.translate(Vec3::new(2.0, -3.0, 4.0));
        let m = body.transform();
        assert_eq!(m[3], [2.0, -3.0, 4.0, 1.0]);
        assert_eq!(m[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plane_height() {
        let floor = StaticPlane::new(Vec3::new(0.0, -4.0, -4.0));
        assert_eq!(floor.height(), -4.0);
    }
}
