//! Numerical integration for advancing a body in time.
//!
//! The integrator is semi-implicit (symplectic) Euler:
//!
//! ```text
//! 1. a     = a(x, v)
//! 2. v_new = v + a*dt
//! 3. x_new = x + v_new*dt   // uses the velocity just computed
//! ```
//!
//! First-order accurate; energy drifts slowly over long runs. Trajectories
//! depend on velocity being updated before position.

use crate::types::{RigidBody, Vec3};

/// Trait for computing the acceleration acting on a body.
pub trait ForceModel {
    /// Linear acceleration given the body's current state.
    fn acceleration(&self, body: &RigidBody) -> Vec3;
}

/// Semi-implicit Euler integrator.
pub struct SemiImplicitEuler;

impl SemiImplicitEuler {
    /// Advance the body by one step of `dt` seconds, in place.
    ///
    /// Returns the acceleration that was applied.
    pub fn step<F: ForceModel>(body: &mut RigidBody, forces: &F, dt: f64) -> Vec3 {
        let acceleration = forces.acceleration(body);
        body.velocity += acceleration * dt;
        body.translate(body.velocity * dt);
        acceleration
    }

    /// Advance the body by `steps` consecutive steps of `dt`.
    pub fn step_n<F: ForceModel>(body: &mut RigidBody, forces: &F, dt: f64, steps: usize) {
        for _ in 0..steps {
            Self::step(body, forces, dt);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
