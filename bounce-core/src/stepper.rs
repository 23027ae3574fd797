//! One fixed physics step: gravity, motion, floor rebound.
//!
//! The stepper is a pure function of its arguments. Gravity, restitution and
//! the pause flag all come from the [`SimulationConfig`] handed in; nothing is
//! read from global state.

use serde::Serialize;
use tracing::{debug, trace};

use crate::collision::{detect_floor_contact, resolve_rebound, FloorContact};
use crate::config::SimulationConfig;
use crate::forces::UniformGravity;
use crate::integrator::SemiImplicitEuler;
use crate::types::{constants, RigidBody, StaticPlane};

/// What a single call to [`PhysicsStepper::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StepOutcome {
    /// Simulation paused; the body was not touched
    Paused,
    /// Timestep was zero, negative or NaN; the body was not touched
    Rejected,
    /// Integrated without reaching the floor
    Advanced,
    /// Integrated, then bounced off the floor
    Rebounded(FloorContact),
}

impl StepOutcome {
    pub fn rebounded(&self) -> bool {
        matches!(self, StepOutcome::Rebounded(_))
    }

    /// True when the body's state may have changed.
    pub fn advanced(&self) -> bool {
        matches!(self, StepOutcome::Advanced | StepOutcome::Rebounded(_))
    }
}

/// Physics stepper for a single sphere over a single floor.
pub struct PhysicsStepper;

impl PhysicsStepper {
    /// Advance `body` by exactly one step of `dt` seconds.
    ///
    /// # Arguments
    /// * `body` - The ball, mutated in place
    /// * `floor` - The static plane it may bounce on
    /// * `config` - Gravity, restitution and the pause flag
    /// * `dt` - Step length in seconds; the clock always passes `1/physics_tick`
    pub fn step(
        body: &mut RigidBody,
        floor: &StaticPlane,
        config: &SimulationConfig,
        dt: f64,
    ) -> StepOutcome {
        if !config.running {
            return StepOutcome::Paused;
        }
        if !(dt.is_finite() && dt > 0.0) {
            return StepOutcome::Rejected;
        }

        let forces = UniformGravity::new(config.gravity);
        let acceleration = SemiImplicitEuler::step(body, &forces, dt);
        trace!(
            timestep = dt,
            delta_vy = acceleration.y * dt,
            y = body.position.y,
            "gravity step"
        );

        match detect_floor_contact(body, floor) {
            Some(contact) => {
                resolve_rebound(body, config.restitution);
                if body.velocity.y > constants::REBOUND_LOG_THRESHOLD {
                    debug!(
                        radius = body.radius(),
                        separation = contact.separation,
                        restitution = config.restitution,
                        velocity = body.velocity.y,
                        "floor collision"
                    );
                }
                StepOutcome::Rebounded(contact)
            }
            None => StepOutcome::Advanced,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
