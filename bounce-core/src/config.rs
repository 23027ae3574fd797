//! Runtime simulation settings.
//!
//! Everything the GUI sliders and buttons used to poke at lives here and is
//! passed explicitly into the stepper. Setters validate; a rejected value
//! leaves the previous one in place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{constants, Vec3};

/// Error type for configuration updates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("restitution must lie in [0, 1], got {0}")]
    InvalidRestitution(f64),
    #[error("gravity must be finite, got {0:?}")]
    InvalidGravity(Vec3),
    #[error("fps must be at least 1")]
    InvalidFps,
    #[error("physics tick must be at least 1")]
    InvalidPhysicsTick,
}

/// Mutable, externally driven simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: Vec3,
    pub restitution: f64,
    /// Pause flag; the stepper is a no-op while false
    pub running: bool,
    /// Render frame-rate cap
    pub fps: u32,
    /// Physics steps per second
    pub physics_tick: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -constants::STANDARD_GRAVITY, 0.0),
            restitution: 1.0,
            running: true,
            fps: constants::DEFAULT_FPS,
            physics_tick: constants::DEFAULT_PHYSICS_TICK,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed physics step duration in seconds.
    pub fn physics_timestep(&self) -> f64 {
        1.0 / self.physics_tick as f64
    }

    /// Minimum wall-clock duration of one render frame.
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn set_gravity(&mut self, gravity: Vec3) -> Result<(), ConfigError> {
        check_gravity(gravity)?;
        self.gravity = gravity;
        Ok(())
    }

    /// Accepts `[0, 1]` only; NaN is refused as well.
    pub fn set_restitution(&mut self, restitution: f64) -> Result<(), ConfigError> {
        check_restitution(restitution)?;
        self.restitution = restitution;
        Ok(())
    }

    pub fn set_fps(&mut self, fps: u32) -> Result<(), ConfigError> {
        if fps == 0 {
            return Err(ConfigError::InvalidFps);
        }
        self.fps = fps;
        Ok(())
    }

    /// Flip between running and paused. Returns the new running state.
    pub fn toggle_pause(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Check every field, e.g. after loading from a file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gravity(self.gravity)?;
        check_restitution(self.restitution)?;
        if self.fps == 0 {
            return Err(ConfigError::InvalidFps);
        }
        if self.physics_tick == 0 {
            return Err(ConfigError::InvalidPhysicsTick);
        }
        Ok(())
    }
}

fn check_gravity(gravity: Vec3) -> Result<(), ConfigError> {
    if gravity.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidGravity(gravity))
    }
}

fn check_restitution(restitution: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&restitution) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRestitution(restitution))
    }
}

// =============================================================================
// Tests
// =============================================================================
