//! # Bounce Core
//!
//! A fixed-timestep physics core for a sphere bouncing on a floor.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, rigid body, floor plane)
//! - `config`: Runtime settings (gravity, restitution, pause, frame rates)
//! - `integrator`: Numerical integration (semi-implicit Euler)
//! - `forces`: Uniform gravity
//! - `collision`: Floor contact detection and rebound response
//! - `stepper`: One fixed physics step
//! - `clock`: Frame pacing and the step accumulator
//! - `mesh`: OBJ reader used to derive the ball radius
//! - `scenario`: YAML scenario loader
//! - `simulation`: Main orchestrator, external commands and the frame loop

pub mod clock;
pub mod collision;
pub mod config;
pub mod forces;
pub mod integrator;
pub mod mesh;
pub mod scenario;
pub mod simulation;
pub mod stepper;
pub mod types;

pub use config::{ConfigError, SimulationConfig};
pub use simulation::{Command, Simulation};
pub use stepper::{PhysicsStepper, StepOutcome};
pub use types::{RigidBody, StaticPlane, Vec3};
