//! Scenario orchestration and the frame loop.
//!
//! [`Simulation`] owns the ball, the floor, the settings and the step
//! accumulator. Everything outside the physics core talks to it through
//! [`Command`]s (applied between frames) and read-only [`BodySnapshot`]s.
//!
//! One loop iteration:
//!
//! ```text
//! pace frame ─▶ accumulate delta ─▶ step × N ─▶ poll commands ─▶ present
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Accumulator, FramePacer, Sleeper, TimeSource};
use crate::config::{ConfigError, SimulationConfig};
use crate::stepper::{PhysicsStepper, StepOutcome};
use crate::types::{RigidBody, StaticPlane, Vec3};

// =============================================================================
// Commands
// =============================================================================

/// External mutations accepted from the input/GUI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Hard reset of the ball's position and velocity
    SetState { position: Vec3, velocity: Vec3 },
    SetGravity { gravity: Vec3 },
    SetRestitution { restitution: f64 },
    SetFps { fps: u32 },
    TogglePause,
    /// Stop the run loop after the current frame
    Close,
}

// =============================================================================
// Snapshots and reports
// =============================================================================

/// Read-only view of the ball for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodySnapshot {
    pub time: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f64,
    pub running: bool,
}

/// What happened during one call to [`Simulation::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Fixed steps consumed from the accumulator
    pub steps: u32,
    /// Steps that ended in a floor rebound
    pub rebounds: u32,
    /// Leftover step fraction, for render interpolation
    pub alpha: f64,
}

// =============================================================================
// Simulation
// =============================================================================

/// A single ball over a single floor, stepped at a fixed rate.
#[derive(Debug, Clone)]
pub struct Simulation {
    body: RigidBody,
    floor: StaticPlane,
    config: SimulationConfig,
    accumulator: Accumulator,
    time: f64,
    steps: u64,
    closed: bool,
}

impl Simulation {
    /// Fails if `config` does not pass [`SimulationConfig::validate`].
    pub fn new(
        body: RigidBody,
        floor: StaticPlane,
        config: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let accumulator = Accumulator::new(config.physics_tick);
        Ok(Self {
            body,
            floor,
            config,
            accumulator,
            time: 0.0,
            steps: 0,
            closed: false,
        })
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn floor(&self) -> &StaticPlane {
        &self.floor
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulated seconds, counting only steps taken while running.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Total fixed steps taken while running.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply one external command. A rejected value leaves the previous
    /// setting in place.
    pub fn apply(&mut self, command: Command) -> Result<(), ConfigError> {
        match command {
            Command::SetState { position, velocity } => {
                self.body.set_state(position, velocity);
                debug!(?position, ?velocity, "ball state set");
            }
            Command::SetGravity { gravity } => self.config.set_gravity(gravity)?,
            Command::SetRestitution { restitution } => {
                self.config.set_restitution(restitution)?
            }
            Command::SetFps { fps } => self.config.set_fps(fps)?,
            Command::TogglePause => {
                let running = self.config.toggle_pause();
                info!(running, "simulation {}", if running { "resumed" } else { "paused" });
            }
            Command::Close => self.closed = true,
        }
        Ok(())
    }

    /// Take exactly one fixed step, bypassing the accumulator.
    pub fn step_once(&mut self) -> StepOutcome {
        let dt = self.accumulator.timestep();
        let outcome = PhysicsStepper::step(&mut self.body, &self.floor, &self.config, dt);
        if outcome.advanced() {
            self.time += dt;
            self.steps += 1;
        }
        outcome
    }

    /// Feed one frame's delta into the accumulator and run the steps it
    /// releases. While paused the time still drains, it just moves nothing.
    pub fn advance(&mut self, frame_delta: f64) -> FrameReport {
        let steps = self.accumulator.accumulate(frame_delta);
        let mut rebounds = 0;
        for _ in 0..steps {
            if self.step_once().rebounded() {
                rebounds += 1;
            }
        }
        FrameReport {
            steps,
            rebounds,
            alpha: self.accumulator.interpolation_alpha(),
        }
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            time: self.time,
            position: self.body.position,
            velocity: self.body.velocity,
            radius: self.body.radius(),
            running: self.config.running,
        }
    }
}

// =============================================================================
// External collaborators
// =============================================================================

/// Supplies the commands issued during a frame (input handling, GUI, script).
pub trait CommandSource {
    fn poll(&mut self, frame: u64) -> Vec<Command>;
}

/// Consumes the ball's state once per frame (renderer, recorder, logger).
pub trait FrameSink {
    fn present(&mut self, snapshot: &BodySnapshot, report: &FrameReport);
}

impl CommandSource for Vec<(u64, Command)> {
    fn poll(&mut self, frame: u64) -> Vec<Command> {
        let (due, later): (Vec<_>, Vec<_>) = self.drain(..).partition(|(at, _)| *at <= frame);
        *self = later;
        due.into_iter().map(|(_, command)| command).collect()
    }
}

/// Keeps every presented snapshot.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub frames: Vec<(BodySnapshot, FrameReport)>,
}

impl FrameSink for Recorder {
    fn present(&mut self, snapshot: &BodySnapshot, report: &FrameReport) {
        self.frames.push((*snapshot, *report));
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub steps: u64,
    pub rebounds: u64,
    pub closed: bool,
}

/// Drive the simulation until a `Close` command or `max_frames` frames.
///
/// Runs on the calling thread. The pacer's sleep is the only blocking point;
/// commands land between frames, never in the middle of a step.
pub fn run_loop<T, S, C, F>(
    sim: &mut Simulation,
    pacer: &mut FramePacer<T, S>,
    commands: &mut C,
    sink: &mut F,
    max_frames: Option<u64>,
) -> RunSummary
where
    T: TimeSource,
    S: Sleeper,
    C: CommandSource,
    F: FrameSink,
{
    let mut frames = 0;
    let mut rebounds = 0;

    while !sim.is_closed() && max_frames.map_or(true, |max| frames < max) {
        let delta = pacer.begin_frame(sim.config().fps);
        let report = sim.advance(delta);
        rebounds += report.rebounds as u64;

        for command in commands.poll(frames) {
            if let Err(e) = sim.apply(command.clone()) {
                warn!(?command, error = %e, "command rejected");
            }
        }

        sink.present(&sim.snapshot(), &report);
        frames += 1;
    }

    RunSummary {
        frames,
        steps: sim.step_count(),
        rebounds,
        closed: sim.is_closed(),
    }
}

// =============================================================================
// Tests
// =============================================================================
