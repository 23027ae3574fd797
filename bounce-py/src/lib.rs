//! Python bindings for the bounce-core physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from bounce_physics import Simulation, Vec3
//!
//! sim = Simulation()
//! sim.set_state(Vec3(0.0, 0.0, -4.0), Vec3(0.0, 0.0, 0.0))
//!
//! for _ in range(100):
//!     sim.advance(1.0 / 60.0)
//!     pos = sim.ball_position()
//!     print(f"Ball at ({pos.x}, {pos.y}, {pos.z})")
//! ```

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use bounce_core::config::ConfigError;
use bounce_core::scenario::{Scenario, ScenarioError, ScenarioLoader};
use bounce_core::simulation::{Command, Simulation as CoreSimulation};
use bounce_core::types::Vec3 as CoreVec3;

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

fn config_err(e: ConfigError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn scenario_err(e: ScenarioError) -> PyErr {
    match e {
        ScenarioError::Io(_) | ScenarioError::NotFound(_) => PyIOError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Main simulation class.
///
/// Wraps a ball-over-floor scene stepped at a fixed physics rate.
#[pyclass]
pub struct Simulation {
    inner: CoreSimulation,
}

impl Simulation {
    fn command(&mut self, command: Command) -> PyResult<()> {
        self.inner.apply(command).map_err(config_err)
    }
}

#[pymethods]
impl Simulation {
    /// Create a simulation of the reference scene.
    #[new]
    fn new() -> PyResult<Self> {
        let loader = ScenarioLoader::new(".");
        let inner = loader
            .build(&Scenario::reference())
            .map_err(scenario_err)?;
        Ok(Self { inner })
    }

    /// Load a named scenario from a directory of YAML files.
    #[staticmethod]
    #[pyo3(signature = (name, scenarios_dir = "scenarios"))]
    fn from_scenario(name: &str, scenarios_dir: &str) -> PyResult<Self> {
        let loader = ScenarioLoader::new(scenarios_dir);
        let scenario = loader.load(name).map_err(scenario_err)?;
        let inner = loader.build(&scenario).map_err(scenario_err)?;
        Ok(Self { inner })
    }

    /// Simulated time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.inner.time()
    }

    /// Whether the simulation is running (not paused).
    #[getter]
    fn running(&self) -> bool {
        self.inner.config().running
    }

    /// Get ball position as Vec3.
    fn ball_position(&self) -> Vec3 {
        self.inner.body().position.into()
    }

    /// Get ball velocity as Vec3.
    fn ball_velocity(&self) -> Vec3 {
        self.inner.body().velocity.into()
    }

    /// Ball radius derived at load time.
    fn ball_radius(&self) -> f64 {
        self.inner.body().radius()
    }

    /// Get floor height.
    fn floor_y(&self) -> f64 {
        self.inner.floor().height()
    }

    /// Replace the ball's position and velocity.
    fn set_state(&mut self, position: Vec3, velocity: Vec3) -> PyResult<()> {
        self.command(Command::SetState {
            position: position.into(),
            velocity: velocity.into(),
        })
    }

    fn set_gravity(&mut self, gravity: Vec3) -> PyResult<()> {
        self.command(Command::SetGravity {
            gravity: gravity.into(),
        })
    }

    /// Raises ValueError outside [0, 1].
    fn set_restitution(&mut self, restitution: f64) -> PyResult<()> {
        self.command(Command::SetRestitution { restitution })
    }

    fn set_fps(&mut self, fps: u32) -> PyResult<()> {
        self.command(Command::SetFps { fps })
    }

    /// Toggle pause; returns True when now running.
    fn toggle_pause(&mut self) -> PyResult<bool> {
        self.command(Command::TogglePause)?;
        Ok(self.inner.config().running)
    }

    /// Take one fixed physics step. Returns True if the ball bounced.
    fn step(&mut self) -> bool {
        self.inner.step_once().rebounded()
    }

    /// Run multiple fixed steps at once (more efficient).
    fn step_n(&mut self, steps: usize) -> usize {
        (0..steps).filter(|_| self.inner.step_once().rebounded()).count()
    }

    /// Feed a frame delta (seconds) through the accumulator.
    ///
    /// Returns the number of fixed steps taken.
    fn advance(&mut self, frame_delta: f64) -> u32 {
        self.inner.advance(frame_delta).steps
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        let snapshot = self.inner.snapshot();
        let dict = pyo3::types::PyDict::new_bound(py);
        dict.set_item("time", snapshot.time)?;
        dict.set_item("ball_x", snapshot.position.x)?;
        dict.set_item("ball_y", snapshot.position.y)?;
        dict.set_item("ball_z", snapshot.position.z)?;
        dict.set_item("ball_vx", snapshot.velocity.x)?;
        dict.set_item("ball_vy", snapshot.velocity.y)?;
        dict.set_item("ball_vz", snapshot.velocity.z)?;
        dict.set_item("radius", snapshot.radius)?;
        dict.set_item("running", snapshot.running)?;
        Ok(dict.into_any().unbind())
    }
}

/// Python module definition.
#[pymodule]
fn bounce_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
