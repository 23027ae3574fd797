//! Scenario configuration loader.
//!
//! Loads scene setups from YAML files so drops can be tweaked without
//! recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! scenarios/
//! ├── reference.yaml
//! ├── dead_drop.yaml
//! └── ...
//! meshes/
//! └── ball.obj
//! ```
//!
//! Mesh paths inside a scenario are resolved against the mesh directory,
//! which defaults to `meshes/` next to the scenario directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, SimulationConfig};
use crate::mesh::{Mesh, MeshError};
use crate::simulation::Simulation;
use crate::types::{InvalidRadius, RigidBody, StaticPlane, Vec3};

/// Error type for scenario loading operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("scenario not found: {0}")]
    NotFound(String),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("mesh {path}: {source}")]
    Mesh {
        path: PathBuf,
        #[source]
        source: MeshError,
    },
    #[error(transparent)]
    Radius(#[from] InvalidRadius),
    #[error("ball needs either `radius` or `mesh`")]
    MissingRadius,
}

/// Where the ball's radius comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    /// Explicit radius; takes priority over `mesh`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// OBJ file, relative to the mesh directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<PathBuf>,
    /// Measure the radius at this expanded vertex instead of the full extent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_vertex: Option<usize>,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
}

/// A complete scene: ball, floor and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub ball: BallSpec,
    pub floor: StaticPlane,
    #[serde(default)]
    pub config: SimulationConfig,
}

impl Scenario {
    /// The stock scene: a unit ball four units in front of the camera,
    /// dropped onto a floor four units below it.
    pub fn reference() -> Self {
        Self {
            name: "Reference drop".to_string(),
            ball: BallSpec {
                radius: Some(1.0),
                mesh: None,
                radius_vertex: None,
                position: Vec3::new(0.0, 0.0, -4.0),
                velocity: Vec3::ZERO,
            },
            floor: StaticPlane::new(Vec3::new(0.0, -4.0, -4.0)),
            config: SimulationConfig::default(),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::reference()
    }
}

/// Scenario loader with configurable base directory.
pub struct ScenarioLoader {
    base_path: PathBuf,
    mesh_path: PathBuf,
}

impl ScenarioLoader {
    /// Create a new loader reading `*.yaml` files from `base_path`.
    ///
    /// Meshes are looked up in a `meshes` directory beside it.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        let mesh_path = base_path
            .parent()
            .map(|p| p.join("meshes"))
            .unwrap_or_else(|| PathBuf::from("meshes"));
        Self {
            base_path,
            mesh_path,
        }
    }

    pub fn with_mesh_dir<P: AsRef<Path>>(mut self, mesh_path: P) -> Self {
        self.mesh_path = mesh_path.as_ref().to_path_buf();
        self
    }

    /// Load a scenario by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ScenarioLoader::new("scenarios");
    /// let scenario = loader.load("reference")?;
    /// ```
    pub fn load(&self, name: &str) -> Result<Scenario, ScenarioError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ScenarioError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let scenario: Scenario = serde_yaml::from_str(&contents)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// List all available scenarios.
    pub fn list(&self) -> Result<Vec<String>, ScenarioError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(".yaml") {
                names.push(name.trim_end_matches(".yaml").to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve the ball radius and assemble a ready-to-run simulation.
    pub fn build(&self, scenario: &Scenario) -> Result<Simulation, ScenarioError> {
        let radius = self.ball_radius(&scenario.ball)?;

        let mut body = RigidBody::new(radius)?;
        body.set_state(scenario.ball.position, scenario.ball.velocity);

        let sim = Simulation::new(body, scenario.floor, scenario.config.clone())?;
        info!(
            scenario = %scenario.name,
            radius,
            floor_y = scenario.floor.height(),
            "scenario ready"
        );
        Ok(sim)
    }

    fn ball_radius(&self, ball: &BallSpec) -> Result<f64, ScenarioError> {
        if let Some(radius) = ball.radius {
            return Ok(radius);
        }
        let file = ball.mesh.as_ref().ok_or(ScenarioError::MissingRadius)?;
        let path = self.mesh_path.join(file);
        let wrap = |source: MeshError| ScenarioError::Mesh {
            path: path.clone(),
            source,
        };

        let mesh = Mesh::load(&path).map_err(wrap)?;
        match ball.radius_vertex {
            Some(index) => mesh.vertex_radius(index).map_err(wrap),
            None => mesh.bounding_radius().map_err(wrap),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
