//! Scenario files.
//!
//! A scenario is a JSON document describing the simulation controls, the
//! environment and the projectiles to drop:
//!
//! ```json
//! {
//!   "simulation": { "Tmax": 20.0, "h": 0.01, "method": "rk4" },
//!   "physics": { "preset": "earth_air", "custom": { "latitude_deg": 48.8 } },
//!   "projectiles": [
//!     { "name": "P1", "initial_altitude": 100.0,
//!       "initial_velocity": { "type": "spherical", "magnitude": 10, "theta_deg": 45 } }
//!   ]
//! }
//! ```
//!
//! Every section and field is optional. The deserialized [`ScenarioConfig`]
//! stays close to the file; [`ScenarioConfig::build`] validates it and turns it
//! into the runtime [`Scenario`].

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

use crate::error::SimError;
use crate::physics::{EnvironmentParams, PhysicsEnvironment, Preset};
use crate::projectile::{velocity_from_spherical, GeometryBuilder, Projectile};
use crate::sim::{Method, SimConfig, TerminationPolicy, Tolerances};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sim(#[from] SimError),
}

// ---------------------------------------------------------------------------
// File representation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub simulation: SimulationSection,
    pub physics: PhysicsSection,
    pub projectiles: Vec<ProjectileSection>,
    pub output: OutputSection,
}

/// How initial velocities are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    #[default]
    #[serde(alias = "c")]
    Cartesian,
    #[serde(alias = "s")]
    Spherical,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    #[serde(rename = "Tmax", alias = "max_time")]
    pub max_time: f64,
    #[serde(rename = "h", alias = "dt")]
    pub dt: f64,
    pub method: Method,
    pub coordinate_system: CoordinateSystem,
    pub termination: TerminationPolicy,
    pub rtol: f64,
    pub atol: f64,
    pub threads: Option<usize>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self {
            max_time: sim.max_time,
            dt: sim.dt,
            method: sim.method,
            coordinate_system: CoordinateSystem::default(),
            termination: sim.termination,
            rtol: sim.tolerances.rtol,
            atol: sim.tolerances.atol,
            threads: sim.threads,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhysicsSection {
    pub preset: Preset,
    pub custom: Option<PhysicsOverrides>,
}

/// Field-by-field overrides on top of the preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhysicsOverrides {
    pub g: Option<f64>,
    pub rho: Option<f64>,
    #[serde(alias = "etha")]
    pub eta: Option<f64>,
    pub omega: Option<f64>,
    pub latitude_deg: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectileSection {
    pub name: Option<String>,
    pub diameter: f64,
    pub length: f64,
    pub mass: f64,
    pub drag_coefficient: Option<f64>,
    pub initial_altitude: f64,
    pub initial_velocity: VelocitySection,
}

impl Default for ProjectileSection {
    fn default() -> Self {
        Self {
            name: None,
            diameter: 0.1,
            length: 0.1,
            mass: 1.0,
            drag_coefficient: None,
            initial_altitude: 0.0,
            initial_velocity: VelocitySection::default(),
        }
    }
}

/// Either `{vx, vy, vz}` or `{magnitude, theta_deg, phi_deg}`; `type` falls
/// back to `simulation.coordinate_system`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VelocitySection {
    #[serde(rename = "type")]
    pub kind: Option<CoordinateSystem>,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
    pub magnitude: f64,
    pub theta_deg: f64,
    pub phi_deg: f64,
}

impl VelocitySection {
    pub fn to_cartesian(&self, fallback: CoordinateSystem) -> Vector3<f64> {
        match self.kind.unwrap_or(fallback) {
            CoordinateSystem::Cartesian => Vector3::new(self.vx, self.vy, self.vz),
            CoordinateSystem::Spherical => velocity_from_spherical(
                self.magnitude,
                self.theta_deg.to_radians(),
                self.phi_deg.to_radians(),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub show_numerical_info: bool,
    pub csv_dir: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            show_numerical_info: true,
            csv_dir: None,
            summary_json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Scenario {
    pub config: SimConfig,
    pub preset: Preset,
    pub environment: PhysicsEnvironment,
    pub projectiles: Vec<Projectile>,
    pub output: OutputSection,
}

pub fn load(path: impl AsRef<Path>) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ScenarioConfig::from_json(&text)
}

impl ScenarioConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn environment_params(&self) -> EnvironmentParams {
        let mut p = self.physics.preset.params();
        if let Some(o) = &self.physics.custom {
            p.g = o.g.unwrap_or(p.g);
            p.rho = o.rho.unwrap_or(p.rho);
            p.eta = o.eta.unwrap_or(p.eta);
            p.omega = o.omega.unwrap_or(p.omega);
            p.latitude_deg = o.latitude_deg.unwrap_or(p.latitude_deg);
        }
        p
    }

    pub fn sim_config(&self) -> SimConfig {
        let s = &self.simulation;
        SimConfig {
            dt: s.dt,
            max_time: s.max_time,
            method: s.method,
            termination: s.termination,
            tolerances: Tolerances {
                rtol: s.rtol,
                atol: s.atol,
            },
            threads: s.threads,
        }
    }

    /// Validate every section and build the runtime scenario.
    pub fn build(&self) -> Result<Scenario, ConfigError> {
        let config = self.sim_config();
        config.validate()?;
        let environment = self.environment_params().build()?;

        let projectiles = self
            .projectiles
            .iter()
            .enumerate()
            .map(|(i, p)| self.build_projectile(i, p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scenario {
            config,
            preset: self.physics.preset,
            environment,
            projectiles,
            output: self.output.clone(),
        })
    }

    fn build_projectile(&self, index: usize, p: &ProjectileSection) -> Result<Projectile, SimError> {
        let mut builder = GeometryBuilder::new()
            .diameter(p.diameter)
            .length(p.length)
            .mass(p.mass);
        if let Some(cx) = p.drag_coefficient {
            builder = builder.drag_coefficient(cx);
        }
        let name = p.name.clone().unwrap_or_else(|| format!("P{}", index + 1));
        let velocity = p
            .initial_velocity
            .to_cartesian(self.simulation.coordinate_system);
        Projectile::dropped(name, builder.build()?, p.initial_altitude, velocity)
    }
}
