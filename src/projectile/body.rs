use nalgebra::Vector3;

use crate::dynamics::State;
use crate::error::SimError;

use super::geometry::ProjectileGeometry;

// ---------------------------------------------------------------------------
// Projectile: named body plus its release conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub name: String,
    pub geometry: ProjectileGeometry,
    pub initial: State,
}

impl Projectile {
    /// Checks the release state (finite, `z >= 0`).
    pub fn new(
        name: impl Into<String>,
        geometry: ProjectileGeometry,
        initial: State,
    ) -> Result<Self, SimError> {
        Ok(Self {
            name: name.into(),
            geometry,
            initial: initial.validated()?,
        })
    }

    /// Released from altitude `z0` with cartesian velocity.
    pub fn dropped(
        name: impl Into<String>,
        geometry: ProjectileGeometry,
        z0: f64,
        vel: Vector3<f64>,
    ) -> Result<Self, SimError> {
        Self::new(name, geometry, State::released(z0, vel))
    }
}

// ---------------------------------------------------------------------------
// Spherical launch velocity
// ---------------------------------------------------------------------------

/// Cartesian velocity from magnitude, polar angle from vertical `theta`
/// and azimuth `phi` (radians).
pub fn velocity_from_spherical(magnitude: f64, theta: f64, phi: f64) -> Vector3<f64> {
    Vector3::new(
        magnitude * theta.sin() * phi.cos(),
        magnitude * theta.sin() * phi.sin(),
        magnitude * theta.cos(),
    )
}

// ---------------------------------------------------------------------------
// Preset projectiles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// 10 cm x 10 cm, 1 kg cylinder dropped from rest at 100 m.
    pub fn reference_drop() -> Result<Projectile, SimError> {
        Projectile::dropped(
            "Reference cylinder",
            ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0)?,
            100.0,
            Vector3::zeros(),
        )
    }
}
