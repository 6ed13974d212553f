use serde::Serialize;

use crate::dynamics::State;
use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

use super::quantity::EnergyKind;

/// Translational energies of one sample, J.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Energies {
    pub kinetic: f64,
    /// `(m·g - rho·V)·z`, zero at `z = 0`.
    pub potential: f64,
    pub mechanical: f64,
}

impl Energies {
    pub fn get(&self, kind: EnergyKind) -> f64 {
        match kind {
            EnergyKind::Kinetic => self.kinetic,
            EnergyKind::Potential => self.potential,
            EnergyKind::Mechanical => self.mechanical,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.kinetic.is_finite() && self.potential.is_finite()
    }
}

pub fn energies(state: &State, geometry: &ProjectileGeometry, env: &PhysicsEnvironment) -> Energies {
    let kinetic = 0.5 * geometry.mass() * state.vel.norm_squared();
    let weight = geometry.mass() * env.g() - env.rho() * geometry.volume();
    let potential = weight * state.pos.z;
    Energies {
        kinetic,
        potential,
        mechanical: kinetic + potential,
    }
}
