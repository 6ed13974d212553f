pub mod state;

pub use state::{Deriv, State, Trajectory};

use crate::physics::{aerodynamics, coriolis, gravity, PhysicsEnvironment};
use crate::projectile::ProjectileGeometry;

// ---------------------------------------------------------------------------
// Equations of motion (point mass in a rotating frame)
// ---------------------------------------------------------------------------

/// Time derivative of the state.
///
/// Forces modeled:
///   1. Gravity  - uniform, along -z
///   2. Drag     - quadratic in speed, only when the fluid has density
///   3. Buoyancy - weight of displaced fluid, along +z, same condition
///   4. Coriolis - horizontal rotation components only, when the planet spins
///
/// Pure function; non-finite results are left for the caller to detect.
pub fn derivative(state: &State, geometry: &ProjectileGeometry, env: &PhysicsEnvironment) -> Deriv {
    let mut accel = gravity::gravity_accel(env);

    if env.has_fluid() {
        accel += aerodynamics::drag_accel(&state.vel, geometry, env);
        accel += gravity::buoyancy_accel(geometry, env);
    }

    if env.is_rotating() {
        accel += coriolis::coriolis_accel(&state.vel, env);
    }

    Deriv {
        dpos: state.vel,
        dvel: accel,
    }
}
