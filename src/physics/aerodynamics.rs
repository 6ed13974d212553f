use nalgebra::Vector3;

use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

/// Drag coefficient of a blunt cylinder, used unless a projectile sets its own.
pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.45;

/// Quadratic drag coefficient `-0.5·Cx·S·rho` (negative: the force opposes velocity).
pub fn drag_coefficient(geometry: &ProjectileGeometry, env: &PhysicsEnvironment) -> f64 {
    -0.5 * geometry.drag_coefficient() * geometry.cross_section() * env.rho()
}

/// Drag acceleration `k/m · v · |v|`.
pub fn drag_accel(
    vel: &Vector3<f64>,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
) -> Vector3<f64> {
    vel * (vel.norm() * drag_coefficient(geometry, env) / geometry.mass())
}
