use nalgebra::Vector3;

use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

/// Uniform gravity acceleration (local frame, z up).
pub fn gravity_accel(env: &PhysicsEnvironment) -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -env.g())
}

/// Archimedes coefficient: weight of the displaced fluid, N.
pub fn buoyancy_coefficient(geometry: &ProjectileGeometry, env: &PhysicsEnvironment) -> f64 {
    env.rho() * geometry.volume() * env.g()
}

/// Buoyancy acceleration, straight up.
pub fn buoyancy_accel(geometry: &ProjectileGeometry, env: &PhysicsEnvironment) -> Vector3<f64> {
    Vector3::new(0.0, 0.0, buoyancy_coefficient(geometry, env) / geometry.mass())
}
