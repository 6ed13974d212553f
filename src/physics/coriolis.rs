use nalgebra::Vector3;

use crate::physics::PhysicsEnvironment;

/// Planetary rotation vector in the local frame. Only the horizontal part
/// `omega·(-sin(lat), cos(lat), 0)` is modeled; the vertical part is dropped.
pub fn rotation_vector(env: &PhysicsEnvironment) -> Vector3<f64> {
    let lat = env.lat();
    env.omega() * Vector3::new(-lat.sin(), lat.cos(), 0.0)
}

/// Coriolis acceleration `-2·(Ω × v)`.
pub fn coriolis_accel(vel: &Vector3<f64>, env: &PhysicsEnvironment) -> Vector3<f64> {
    -2.0 * rotation_vector(env).cross(vel)
}
