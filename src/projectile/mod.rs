pub mod body;
pub mod geometry;

pub use body::{presets, velocity_from_spherical, Projectile};
pub use geometry::{GeometryBuilder, ProjectileGeometry};
