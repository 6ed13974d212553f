pub mod analysis;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod projectile;
pub mod sim;

pub use analysis::{extract, FlightSummary, Quantity, Series};
pub use dynamics::{State, Trajectory};
pub use error::SimError;
pub use physics::PhysicsEnvironment;
pub use projectile::{Projectile, ProjectileGeometry};
pub use sim::{run_batch, simulate, Method, SimConfig};
