pub mod aerodynamics;
pub mod coriolis;
pub mod environment;
pub mod gravity;

pub use environment::{EnvironmentParams, PhysicsEnvironment, Preset};
