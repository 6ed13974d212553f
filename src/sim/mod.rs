pub mod batch;
pub mod config;
pub mod integrator;
pub mod runner;
pub mod termination;

pub use batch::{run_batch, Batch, ProjectileRun};
pub use config::{Method, SimConfig, Tolerances};
pub use integrator::{euler_step, rk4_step, AdaptiveStepper};
pub use runner::{integrate, simulate, Flight};
pub use termination::{Impact, TerminationPolicy};
