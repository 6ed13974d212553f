use log::{info, warn};
use rayon::prelude::*;

use crate::error::SimError;
use crate::physics::PhysicsEnvironment;
use crate::projectile::Projectile;

use super::config::SimConfig;
use super::runner::{simulate, Flight};

// ---------------------------------------------------------------------------
// Independent runs of several projectiles in one environment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProjectileRun {
    pub name: String,
    pub outcome: Result<Flight, SimError>,
}

/// Per-projectile outcomes, in input order.
#[derive(Debug, Clone)]
pub struct Batch {
    pub runs: Vec<ProjectileRun>,
}

impl Batch {
    /// Longest valid sample count over the successful runs.
    pub fn max_valid_samples(&self) -> usize {
        self.succeeded()
            .map(|(_, f)| f.valid_samples)
            .max()
            .unwrap_or(0)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &Flight)> {
        self.runs
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok().map(|f| (r.name.as_str(), f)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &SimError)> {
        self.runs
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.name.as_str(), e)))
    }
}

/// Run every projectile against the same environment. A failing run is
/// recorded and does not stop the others.
///
/// Runs go to a dedicated pool of `config.threads` workers when set, else to
/// the global rayon pool.
pub fn run_batch(projectiles: &[Projectile], env: &PhysicsEnvironment, config: &SimConfig) -> Batch {
    info!(
        "simulating {} projectile(s), method {:?}, dt {} s, max time {} s",
        projectiles.len(),
        config.method,
        config.dt,
        config.max_time
    );

    let run_all = || -> Vec<ProjectileRun> {
        projectiles
            .par_iter()
            .map(|p| ProjectileRun {
                name: p.name.clone(),
                outcome: simulate(p, env, config),
            })
            .collect()
    };

    let runs = match config.threads {
        Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => pool.install(run_all),
            Err(e) => {
                warn!("failed to build a {n}-thread pool, using the global pool: {e}");
                run_all()
            }
        },
        None => run_all(),
    };

    let batch = Batch { runs };
    for (name, err) in batch.failed() {
        warn!("{name}: run discarded: {err}");
    }
    info!(
        "batch done: {} ok, {} failed, longest valid run {} samples",
        batch.succeeded().count(),
        batch.failed().count(),
        batch.max_valid_samples()
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::ProjectileGeometry;
    use crate::sim::Method;
    use nalgebra::Vector3;

    fn drop_from(name: &str, z0: f64) -> Projectile {
        let geo = ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0).unwrap();
        Projectile::dropped(name, geo, z0, Vector3::zeros()).unwrap()
    }

    #[test]
    fn runs_keep_input_order_and_independence() {
        let env = PhysicsEnvironment::ballistic(9.806).unwrap();
        let config = SimConfig::new(0.01, 20.0, Method::Euler);
        let projectiles = vec![drop_from("low", 10.0), drop_from("high", 200.0), drop_from("mid", 50.0)];
        let batch = run_batch(&projectiles, &env, &config);

        let names: Vec<&str> = batch.runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["low", "high", "mid"]);

        let alone = simulate(&projectiles[1], &env, &config).unwrap();
        let high = batch.runs[1].outcome.as_ref().unwrap();
        assert_eq!(high.trajectory, alone.trajectory);
        assert_eq!(batch.max_valid_samples(), alone.valid_samples);
    }

    #[test]
    fn divergent_run_does_not_stop_others() {
        let env = PhysicsEnvironment::new(9.806, 1.184, 0.0, 0.0, 0.0).unwrap();
        let config = SimConfig {
            threads: Some(2),
            ..SimConfig::new(0.01, 50.0, Method::Euler)
        };
        let geo = ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0).unwrap();
        let wild = Projectile::dropped("wild", geo, 10.0, Vector3::new(0.0, 0.0, 1.0e200)).unwrap();
        let projectiles = vec![drop_from("calm", 10.0), wild];

        let batch = run_batch(&projectiles, &env, &config);
        assert_eq!(batch.succeeded().count(), 1);
        let (name, err) = batch.failed().next().unwrap();
        assert_eq!(name, "wild");
        assert!(err.is_divergence());
    }

    #[test]
    fn empty_batch() {
        let env = PhysicsEnvironment::ballistic(9.806).unwrap();
        let batch = run_batch(&[], &env, &SimConfig::new(0.01, 1.0, Method::Euler));
        assert!(batch.runs.is_empty());
        assert_eq!(batch.max_valid_samples(), 0);
    }
}
