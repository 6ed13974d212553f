use log::{debug, warn};

use crate::dynamics::{State, Trajectory};
use crate::error::SimError;
use crate::physics::PhysicsEnvironment;
use crate::projectile::{Projectile, ProjectileGeometry};

use super::config::{Method, SimConfig};
use super::integrator::{euler_step, rk4_step, AdaptiveStepper};
use super::termination::{self, FlightEvent, Impact};

/// Upper bound on the up-front allocation; longer runs grow the Vec.
const CAPACITY_HINT: usize = 200_000;

// ---------------------------------------------------------------------------
// Result of one projectile run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Flight {
    pub trajectory: Trajectory,
    /// Samples `0..valid_samples` are physically meaningful.
    pub valid_samples: usize,
    pub impact: Option<Impact>,
    pub method: Method,
}

impl Flight {
    pub fn valid_states(&self) -> &[State] {
        &self.trajectory.states()[..self.valid_samples]
    }

    pub fn events(&self) -> Vec<FlightEvent> {
        termination::scan_events(&self.trajectory, self.valid_samples)
    }
}

// ---------------------------------------------------------------------------
// Trajectory integration
// ---------------------------------------------------------------------------

/// Integrate from `initial` with the strategy selected in `config`.
pub fn integrate(
    initial: &State,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
    config: &SimConfig,
) -> Result<Trajectory, SimError> {
    config.validate()?;
    let initial = initial.validated()?;

    match config.method {
        Method::Euler => fixed_step(initial, geometry, env, config, euler_step),
        Method::Rk4 => fixed_step(initial, geometry, env, config, rk4_step),
        Method::Adaptive => adaptive(initial, geometry, env, config),
    }
}

type Stepper = fn(&State, &ProjectileGeometry, &PhysicsEnvironment, f64) -> State;

/// Step while `z >= 0` and `t < max_time`. The sample that first goes below
/// ground is kept as the last one.
fn fixed_step(
    initial: State,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
    config: &SimConfig,
    step: Stepper,
) -> Result<Trajectory, SimError> {
    let dt = config.dt;
    let mut states = Vec::with_capacity(config.sample_count().saturating_add(1).min(CAPACITY_HINT));
    let mut state = initial;
    states.push(state);

    let mut j = 0usize;
    while state.pos.z >= 0.0 && (j as f64) * dt < config.max_time {
        state = step(&state, geometry, env, dt);
        j += 1;
        if !state.is_finite() {
            return Err(divergence(j, dt));
        }
        states.push(state);
    }

    if state.pos.z >= 0.0 {
        warn!(
            "no ground contact within {} s (altitude {:.3} m)",
            config.max_time, state.pos.z
        );
    }

    Ok(Trajectory::new(dt, states))
}

/// Dense output on `t_k = k·dt`, `k = 0..floor(max_time / dt)`. Does not stop
/// at ground contact.
fn adaptive(
    initial: State,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
    config: &SimConfig,
) -> Result<Trajectory, SimError> {
    let dt = config.dt;
    let n = config.sample_count();
    let mut stepper = AdaptiveStepper::new(geometry, env, config.tolerances, dt);
    let mut states = Vec::with_capacity(n.min(CAPACITY_HINT));
    let mut state = initial;
    states.push(state);

    for k in 1..n {
        state = stepper.advance(&state, dt);
        if !state.is_finite() {
            return Err(divergence(k, dt));
        }
        states.push(state);
    }

    debug!(
        "adaptive run: {} samples, {} sub-steps accepted, {} rejected",
        n, stepper.accepted, stepper.rejected
    );
    Ok(Trajectory::new(dt, states))
}

fn divergence(index: usize, dt: f64) -> SimError {
    SimError::NumericalDivergence {
        index,
        time: index as f64 * dt,
        quantity: "state".into(),
    }
}

// ---------------------------------------------------------------------------
// Full projectile run
// ---------------------------------------------------------------------------

/// Integrate one projectile and apply the termination policy.
pub fn simulate(
    projectile: &Projectile,
    env: &PhysicsEnvironment,
    config: &SimConfig,
) -> Result<Flight, SimError> {
    let trajectory = integrate(&projectile.initial, &projectile.geometry, env, config)?;
    let (valid_samples, impact) =
        termination::valid_samples(&trajectory, config.method, config.termination, env.g());

    debug!(
        "{}: {} samples, {} valid, impact at {}",
        projectile.name,
        trajectory.len(),
        valid_samples,
        impact.map_or("none".to_string(), |i| format!("{:.4} s", i.time)),
    );

    Ok(Flight {
        trajectory,
        valid_samples,
        impact,
        method: config.method,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::termination::{EventKind, TerminationPolicy};
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn cylinder() -> ProjectileGeometry {
        ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0).unwrap()
    }

    fn vacuum() -> PhysicsEnvironment {
        PhysicsEnvironment::ballistic(9.806).unwrap()
    }

    fn analytic_z(z0: f64, vz0: f64, t: f64) -> f64 {
        z0 + vz0 * t - 0.5 * 9.806 * t * t
    }

    #[test]
    fn euler_stops_on_first_sample_below_ground() {
        let config = SimConfig::new(0.01, 100.0, Method::Euler);
        let traj = integrate(&State::released(100.0, Vector3::zeros()), &cylinder(), &vacuum(), &config)
            .unwrap();
        let states = traj.states();
        assert!(states.last().unwrap().pos.z < 0.0);
        assert!(states[..states.len() - 1].iter().all(|s| s.pos.z >= 0.0));
    }

    #[test]
    fn euler_stops_at_max_time() {
        let config = SimConfig::new(0.01, 1.0, Method::Euler);
        let traj = integrate(&State::released(100.0, Vector3::zeros()), &cylinder(), &vacuum(), &config)
            .unwrap();
        // 100 steps of 0.01 s plus the initial sample
        assert_eq!(traj.len(), 101);
        assert!(traj.last().unwrap().pos.z > 0.0);
    }

    #[test]
    fn euler_tracks_parabola() {
        let config = SimConfig::new(0.001, 10.0, Method::Euler);
        let traj = integrate(&State::released(100.0, Vector3::new(0.0, 0.0, 5.0)), &cylinder(), &vacuum(), &config)
            .unwrap();
        for (t, s) in traj.iter() {
            // Euler error in z is g·h·t/2
            assert_abs_diff_eq!(s.pos.z, analytic_z(100.0, 5.0, t), epsilon = 0.05);
        }
    }

    #[test]
    fn rk4_and_adaptive_match_parabola_exactly() {
        for method in [Method::Rk4, Method::Adaptive] {
            let config = SimConfig::new(0.01, 6.0, method);
            let traj = integrate(&State::released(100.0, Vector3::new(3.0, 0.0, 5.0)), &cylinder(), &vacuum(), &config)
                .unwrap();
            for (t, s) in traj.iter() {
                assert_abs_diff_eq!(s.pos.z, analytic_z(100.0, 5.0, t), epsilon = 1e-8);
                assert_abs_diff_eq!(s.pos.x, 3.0 * t, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn adaptive_runs_past_ground() {
        let config = SimConfig::new(0.01, 10.0, Method::Adaptive);
        let traj = integrate(&State::released(100.0, Vector3::zeros()), &cylinder(), &vacuum(), &config)
            .unwrap();
        assert_eq!(traj.len(), 1000);
        assert!(traj.last().unwrap().pos.z < -300.0);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = SimConfig::new(-0.01, 10.0, Method::Euler);
        let err = integrate(&State::released(1.0, Vector3::zeros()), &cylinder(), &vacuum(), &config)
            .unwrap_err();
        assert!(matches!(err, SimError::IntegratorConfig(_)));
    }

    #[test]
    fn oversized_grid_is_a_config_error() {
        let projectile = Projectile::dropped("p", cylinder(), 10.0, Vector3::zeros()).unwrap();
        let config = SimConfig::new(1e-10, 1e30, Method::Euler);
        let err = simulate(&projectile, &vacuum(), &config).unwrap_err();
        assert!(matches!(err, SimError::IntegratorConfig(_)));
    }

    #[test]
    fn overflow_is_reported_as_divergence() {
        // Absurd upward launch speed in dense fluid: v·|v| overflows.
        let env = PhysicsEnvironment::new(9.806, 1.0e3, 0.0, 0.0, 0.0).unwrap();
        let config = SimConfig::new(1.0, 100.0, Method::Euler);
        let initial = State::released(10.0, Vector3::new(0.0, 0.0, 1.0e200));
        let err = integrate(&initial, &cylinder(), &env, &config).unwrap_err();
        assert!(err.is_divergence());
    }

    #[test]
    fn simulate_truncates_adaptive_run_at_impact() {
        let projectile = Projectile::dropped("p", cylinder(), 100.0, Vector3::zeros()).unwrap();
        let config = SimConfig {
            termination: TerminationPolicy::ZeroCrossing,
            ..SimConfig::new(0.01, 10.0, Method::Adaptive)
        };
        let flight = simulate(&projectile, &vacuum(), &config).unwrap();
        assert_eq!(flight.valid_samples, 453);
        let impact = flight.impact.unwrap();
        assert_abs_diff_eq!(impact.time, (200.0_f64 / 9.806).sqrt(), epsilon = 1e-3);
        let events = flight.events();
        assert_eq!(events.last().unwrap().kind, EventKind::GroundContact);
    }
}
