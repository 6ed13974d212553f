use crate::dynamics::{self, State};
use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

use super::config::Tolerances;

// ---------------------------------------------------------------------------
// Fixed-step steppers
// ---------------------------------------------------------------------------

/// Single explicit Euler step: `y + dt·f(y)`.
pub fn euler_step(
    state: &State,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
    dt: f64,
) -> State {
    state.apply(&dynamics::derivative(state, geometry, env), dt)
}

/// Single classical RK4 step.
pub fn rk4_step(
    state: &State,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
    dt: f64,
) -> State {
    let k1 = dynamics::derivative(state, geometry, env);
    let k2 = dynamics::derivative(&state.apply(&k1, dt * 0.5), geometry, env);
    let k3 = dynamics::derivative(&state.apply(&k2, dt * 0.5), geometry, env);
    let k4 = dynamics::derivative(&state.apply(&k3, dt), geometry, env);

    State {
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
    }
}

// ---------------------------------------------------------------------------
// Adaptive stepper: RK4 step doubling with Richardson extrapolation
// ---------------------------------------------------------------------------

/// Smallest sub-step, as a fraction of the output interval. Below it steps
/// are accepted regardless of the error estimate.
const MIN_STEP_FRACTION: f64 = 1e-6;

pub struct AdaptiveStepper<'a> {
    geometry: &'a ProjectileGeometry,
    env: &'a PhysicsEnvironment,
    tol: Tolerances,
    h: f64, // current sub-step proposal, carried across intervals
    pub rejected: usize,
    pub accepted: usize,
}

impl<'a> AdaptiveStepper<'a> {
    pub fn new(
        geometry: &'a ProjectileGeometry,
        env: &'a PhysicsEnvironment,
        tol: Tolerances,
        initial_step: f64,
    ) -> Self {
        Self {
            geometry,
            env,
            tol,
            h: initial_step,
            rejected: 0,
            accepted: 0,
        }
    }

    /// Advance `state` by exactly `span` seconds. The last sub-step is clipped
    /// to land on the interval end. Returns early with the offending state as
    /// soon as a non-finite value appears.
    pub fn advance(&mut self, state: &State, span: f64) -> State {
        let min_step = span * MIN_STEP_FRACTION;
        let mut t = 0.0;
        let mut y = *state;
        let mut h = self.h.min(span);

        while t < span {
            let remaining = span - t;
            let last = h >= remaining;
            let step = if last { remaining } else { h };

            let (y_new, err) = self.richardson_step(&y, step);
            if !y_new.is_finite() {
                return y_new;
            }

            if err <= 1.0 || step <= min_step {
                self.accepted += 1;
                y = y_new;
                if last {
                    t = span;
                } else {
                    t += step;
                    let grow = if err < 1e-10 { 2.0 } else { 0.9 * err.powf(-0.2) };
                    h = (step * grow).clamp(min_step, span);
                }
            } else {
                self.rejected += 1;
                h = (step * 0.9 * err.powf(-0.25)).max(min_step);
            }
        }

        self.h = h;
        y
    }

    /// One full RK4 step against two half steps. Returns the extrapolated
    /// state and the scaled error norm (<= 1 means within tolerance).
    fn richardson_step(&self, y: &State, h: f64) -> (State, f64) {
        let full = rk4_step(y, self.geometry, self.env, h).to_array();
        let half = rk4_step(y, self.geometry, self.env, h / 2.0);
        let two_half = rk4_step(&half, self.geometry, self.env, h / 2.0).to_array();
        let y0 = y.to_array();

        let mut better = [0.0; 6];
        let mut err_max: f64 = 0.0;
        for i in 0..6 {
            let delta = (two_half[i] - full[i]) / 15.0;
            better[i] = two_half[i] + delta;
            let scale = self.tol.atol + self.tol.rtol * y0[i].abs().max(better[i].abs());
            err_max = err_max.max(delta.abs() / scale);
        }

        (State::from_array(&better), err_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn geo() -> ProjectileGeometry {
        ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0).unwrap()
    }

    #[test]
    fn euler_step_matches_hand_computation() {
        let env = PhysicsEnvironment::ballistic(10.0).unwrap();
        let s = State::released(100.0, Vector3::new(1.0, 0.0, 0.0));
        let n = euler_step(&s, &geo(), &env, 0.1);
        assert_abs_diff_eq!(n.pos.x, 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(n.pos.z, 100.0, epsilon = 1e-15);
        assert_abs_diff_eq!(n.vel.z, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn rk4_exact_for_constant_gravity() {
        let env = PhysicsEnvironment::ballistic(9.806).unwrap();
        let s = State::released(100.0, Vector3::new(0.0, 0.0, 5.0));
        let n = rk4_step(&s, &geo(), &env, 0.5);
        let z = 100.0 + 5.0 * 0.5 - 0.5 * 9.806 * 0.25;
        assert_abs_diff_eq!(n.pos.z, z, epsilon = 1e-12);
        assert_abs_diff_eq!(n.vel.z, 5.0 - 9.806 * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn adaptive_lands_on_interval_end() {
        let env = PhysicsEnvironment::new(9.806, 1.184, 0.0, 7.272e-5, 0.7).unwrap();
        let g = geo();
        let s = State::released(500.0, Vector3::new(40.0, 0.0, 30.0));
        let mut stepper = AdaptiveStepper::new(&g, &env, Tolerances::default(), 0.05);

        // Reference: very fine RK4 over the same span.
        let mut r = s;
        for _ in 0..1000 {
            r = rk4_step(&r, &g, &env, 1e-4);
        }
        let y = stepper.advance(&s, 0.1);
        assert!(stepper.accepted > 0);
        assert_abs_diff_eq!(y.pos.z, r.pos.z, epsilon = 1e-6);
        assert_abs_diff_eq!(y.vel.x, r.vel.x, epsilon = 1e-6);
    }

    #[test]
    fn adaptive_refines_on_tight_tolerance() {
        let env = PhysicsEnvironment::new(9.806, 1.184, 0.0, 0.0, 0.0).unwrap();
        let g = geo();
        let s = State::released(1000.0, Vector3::new(300.0, 0.0, 300.0));
        let tight = Tolerances { rtol: 1e-13, atol: 1e-13 };
        let mut stepper = AdaptiveStepper::new(&g, &env, tight, 1.0);
        let y = stepper.advance(&s, 1.0);
        assert!(y.is_finite());
        assert!(stepper.accepted + stepper.rejected > 1);
    }
}
