use nalgebra::Vector3;
use serde::Serialize;

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Translational state: position and velocity
// ---------------------------------------------------------------------------

/// Frame: local cartesian, origin on the reference surface, z = altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct State {
    pub pos: Vector3<f64>, // m
    pub vel: Vector3<f64>, // m/s
}

impl State {
    pub fn new(pos: Vector3<f64>, vel: Vector3<f64>) -> Self {
        Self { pos, vel }
    }

    /// Released from altitude `z0` above the origin with velocity `vel`.
    pub fn released(z0: f64, vel: Vector3<f64>) -> Self {
        Self {
            pos: Vector3::new(0.0, 0.0, z0),
            vel,
        }
    }

    /// Starting state for a run: finite, at or above ground.
    pub fn validated(self) -> Result<Self, SimError> {
        if !self.is_finite() {
            return Err(SimError::InvalidInitialState(format!(
                "non-finite component in {:?}",
                self.to_array()
            )));
        }
        if self.pos.z < 0.0 {
            return Err(SimError::InvalidInitialState(format!(
                "initial altitude must be >= 0, got {}",
                self.pos.z
            )));
        }
        Ok(self)
    }

    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        State {
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|c| c.is_finite())
    }

    /// Component by flat index: 0..3 position, 3..6 velocity.
    pub fn component(&self, i: usize) -> f64 {
        if i < 3 {
            self.pos[i]
        } else {
            self.vel[i - 3]
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.pos.x, self.pos.y, self.pos.z,
            self.vel.x, self.vel.y, self.vel.z,
        ]
    }

    pub fn from_array(a: &[f64; 6]) -> Self {
        Self {
            pos: Vector3::new(a[0], a[1], a[2]),
            vel: Vector3::new(a[3], a[4], a[5]),
        }
    }

    /// Linear blend, `frac` in [0, 1].
    pub fn lerp(&self, other: &State, frac: f64) -> State {
        State {
            pos: self.pos.lerp(&other.pos, frac),
            vel: self.vel.lerp(&other.vel, frac),
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: Vector3<f64>, // velocity
    pub dvel: Vector3<f64>, // acceleration
}

// ---------------------------------------------------------------------------
// Sampled trajectory
// ---------------------------------------------------------------------------

/// States sampled every `dt` seconds; sample `k` sits at `t = k·dt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dt: f64,
    states: Vec<State>,
}

impl Trajectory {
    pub fn new(dt: f64, states: Vec<State>) -> Self {
        Self { dt, states }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, k: usize) -> Option<&State> {
        self.states.get(k)
    }

    pub fn first(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    pub fn time_at(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }

    /// Iterate `(t_k, state_k)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(move |(k, s)| (k as f64 * self.dt, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_indexing_matches_array() {
        let s = State::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0));
        let a = s.to_array();
        for i in 0..6 {
            assert_eq!(s.component(i), a[i]);
        }
        assert_eq!(State::from_array(&a), s);
    }

    #[test]
    fn serializes_as_flat_vectors() {
        let s = State::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, -6.0));
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(json, serde_json::json!({ "pos": [1.0, 2.0, 3.0], "vel": [4.0, 5.0, -6.0] }));
    }

    #[test]
    fn negative_initial_altitude_rejected() {
        let err = State::released(-0.5, Vector3::zeros()).validated().unwrap_err();
        assert!(matches!(err, SimError::InvalidInitialState(_)));
        assert!(State::released(0.0, Vector3::zeros()).validated().is_ok());
    }

    #[test]
    fn non_finite_initial_state_rejected() {
        let s = State::released(10.0, Vector3::new(f64::NAN, 0.0, 0.0));
        assert!(s.validated().is_err());
    }

    #[test]
    fn trajectory_time_grid() {
        let traj = Trajectory::new(0.25, vec![State::released(1.0, Vector3::zeros()); 4]);
        let times: Vec<f64> = traj.iter().map(|(t, _)| t).collect();
        assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(traj.time_at(3), 0.75);
    }

    #[test]
    fn lerp_midpoint() {
        let a = State::released(10.0, Vector3::new(0.0, 0.0, -2.0));
        let b = State::released(-10.0, Vector3::new(0.0, 0.0, -4.0));
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.pos.z, 0.0);
        assert_eq!(m.vel.z, -3.0);
    }
}
