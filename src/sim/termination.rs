use log::warn;
use serde::{Deserialize, Serialize};

use crate::dynamics::{State, Trajectory};

use super::config::Method;

// ---------------------------------------------------------------------------
// How many samples of a trajectory are physically meaningful
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Cut one past the first sample below ground. The closed-form flight
    /// time only seeds the search.
    #[default]
    ZeroCrossing,
    /// Legacy closed-form count `2·floor((-vz0 + sqrt(vz0² + 2·z0·g)) / g / h)`,
    /// kept as-is. Exact only without drag, and the factor 2 is unexplained.
    BallisticEstimate,
}

/// Ground contact, interpolated between the bracketing samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Impact {
    /// First sample with `z < 0`.
    pub index: usize,
    /// Interpolated contact time, s.
    pub time: f64,
    /// Interpolated state at contact (`z == 0` up to rounding).
    pub state: State,
}

/// Drag-free time to reach `z = 0` from altitude `z0` with vertical speed `vz0` (up positive).
pub fn ballistic_flight_time(z0: f64, vz0: f64, g: f64) -> f64 {
    (vz0 + (vz0 * vz0 + 2.0 * z0 * g).sqrt()) / g
}

/// Legacy sample-count heuristic, formula preserved verbatim.
pub fn ballistic_sample_estimate(z0: f64, vz0: f64, g: f64, dt: f64) -> usize {
    let t = (-vz0 + (vz0 * vz0 + 2.0 * z0 * g).sqrt()) / g;
    2 * (t / dt).floor().max(0.0) as usize
}

/// Locate the first sample below ground, starting the search at `guess`.
///
/// Assumes a single downward crossing: everything before the crossing is at
/// or above ground, everything after is below.
pub fn find_impact(trajectory: &Trajectory, guess: usize) -> Option<Impact> {
    let states = trajectory.states();
    if states.is_empty() {
        return None;
    }

    let mut i = guess.min(states.len() - 1);
    if states[i].pos.z >= 0.0 {
        i = (i + 1..states.len()).find(|&k| states[k].pos.z < 0.0)?;
    } else {
        while i > 0 && states[i - 1].pos.z < 0.0 {
            i -= 1;
        }
    }

    if i == 0 {
        return Some(Impact {
            index: 0,
            time: 0.0,
            state: states[0],
        });
    }

    let prev = &states[i - 1];
    let cur = &states[i];
    let frac = prev.pos.z / (prev.pos.z - cur.pos.z);
    Some(Impact {
        index: i,
        time: trajectory.time_at(i - 1) + frac * trajectory.dt(),
        state: prev.lerp(cur, frac),
    })
}

/// Valid sample count `N` for a trajectory produced by `method`, plus the
/// interpolated ground contact when one occurred.
pub fn valid_samples(
    trajectory: &Trajectory,
    method: Method,
    policy: TerminationPolicy,
    g: f64,
) -> (usize, Option<Impact>) {
    let len = trajectory.len();
    let Some(initial) = trajectory.first() else {
        return (0, None);
    };

    let guess_time = ballistic_flight_time(initial.pos.z, initial.vel.z, g);
    let guess = (guess_time / trajectory.dt()).ceil() as usize;
    let impact = find_impact(trajectory, guess);

    if method.stops_at_ground() {
        // The stepping loop already ended on the first sample below ground.
        return (len, impact);
    }

    let n = match policy {
        TerminationPolicy::ZeroCrossing => impact.map_or(len, |i| i.index + 1),
        TerminationPolicy::BallisticEstimate => {
            let est = ballistic_sample_estimate(initial.pos.z, initial.vel.z, g, trajectory.dt());
            if est > len {
                warn!("ballistic estimate of {est} samples exceeds trajectory length {len}, clamping");
            }
            est.min(len)
        }
    };
    (n, impact)
}

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Apogee,
    GroundContact,
}

/// A discrete event between samples `index - 1` and `index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightEvent {
    pub index: usize,
    pub time: f64,
    pub kind: EventKind,
}

/// Passive detectors fed consecutive samples.
pub trait EventDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind>;
}

/// Vertical velocity turning from positive to non-positive.
#[derive(Default)]
pub struct ApogeeDetector {
    fired: bool,
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if !self.fired && prev.vel.z > 0.0 && current.vel.z <= 0.0 {
            self.fired = true;
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Altitude dropping below zero.
#[derive(Default)]
pub struct GroundDetector {
    fired: bool,
}

impl EventDetector for GroundDetector {
    fn check(&mut self, prev: &State, current: &State) -> Option<EventKind> {
        if !self.fired && prev.pos.z >= 0.0 && current.pos.z < 0.0 {
            self.fired = true;
            Some(EventKind::GroundContact)
        } else {
            None
        }
    }
}

/// Run the standard detectors over the first `n` samples.
pub fn scan_events(trajectory: &Trajectory, n: usize) -> Vec<FlightEvent> {
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(ApogeeDetector::default()),
        Box::new(GroundDetector::default()),
    ];
    let states = &trajectory.states()[..n.min(trajectory.len())];
    let mut events = Vec::new();
    for (k, pair) in states.windows(2).enumerate() {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(FlightEvent {
                    index: k + 1,
                    time: trajectory.time_at(k + 1),
                    kind,
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    /// Analytic drag-free fall sampled on a grid, continued below ground.
    fn parabola(z0: f64, vz0: f64, g: f64, dt: f64, n: usize) -> Trajectory {
        let states = (0..n)
            .map(|k| {
                let t = k as f64 * dt;
                State::released(z0 + vz0 * t - 0.5 * g * t * t, Vector3::new(0.0, 0.0, vz0 - g * t))
            })
            .collect();
        Trajectory::new(dt, states)
    }

    #[test]
    fn flight_time_from_rest() {
        assert_abs_diff_eq!(ballistic_flight_time(100.0, 0.0, 9.806), 4.5162, epsilon = 1e-4);
    }

    #[test]
    fn flight_time_upward_shot() {
        // z0 = 0: t = 2·vz0/g
        assert_abs_diff_eq!(ballistic_flight_time(0.0, 19.612, 9.806), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn legacy_estimate_keeps_doubling() {
        // floor(4.5162 / 0.01) = 451, doubled
        assert_eq!(ballistic_sample_estimate(100.0, 0.0, 9.806, 0.01), 902);
    }

    #[test]
    fn impact_found_from_any_guess() {
        let traj = parabola(100.0, 0.0, 9.806, 0.01, 800);
        let expected = (4.5162_f64 / 0.01).ceil() as usize; // 452
        for guess in [0, 300, 452, 600, 10_000] {
            let imp = find_impact(&traj, guess).unwrap();
            assert_eq!(imp.index, expected, "guess {guess}");
            assert_abs_diff_eq!(imp.state.pos.z, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(imp.time, 4.5162, epsilon = 1e-3);
        }
    }

    #[test]
    fn no_impact_when_still_airborne() {
        let traj = parabola(100.0, 0.0, 9.806, 0.01, 100);
        assert!(find_impact(&traj, 50).is_none());
        let (n, imp) = valid_samples(&traj, Method::Adaptive, TerminationPolicy::ZeroCrossing, 9.806);
        assert_eq!(n, 100);
        assert!(imp.is_none());
    }

    #[test]
    fn zero_crossing_count_includes_first_negative_sample() {
        let traj = parabola(100.0, 0.0, 9.806, 0.01, 800);
        let (n, imp) = valid_samples(&traj, Method::Adaptive, TerminationPolicy::ZeroCrossing, 9.806);
        assert_eq!(n, imp.unwrap().index + 1);
        assert!(traj.states()[n - 1].pos.z < 0.0);
        assert!(traj.states()[n - 2].pos.z >= 0.0);
    }

    #[test]
    fn ballistic_policy_clamps_to_length() {
        let traj = parabola(100.0, 0.0, 9.806, 0.01, 800);
        let (n, _) = valid_samples(&traj, Method::Adaptive, TerminationPolicy::BallisticEstimate, 9.806);
        assert_eq!(n, 800);
    }

    #[test]
    fn fixed_step_keeps_full_length() {
        let traj = parabola(100.0, 0.0, 9.806, 0.01, 453);
        let (n, _) = valid_samples(&traj, Method::Euler, TerminationPolicy::BallisticEstimate, 9.806);
        assert_eq!(n, 453);
    }

    #[test]
    fn events_detect_apogee_then_ground() {
        let traj = parabola(0.0, 9.806, 9.806, 0.01, 300);
        let events = scan_events(&traj, traj.len());
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Apogee, EventKind::GroundContact]);
        assert_abs_diff_eq!(events[0].time, 1.0, epsilon = 0.011);
        assert_abs_diff_eq!(events[1].time, 2.0, epsilon = 0.011);
    }
}
