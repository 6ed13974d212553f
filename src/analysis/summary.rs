use serde::Serialize;

use crate::dynamics::Trajectory;
use crate::error::SimError;
use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

use super::energy::energies;

/// Scalar report for one run over its first `samples` samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightSummary {
    /// Highest altitude, m.
    pub apogee: f64,
    /// Distance from the origin at the last sample, m.
    pub range: f64,
    pub impact_speed: f64,
    pub final_kinetic_energy: f64,
    /// Magnitude of the mechanical energy change, J.
    pub dissipated_work: f64,
    /// Final minus initial mechanical energy, J. Negative when energy was lost.
    pub mechanical_energy_change: f64,
    pub samples: usize,
    /// Time of the last sample, s.
    pub flight_time: f64,
}

impl FlightSummary {
    /// Summarize samples `0..n`; `n` is clamped to `[1, len]` and the last
    /// sample is `n - 1`.
    pub fn compute(
        trajectory: &Trajectory,
        n: usize,
        geometry: &ProjectileGeometry,
        env: &PhysicsEnvironment,
    ) -> Result<Self, SimError> {
        let len = trajectory.len();
        if len == 0 {
            return Err(SimError::IntegratorConfig("trajectory has no samples".into()));
        }
        let n = n.clamp(1, len);
        let states = &trajectory.states()[..n];
        let first = &states[0];
        let last = &states[n - 1];

        let apogee = states
            .iter()
            .map(|s| s.pos.z)
            .fold(f64::NEG_INFINITY, f64::max);
        let e0 = energies(first, geometry, env);
        let e1 = energies(last, geometry, env);
        for (index, e) in [(0, &e0), (n - 1, &e1)] {
            if !e.is_finite() {
                return Err(SimError::NumericalDivergence {
                    index,
                    time: trajectory.time_at(index),
                    quantity: "mechanical_energy".into(),
                });
            }
        }
        let change = e1.mechanical - e0.mechanical;

        let summary = FlightSummary {
            apogee,
            range: last.pos.norm(),
            impact_speed: last.vel.norm(),
            final_kinetic_energy: e1.kinetic,
            dissipated_work: change.abs(),
            mechanical_energy_change: change,
            samples: n,
            flight_time: trajectory.time_at(n - 1),
        };
        summary.check(trajectory.dt())?;
        Ok(summary)
    }

    fn check(&self, dt: f64) -> Result<(), SimError> {
        let fields = [
            ("apogee", self.apogee),
            ("range", self.range),
            ("impact_speed", self.impact_speed),
            ("final_kinetic_energy", self.final_kinetic_energy),
            ("dissipated_work", self.dissipated_work),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(SimError::NumericalDivergence {
                index: self.samples - 1,
                time: (self.samples - 1) as f64 * dt,
                quantity: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }
}
