use crate::dynamics::{State, Trajectory};
use crate::physics::PhysicsEnvironment;
use crate::projectile::ProjectileGeometry;

use super::energy::energies;
use super::quantity::{Axis, Labels, Quantity, VectorKind};

/// Plot-ready series for one quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub labels: Labels,
}

impl Series {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// `[x, y]` pairs, the shape plotting front ends take.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y]).collect()
    }
}

/// Extract `quantity` over the first `n` samples (clamped to the trajectory
/// length). Time series use `x[k] = k·dt`.
pub fn extract(
    quantity: Quantity,
    trajectory: &Trajectory,
    n: usize,
    geometry: &ProjectileGeometry,
    env: &PhysicsEnvironment,
) -> Series {
    let states = &trajectory.states()[..n.min(trajectory.len())];
    let labels = quantity.labels();

    let time = |len: usize| (0..len).map(|k| trajectory.time_at(k)).collect::<Vec<f64>>();
    let (x, y) = match quantity {
        Quantity::Trajectory(plane) => {
            let (h, v) = plane.axes();
            (column(states, h), column(states, v))
        }
        Quantity::Position(a) => (time(states.len()), column(states, a)),
        Quantity::Velocity(a) => (
            time(states.len()),
            states.iter().map(|s| s.vel[a.index()]).collect(),
        ),
        Quantity::Norm(VectorKind::Position) => (
            time(states.len()),
            states.iter().map(|s| s.pos.norm()).collect(),
        ),
        Quantity::Norm(VectorKind::Velocity) => (
            time(states.len()),
            states.iter().map(|s| s.vel.norm()).collect(),
        ),
        Quantity::Energy(kind) => (
            time(states.len()),
            states
                .iter()
                .map(|s| energies(s, geometry, env).get(kind))
                .collect(),
        ),
    };
    Series { x, y, labels }
}

fn column(states: &[State], axis: Axis) -> Vec<f64> {
    states.iter().map(|s| s.pos[axis.index()]).collect()
}

/// Path through space over the first `n` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub axis_labels: [String; 3],
    pub title: String,
}

pub fn space_curve(trajectory: &Trajectory, n: usize) -> SpaceCurve {
    let states = &trajectory.states()[..n.min(trajectory.len())];
    SpaceCurve {
        x: column(states, Axis::X),
        y: column(states, Axis::Y),
        z: column(states, Axis::Z),
        axis_labels: Axis::ALL.map(|a| format!("{} (m)", a.name())),
        title: "Trajectory in space".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::quantity::{EnergyKind, Plane};
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn sample_trajectory() -> Trajectory {
        let states = (0..50)
            .map(|k| {
                let t = k as f64 * 0.1;
                State::new(
                    Vector3::new(2.0 * t, -t, 50.0 - 4.903 * t * t),
                    Vector3::new(2.0, -1.0, -9.806 * t),
                )
            })
            .collect();
        Trajectory::new(0.1, states)
    }

    fn setup() -> (ProjectileGeometry, PhysicsEnvironment) {
        (
            ProjectileGeometry::from_dimensions(0.1, 0.1, 1.0).unwrap(),
            PhysicsEnvironment::ballistic(9.806).unwrap(),
        )
    }

    #[test]
    fn time_axis_is_exact_multiple_of_dt() {
        let (geo, env) = setup();
        let traj = sample_trajectory();
        for q in Quantity::ALL.into_iter().filter(|q| q.is_time_series()) {
            let s = extract(q, &traj, 30, &geo, &env);
            assert_eq!(s.len(), 30);
            for (k, &x) in s.x.iter().enumerate() {
                assert_eq!(x, k as f64 * 0.1);
            }
            assert!(s.x.windows(2).all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn plane_reproduces_raw_columns() {
        let (geo, env) = setup();
        let traj = sample_trajectory();
        let s = extract(Quantity::Trajectory(Plane::YZ), &traj, 50, &geo, &env);
        for (k, st) in traj.states().iter().enumerate() {
            assert_eq!(s.x[k], st.pos.y);
            assert_eq!(s.y[k], st.pos.z);
        }
        assert_eq!(s.labels.x, "y (m)");
    }

    #[test]
    fn velocity_and_norm_components() {
        let (geo, env) = setup();
        let traj = sample_trajectory();
        let vz = extract(Quantity::Velocity(Axis::Z), &traj, 50, &geo, &env);
        assert_abs_diff_eq!(vz.y[10], -9.806, epsilon = 1e-12);
        let speed = extract(Quantity::Norm(VectorKind::Velocity), &traj, 50, &geo, &env);
        assert_abs_diff_eq!(speed.y[0], 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn mechanical_energy_is_sum() {
        let (geo, env) = setup();
        let traj = sample_trajectory();
        let ek = extract(Quantity::Energy(EnergyKind::Kinetic), &traj, 50, &geo, &env);
        let ep = extract(Quantity::Energy(EnergyKind::Potential), &traj, 50, &geo, &env);
        let em = extract(Quantity::Energy(EnergyKind::Mechanical), &traj, 50, &geo, &env);
        for k in 0..50 {
            assert_abs_diff_eq!(em.y[k], ek.y[k] + ep.y[k], epsilon = 1e-9);
        }
    }

    #[test]
    fn count_is_clamped_to_length() {
        let (geo, env) = setup();
        let traj = sample_trajectory();
        let s = extract(Quantity::Position(Axis::X), &traj, 10_000, &geo, &env);
        assert_eq!(s.len(), traj.len());
        assert_eq!(space_curve(&traj, 10_000).z.len(), traj.len());
    }

    #[test]
    fn space_curve_columns() {
        let traj = sample_trajectory();
        let c = space_curve(&traj, 5);
        let xs: Vec<f64> = traj.states()[..5].iter().map(|s| s.pos.x).collect();
        assert_eq!(c.x, xs);
        assert_eq!(c.y.len(), 5);
        assert_eq!(c.axis_labels[2], "z (m)");
    }
}
