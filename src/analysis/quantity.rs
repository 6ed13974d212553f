use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// What to extract from a trajectory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Coordinate plane, first axis horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::XY, Plane::XZ, Plane::YZ];

    pub fn axes(self) -> (Axis, Axis) {
        match self {
            Plane::XY => (Axis::X, Axis::Y),
            Plane::XZ => (Axis::X, Axis::Z),
            Plane::YZ => (Axis::Y, Axis::Z),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    Position,
    Velocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyKind {
    Kinetic,
    Potential,
    Mechanical,
}

/// A plottable quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Position(Axis),
    Velocity(Axis),
    /// Planar projection of the path, no time axis.
    Trajectory(Plane),
    Norm(VectorKind),
    Energy(EnergyKind),
}

/// Axis titles (with units) and plot title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub x: String,
    pub y: String,
    pub title: String,
}

const TIME_LABEL: &str = "t (s)";

impl Quantity {
    pub const ALL: [Quantity; 14] = [
        Quantity::Position(Axis::X),
        Quantity::Position(Axis::Y),
        Quantity::Position(Axis::Z),
        Quantity::Velocity(Axis::X),
        Quantity::Velocity(Axis::Y),
        Quantity::Velocity(Axis::Z),
        Quantity::Trajectory(Plane::XY),
        Quantity::Trajectory(Plane::XZ),
        Quantity::Trajectory(Plane::YZ),
        Quantity::Norm(VectorKind::Position),
        Quantity::Norm(VectorKind::Velocity),
        Quantity::Energy(EnergyKind::Kinetic),
        Quantity::Energy(EnergyKind::Potential),
        Quantity::Energy(EnergyKind::Mechanical),
    ];

    /// Whether the horizontal axis is time.
    pub fn is_time_series(self) -> bool {
        !matches!(self, Quantity::Trajectory(_))
    }

    pub fn labels(self) -> Labels {
        match self {
            Quantity::Position(a) => Labels {
                x: TIME_LABEL.into(),
                y: format!("{}(t) (m)", a.name()),
                title: format!("Position along the (O{}) axis versus time", a.name()),
            },
            Quantity::Velocity(a) => Labels {
                x: TIME_LABEL.into(),
                y: format!("v{}(t) (m/s)", a.name()),
                title: format!("Velocity along the (O{}) axis versus time", a.name()),
            },
            Quantity::Trajectory(p) => {
                let (h, v) = p.axes();
                Labels {
                    x: format!("{} (m)", h.name()),
                    y: format!("{}({}) (m)", v.name(), h.name()),
                    title: format!("Trajectory in the (O{}{}) plane", h.name(), v.name()),
                }
            }
            Quantity::Norm(VectorKind::Position) => Labels {
                x: TIME_LABEL.into(),
                y: "r(t) (m)".into(),
                title: "Norm of the position vector versus time".into(),
            },
            Quantity::Norm(VectorKind::Velocity) => Labels {
                x: TIME_LABEL.into(),
                y: "v(t) (m/s)".into(),
                title: "Norm of the velocity vector versus time".into(),
            },
            Quantity::Energy(kind) => {
                let (sym, name) = match kind {
                    EnergyKind::Kinetic => ("Ek", "Kinetic"),
                    EnergyKind::Potential => ("Ep", "Potential"),
                    EnergyKind::Mechanical => ("Em", "Mechanical"),
                };
                Labels {
                    x: TIME_LABEL.into(),
                    y: format!("{sym}(t) (J)"),
                    title: format!("{name} energy versus time"),
                }
            }
        }
    }
}
