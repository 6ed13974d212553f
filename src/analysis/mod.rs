pub mod energy;
pub mod extract;
pub mod quantity;
pub mod summary;

pub use energy::{energies, Energies};
pub use extract::{extract, space_curve, Series, SpaceCurve};
pub use quantity::{Axis, EnergyKind, Labels, Plane, Quantity, VectorKind};
pub use summary::FlightSummary;
