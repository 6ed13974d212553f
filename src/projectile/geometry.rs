use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{require_non_negative, require_positive, SimError};
use crate::physics::aerodynamics::DEFAULT_DRAG_COEFFICIENT;

// ---------------------------------------------------------------------------
// Body geometry (cylinder with hemispherical caps)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileGeometry {
    volume: f64,           // m^3
    mass: f64,             // kg
    cross_section: f64,    // m^2, frontal area
    drag_coefficient: f64, // dimensionless
}

impl ProjectileGeometry {
    /// Direct construction from already derived quantities.
    pub fn new(volume: f64, mass: f64, cross_section: f64) -> Result<Self, SimError> {
        let volume = require_non_negative("volume", volume).map_err(SimError::InvalidGeometry)?;
        let mass = require_positive("mass", mass).map_err(SimError::InvalidGeometry)?;
        let cross_section =
            require_positive("cross section", cross_section).map_err(SimError::InvalidGeometry)?;
        Ok(Self {
            volume,
            mass,
            cross_section,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
        })
    }

    /// Derive volume and frontal area from diameter and length:
    /// `V = π·D³/12 + (π/4)·D²·L`, `S = (π/4)·D²`.
    pub fn from_dimensions(diameter: f64, length: f64, mass: f64) -> Result<Self, SimError> {
        let d = require_positive("diameter", diameter).map_err(SimError::InvalidGeometry)?;
        let l = require_positive("length", length).map_err(SimError::InvalidGeometry)?;
        let volume = PI * d.powi(3) / 12.0 + PI / 4.0 * d * d * l;
        let cross_section = PI / 4.0 * d * d;
        Self::new(volume, mass, cross_section)
    }

    pub fn with_drag_coefficient(mut self, cx: f64) -> Result<Self, SimError> {
        self.drag_coefficient =
            require_non_negative("drag coefficient", cx).map_err(SimError::InvalidGeometry)?;
        Ok(self)
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn cross_section(&self) -> f64 {
        self.cross_section
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }
}

// ---------------------------------------------------------------------------
// Geometry builder
// ---------------------------------------------------------------------------

pub struct GeometryBuilder {
    diameter: f64,
    length: f64,
    mass: f64,
    drag_coefficient: f64,
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self {
            diameter: 0.1,
            length: 0.1,
            mass: 1.0,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
        }
    }

    pub fn diameter(mut self, v: f64) -> Self { self.diameter = v; self }
    pub fn length(mut self, v: f64) -> Self { self.length = v; self }
    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn drag_coefficient(mut self, v: f64) -> Self { self.drag_coefficient = v; self }

    pub fn build(self) -> Result<ProjectileGeometry, SimError> {
        ProjectileGeometry::from_dimensions(self.diameter, self.length, self.mass)?
            .with_drag_coefficient(self.drag_coefficient)
    }
}
