use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, SimError};

// ---------------------------------------------------------------------------
// Ambient parameters shared by every projectile of a run
// ---------------------------------------------------------------------------

/// Planet and fluid the bodies fall through. Built once, then only borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicsEnvironment {
    g: f64,     // m/s^2
    rho: f64,   // kg/m^3
    eta: f64,   // kg/(m·s), carried but not used by the force model
    omega: f64, // rad/s
    lat: f64,   // rad
}

impl PhysicsEnvironment {
    pub fn new(g: f64, rho: f64, eta: f64, omega: f64, lat: f64) -> Result<Self, SimError> {
        let g = require_positive("gravity", g).map_err(SimError::InvalidEnvironment)?;
        let rho = require_non_negative("fluid density", rho).map_err(SimError::InvalidEnvironment)?;
        let eta = require_non_negative("viscosity", eta).map_err(SimError::InvalidEnvironment)?;
        let omega =
            require_non_negative("rotation rate", omega).map_err(SimError::InvalidEnvironment)?;
        if !lat.is_finite() {
            return Err(SimError::InvalidEnvironment(format!(
                "latitude must be finite, got {lat}"
            )));
        }
        Ok(Self { g, rho, eta, omega, lat })
    }

    /// Vacuum, no rotation.
    pub fn ballistic(g: f64) -> Result<Self, SimError> {
        Self::new(g, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Latitude in radians.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn has_fluid(&self) -> bool {
        self.rho != 0.0
    }

    pub fn is_rotating(&self) -> bool {
        self.omega != 0.0
    }
}

// ---------------------------------------------------------------------------
// Preset environments
// ---------------------------------------------------------------------------

/// Named environments selectable from a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    EarthAir,
    EarthVacuum,
    Moon,
    Mars,
    Custom,
}

/// Raw environment values before validation; latitude kept in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentParams {
    pub g: f64,
    pub rho: f64,
    pub eta: f64,
    pub omega: f64,
    pub latitude_deg: f64,
}

impl EnvironmentParams {
    pub fn build(&self) -> Result<PhysicsEnvironment, SimError> {
        PhysicsEnvironment::new(
            self.g,
            self.rho,
            self.eta,
            self.omega,
            self.latitude_deg.to_radians(),
        )
    }
}

impl Preset {
    pub fn params(self) -> EnvironmentParams {
        match self {
            Preset::EarthAir => EnvironmentParams {
                g: 9.806,
                rho: 1.184,
                eta: 0.018e5,
                omega: 7.272e-5,
                latitude_deg: 45.0,
            },
            Preset::EarthVacuum | Preset::Custom => EnvironmentParams {
                g: 9.806,
                rho: 0.0,
                eta: 0.0,
                omega: 0.0,
                latitude_deg: 45.0,
            },
            Preset::Moon => EnvironmentParams {
                g: 1.622,
                rho: 0.0,
                eta: 0.0,
                omega: 0.0,
                latitude_deg: 45.0,
            },
            Preset::Mars => EnvironmentParams {
                g: 3.711,
                rho: 0.020,
                eta: 1.48e5,
                omega: 0.0,
                latitude_deg: 45.0,
            },
        }
    }

    pub fn environment(self) -> PhysicsEnvironment {
        let p = self.params();
        // Preset tables are in range by construction.
        PhysicsEnvironment {
            g: p.g,
            rho: p.rho,
            eta: p.eta,
            omega: p.omega,
            lat: p.latitude_deg.to_radians(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::EarthAir => "Earth, standard air",
            Preset::EarthVacuum => "Earth, vacuum",
            Preset::Moon => "Moon",
            Preset::Mars => "Mars",
            Preset::Custom => "Custom",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_negative_density() {
        let err = PhysicsEnvironment::new(9.806, -1.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidEnvironment(_)));
    }

    #[test]
    fn rejects_negative_rotation_and_viscosity() {
        assert!(PhysicsEnvironment::new(9.806, 0.0, -0.1, 0.0, 0.0).is_err());
        assert!(PhysicsEnvironment::new(9.806, 0.0, 0.0, -7e-5, 0.0).is_err());
    }

    #[test]
    fn rejects_non_positive_gravity() {
        assert!(PhysicsEnvironment::ballistic(0.0).is_err());
        assert!(PhysicsEnvironment::ballistic(f64::NAN).is_err());
    }

    #[test]
    fn earth_air_preset_matches_table() {
        let env = Preset::EarthAir.environment();
        assert_abs_diff_eq!(env.g(), 9.806);
        assert_abs_diff_eq!(env.rho(), 1.184);
        assert_abs_diff_eq!(env.lat(), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert!(env.has_fluid());
        assert!(env.is_rotating());
    }

    #[test]
    fn presets_pass_validation() {
        for p in [Preset::EarthAir, Preset::EarthVacuum, Preset::Moon, Preset::Mars, Preset::Custom] {
            assert_eq!(p.params().build().unwrap(), p.environment());
        }
    }
}
