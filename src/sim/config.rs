use serde::{Deserialize, Serialize};

use crate::error::SimError;

use super::termination::TerminationPolicy;

// ---------------------------------------------------------------------------
// Integration strategy
// ---------------------------------------------------------------------------

/// Read from a name (`"odeint"` is an alias of `"adaptive"`) or from the
/// legacy numeric codes `1` (Euler) and `2` (adaptive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", try_from = "MethodTag")]
pub enum Method {
    /// Explicit Euler, stops at the first sample below ground.
    Euler,
    /// Classical RK4, same stopping rule as Euler.
    Rk4,
    /// Error-controlled sub-stepping onto a fixed output grid; runs to `max_time`.
    #[default]
    Adaptive,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MethodTag {
    Code(u64),
    Name(String),
}

impl TryFrom<MethodTag> for Method {
    type Error = String;

    fn try_from(tag: MethodTag) -> Result<Self, Self::Error> {
        match tag {
            MethodTag::Code(1) => Ok(Method::Euler),
            MethodTag::Code(2) => Ok(Method::Adaptive),
            MethodTag::Code(c) => Err(format!("unknown method code {c}, expected 1 or 2")),
            MethodTag::Name(name) => match name.as_str() {
                "euler" => Ok(Method::Euler),
                "rk4" => Ok(Method::Rk4),
                "adaptive" | "odeint" => Ok(Method::Adaptive),
                other => Err(format!(
                    "unknown method \"{other}\", expected euler, rk4 or adaptive"
                )),
            },
        }
    }
}

impl Method {
    /// Fixed-step strategies stop on their own at ground contact.
    pub fn stops_at_ground(self) -> bool {
        matches!(self, Method::Euler | Method::Rk4)
    }

    pub fn label(self) -> &'static str {
        match self {
            Method::Euler => "Explicit Euler",
            Method::Rk4 => "Runge-Kutta 4",
            Method::Adaptive => "Adaptive RK4 (step doubling)",
        }
    }
}

// ---------------------------------------------------------------------------
// Error tolerances for the adaptive strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { rtol: 1e-9, atol: 1e-9 }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub dt: f64,       // output / fixed step, s
    pub max_time: f64, // hard stop, s
    pub method: Method,
    pub termination: TerminationPolicy,
    pub tolerances: Tolerances,
    pub threads: Option<usize>, // batch worker pool size, None = rayon default
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.001,
            max_time: 1000.0,
            method: Method::default(),
            termination: TerminationPolicy::default(),
            tolerances: Tolerances::default(),
            threads: None,
        }
    }
}

impl SimConfig {
    pub fn new(dt: f64, max_time: f64, method: Method) -> Self {
        Self {
            dt,
            max_time,
            method,
            ..Self::default()
        }
    }

    /// Number of grid points `floor(max_time / dt)`.
    /// A relative nudge keeps exact ratios such as 4.0 / 0.01 from flooring to 399.
    pub fn sample_count(&self) -> usize {
        let ratio = self.max_time / self.dt;
        (ratio * (1.0 + 1e-12)).floor() as usize
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::IntegratorConfig(format!(
                "step size must be > 0, got {}",
                self.dt
            )));
        }
        if !self.max_time.is_finite() || self.max_time <= 0.0 {
            return Err(SimError::IntegratorConfig(format!(
                "max time must be > 0, got {}",
                self.max_time
            )));
        }
        if self.max_time / self.dt >= usize::MAX as f64 {
            return Err(SimError::IntegratorConfig(format!(
                "step {} s is too small for {} s, sample count overflows",
                self.dt, self.max_time
            )));
        }
        if self.sample_count() == 0 {
            return Err(SimError::IntegratorConfig(format!(
                "step {} s leaves no samples within {} s",
                self.dt, self.max_time
            )));
        }
        let Tolerances { rtol, atol } = self.tolerances;
        if !(rtol.is_finite() && atol.is_finite() && rtol > 0.0 && atol > 0.0) {
            return Err(SimError::IntegratorConfig(format!(
                "tolerances must be > 0, got rtol={rtol} atol={atol}"
            )));
        }
        if self.threads == Some(0) {
            return Err(SimError::IntegratorConfig(
                "thread count must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
