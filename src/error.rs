use thiserror::Error;

/// Failure kinds surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),

    #[error("Integrator configuration error: {0}")]
    IntegratorConfig(String),

    #[error("Numerical divergence at sample {index} (t = {time:.4} s): non-finite {quantity}")]
    NumericalDivergence {
        index: usize,
        time: f64,
        quantity: String,
    },
}

impl SimError {
    pub fn is_divergence(&self) -> bool {
        matches!(self, SimError::NumericalDivergence { .. })
    }
}

/// Ensure `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        Err(format!("{name} must be finite, got {value}"))
    } else if value <= 0.0 {
        Err(format!("{name} must be > 0, got {value}"))
    } else {
        Ok(value)
    }
}

/// Ensure `value` is finite and not negative.
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        Err(format!("{name} must be finite, got {value}"))
    } else if value < 0.0 {
        Err(format!("{name} must be >= 0, got {value}"))
    } else {
        Ok(value)
    }
}
