//! Error types for the playground engine.
//!
//! Every variant is a configuration or construction problem caught at the
//! boundary. Nothing here is retried: the simulation is deterministic for a
//! given input, so a failure means the input was wrong.

use thiserror::Error;

/// Errors that can occur while building or driving a simulation.
#[derive(Debug, Error)]
pub enum BurstError {
    /// Radius is zero, negative or not finite. Mass derives from it.
    #[error("Invalid radius: {0} (must be finite and > 0)")]
    InvalidRadius(f64),

    /// A main body must split into at least one fragment.
    #[error("Invalid fragment count: must be at least 1")]
    InvalidFragmentCount,

    /// A numeric parameter is outside its accepted range.
    #[error("Invalid parameter `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Only main bodies know which wall they launch from.
    #[error("Body has no launch side (not a main body)")]
    NoLaunchSide,

    /// A state vector (position, velocity) contains NaN or infinity.
    #[error("Non-finite value in {0}")]
    NonFiniteState(&'static str),

    /// A colour string could not be parsed as `#rgb` or `#rrggbb`.
    #[error("Invalid colour: {0:?}")]
    InvalidColor(String),

    /// No preset with this name in the config directory.
    #[error("Config not found: {0}")]
    ConfigNotFound(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration snapshot could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result type for playground operations.
pub type BurstResult<T> = std::result::Result<T, BurstError>;

impl BurstError {
    pub(crate) fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        BurstError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Reject a parameter unless it is finite and inside `[min, max]`.
pub(crate) fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> BurstResult<f64> {
    if !value.is_finite() {
        return Err(BurstError::parameter(name, value, "must be finite"));
    }
    if value < min || value > max {
        return Err(BurstError::parameter(name, value, "out of range"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BurstError::InvalidRadius(-2.0);
        assert!(format!("{err}").contains("-2"));

        let err = BurstError::parameter("friction", 1.5, "out of range");
        assert_eq!(
            format!("{err}"),
            "Invalid parameter `friction`: 1.5 (out of range)"
        );
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("elasticity", 0.5, 0.0, 1.0).is_ok());
        assert!(check_range("elasticity", 1.0, 0.0, 1.0).is_ok());
        assert!(check_range("elasticity", 1.01, 0.0, 1.0).is_err());
        assert!(check_range("elasticity", f64::NAN, 0.0, 1.0).is_err());
    }
}
