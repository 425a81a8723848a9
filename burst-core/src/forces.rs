//! Forces acting on every body each tick.
//!
//! The playground has two: a constant downward pull and a velocity damping
//! that stands in for air/rolling friction. Both are expressed in units
//! calibrated to a 60 Hz reference frame, so they are rescaled by `dt · 60`
//! to stay frame-rate independent:
//!
//! ```text
//! Δv_y     = gravity · dt · 60
//! v_after  = v_before · (1 − friction)^(dt · 60)
//! ```
//!
//! At `dt = 1/60` the damping reduces to the single-step factor
//! `(1 − friction)`. The power form matters: a linear approximation drifts
//! as the frame rate varies.

use crate::error::{check_range, BurstError, BurstResult};
use crate::integrator::ForceModel;
use crate::types::{constants, Body, Vec2};

/// Gravity plus exponential velocity damping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaygroundForces {
    /// Velocity gained per reference frame, along +y (down on screen)
    pub gravity: f64,

    /// Fraction of velocity lost per reference frame, in [0, 1)
    pub friction: f64,
}

impl Default for PlaygroundForces {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            friction: 0.02,
        }
    }
}

impl PlaygroundForces {
    /// Create a validated force model.
    pub fn new(gravity: f64, friction: f64) -> BurstResult<Self> {
        if !gravity.is_finite() {
            return Err(BurstError::parameter("gravity", gravity, "must be finite"));
        }
        check_range("friction", friction, 0.0, 1.0)?;
        if friction >= 1.0 {
            return Err(BurstError::parameter("friction", friction, "must be < 1"));
        }
        Ok(Self { gravity, friction })
    }

    /// No gravity, no friction (for testing).
    pub fn none() -> Self {
        Self {
            gravity: 0.0,
            friction: 0.0,
        }
    }
}

impl ForceModel for PlaygroundForces {
    fn velocity_change(&self, _body: &Body, dt: f64) -> Vec2 {
        Vec2::new(0.0, self.gravity * dt * constants::REFERENCE_RATE)
    }

    fn damping(&self, _body: &Body, dt: f64) -> f64 {
        (1.0 - self.friction).powf(dt * constants::REFERENCE_RATE)
    }
}

// =============================================================================
// Tests
// =============================================================================
