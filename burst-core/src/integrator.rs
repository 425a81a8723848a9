//! Per-body motion update.
//!
//! One semi-implicit Euler step per tick, in reference-frame units:
//!
//! ```text
//! 1. v += Δv(gravity, dt)
//! 2. v *= damping(friction, dt)
//! 3. x += v · dt · 60
//! 4. reflect off walls, per axis
//! ```
//!
//! Wall handling clamps the centre back to `radius` from the wall and flips
//! that axis's velocity scaled by elasticity. The axes are checked
//! independently, so a corner hit corrects both in the same tick.

use crate::types::{constants, Body, Vec2};

/// Trait for the forces applied to a body during a tick.
///
/// Implementations provide the physics model (gravity, friction, ...).
pub trait ForceModel {
    /// Velocity gained over `dt` seconds.
    fn velocity_change(&self, body: &Body, dt: f64) -> Vec2;

    /// Factor the velocity is multiplied by over `dt` seconds.
    /// Default implementation: no damping.
    fn damping(&self, _body: &Body, _dt: f64) -> f64 {
        1.0
    }
}

/// Integrator advancing one body at a time inside a rectangular arena.
pub struct FrameIntegrator;

impl FrameIntegrator {
    /// Advance `body` by `dt` seconds and bounce it off the arena walls.
    ///
    /// # Arguments
    /// * `body` - Body to update in place
    /// * `forces` - Force model providing gravity and damping
    /// * `width`, `height` - Arena size; walls at 0 and at these values
    /// * `elasticity` - Share of the normal speed kept after a wall bounce
    /// * `dt` - Time step in seconds
    pub fn advance<F: ForceModel>(
        body: &mut Body,
        forces: &F,
        width: f64,
        height: f64,
        elasticity: f64,
        dt: f64,
    ) {
        body.velocity += forces.velocity_change(body, dt);
        body.velocity = body.velocity * forces.damping(body, dt);
        body.position += body.velocity * (dt * constants::REFERENCE_RATE);

        Self::reflect(body, width, height, elasticity);
    }

    /// Clamp a body that crossed a wall back inside and reflect its velocity.
    ///
    /// Assumes the body fits (`Body::fits_in`). A wider body is pinned to
    /// the left or top wall.
    pub fn reflect(body: &mut Body, width: f64, height: f64, elasticity: f64) {
        let r = body.radius();

        if body.position.x - r < 0.0 {
            body.position.x = r;
            body.velocity.x = -body.velocity.x * elasticity;
        } else if body.position.x + r > width {
            body.position.x = width - r;
            body.velocity.x = -body.velocity.x * elasticity;
        }

        if body.position.y - r < 0.0 {
            body.position.y = r;
            body.velocity.y = -body.velocity.y * elasticity;
        } else if body.position.y + r > height {
            body.position.y = height - r;
            body.velocity.y = -body.velocity.y * elasticity;
        }
    }

    /// Fade the collision flash. Cosmetic only.
    pub fn decay_flash(body: &mut Body, dt: f64) {
        body.visual.decay(dt);
    }
}

// =============================================================================
// Tests
// =============================================================================
