//! Impulse-based resolution of overlapping body pairs.
//!
//! ## Model
//!
//! Both bodies are free, non-spinning disks, so only the normal component of
//! the relative velocity changes:
//!
//! ```text
//! n   = (b.pos − a.pos) / |b.pos − a.pos|
//! v_n = (b.vel − a.vel) · n
//! j   = −(1 + e) · v_n / (1/m_a + 1/m_b)
//!
//! a.vel −= j n / m_a
//! b.vel += j n / m_b
//! ```
//!
//! Total momentum is unchanged for any `e`; `e = 1` keeps the normal
//! relative speed, `e = 0` removes it.
//!
//! After the impulse, 80% of the overlap is removed along `n`, split so the
//! heavier body moves less. Removing less than the full overlap keeps
//! stacked bodies from jittering.

use crate::collision::detection::CollisionDetector;
use crate::types::{constants, Body};

/// Resolver for body/body collisions.
pub struct CollisionResolver;

impl CollisionResolver {
    /// Resolve one pair. Returns true if they overlapped while approaching
    /// and were corrected.
    pub fn resolve(a: &mut Body, b: &mut Body, elasticity: f64) -> bool {
        Self::resolve_with(a, b, elasticity, |_, _, _| {})
    }

    /// Resolve one pair and report hard impacts.
    ///
    /// `on_impact` runs after the correction when the pre-impulse relative
    /// speed exceeds [`constants::IMPACT_SPEED_THRESHOLD`]. It only sees the
    /// two bodies, so anything structural it wants (such as fragmenting
    /// them) has to be recorded and applied after the pass.
    pub fn resolve_with<F>(a: &mut Body, b: &mut Body, elasticity: f64, mut on_impact: F) -> bool
    where
        F: FnMut(&Body, &Body, f64),
    {
        let Some(contact) = CollisionDetector::detect_pair(a, b) else {
            return false;
        };

        let normal = contact.normal;
        let relative_velocity = b.velocity - a.velocity;
        let velocity_along_normal = relative_velocity.dot(&normal);

        // Already separating: leave resting contacts alone
        if velocity_along_normal > 0.0 {
            return false;
        }

        let (mass_a, mass_b) = (a.mass(), b.mass());

        let j = -(1.0 + elasticity) * velocity_along_normal / (1.0 / mass_a + 1.0 / mass_b);
        let impulse = normal * j;
        a.velocity -= impulse / mass_a;
        b.velocity += impulse / mass_b;

        let correction = normal * (constants::POSITION_CORRECTION * contact.overlap);
        let total_mass = mass_a + mass_b;
        a.position -= correction * (mass_b / total_mass);
        b.position += correction * (mass_a / total_mass);

        let speed = relative_velocity.magnitude();
        if speed > constants::IMPACT_SPEED_THRESHOLD {
            let intensity = (speed / constants::FLASH_FULL_SPEED)
                .clamp(constants::FLASH_MIN_INTENSITY, 1.0);
            a.visual.flash(intensity);
            b.visual.flash(intensity);
            on_impact(a, b, speed);
        }

        true
    }
}

// =============================================================================
// Tests
// =============================================================================
