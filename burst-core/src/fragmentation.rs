//! Breaking a main body into fragments.
//!
//! A parent of radius `R` splits into `N` children of radius `R / √N`, which
//! keeps the total area (and so the total mass). Each child starts at the
//! parent's centre with
//!
//! ```text
//! v_i = v_parent ⊙ momentum_fraction
//!     + (cos 2πi/N, sin 2πi/N) · √(2 · E_child / m_child) · jitter_i
//!
//! E_child = energy_fraction · ½ M |v_parent|² / N
//! ```
//!
//! so the burst part of the velocity is spread evenly around a full circle.
//! With `jitter ≤ 1` the burst energy handed out is at most
//! `energy_fraction · E`: the result is an upper bound, not exact
//! conservation.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::error::{check_range, BurstError, BurstResult};
use crate::types::{validate_radius, Body, Vec2};

/// Tunable fragmentation constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FragmentationParams {
    /// Share of the parent's kinetic energy turned into burst speed, in [0, 1]
    pub energy_fraction: f64,

    /// Per-axis share of the parent velocity every child inherits, in [0, 1]
    pub momentum_fraction: Vec2,

    /// Bounds of the per-child random burst speed factor, 0 <= min <= max <= 1
    pub jitter_min: f64,
    pub jitter_max: f64,
}

impl Default for FragmentationParams {
    fn default() -> Self {
        Self {
            energy_fraction: 0.85,
            momentum_fraction: Vec2::new(0.5, 0.3),
            jitter_min: 0.6,
            jitter_max: 1.0,
        }
    }
}

impl FragmentationParams {
    /// Softer burst: less energy, same carried momentum.
    #[must_use]
    pub fn gentle() -> Self {
        Self {
            energy_fraction: 0.4,
            ..Default::default()
        }
    }

    /// Almost all energy into the burst, little carried momentum.
    #[must_use]
    pub fn explosive() -> Self {
        Self {
            energy_fraction: 0.9,
            momentum_fraction: Vec2::new(0.1, 0.1),
            ..Default::default()
        }
    }

    /// Fixed burst speed (no jitter). Deterministic apart from colours.
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter_min = 1.0;
        self.jitter_max = 1.0;
        self
    }

    pub fn validate(&self) -> BurstResult<()> {
        check_range("energy_fraction", self.energy_fraction, 0.0, 1.0)?;
        check_range("momentum_fraction.x", self.momentum_fraction.x, 0.0, 1.0)?;
        check_range("momentum_fraction.y", self.momentum_fraction.y, 0.0, 1.0)?;
        check_range("jitter_min", self.jitter_min, 0.0, 1.0)?;
        check_range("jitter_max", self.jitter_max, 0.0, 1.0)?;
        if self.jitter_min > self.jitter_max {
            return Err(BurstError::parameter(
                "jitter_min",
                self.jitter_min,
                "must not exceed jitter_max",
            ));
        }
        Ok(())
    }
}

/// Split `parent` into `fragment_count` free bodies.
///
/// The parent itself is not touched; removing it from the live set is the
/// caller's job. `color_fn` receives the child index.
pub fn fragment<R, C>(
    parent: &Body,
    fragment_count: u32,
    params: &FragmentationParams,
    rng: &mut R,
    mut color_fn: C,
) -> BurstResult<Vec<Body>>
where
    R: Rng + ?Sized,
    C: FnMut(usize) -> Rgb,
{
    if fragment_count == 0 {
        return Err(BurstError::InvalidFragmentCount);
    }
    if !parent.is_finite() {
        return Err(BurstError::NonFiniteState("fragmenting body"));
    }

    let n = f64::from(fragment_count);
    let child_radius = parent.radius() / n.sqrt();
    validate_radius(child_radius)?;
    let energy_per_child = params.energy_fraction * parent.kinetic_energy() / n;
    let base_velocity = parent.velocity.component_mul(&params.momentum_fraction);

    let mut children = Vec::with_capacity(fragment_count as usize);
    for i in 0..fragment_count as usize {
        let mut child = Body::new(parent.position, child_radius, color_fn(i))?
            .with_glow(parent.visual.glow);

        let direction = Vec2::from_angle(TAU * i as f64 / n);
        let speed = (2.0 * energy_per_child / child.mass()).sqrt();
        let jitter = rng.gen_range(params.jitter_min..=params.jitter_max);

        child.velocity = base_velocity + direction * (speed * jitter);
        children.push(child);
    }

    debug!(
        fragments = fragment_count,
        child_radius,
        parent_energy = parent.kinetic_energy(),
        "fragmented body"
    );

    Ok(children)
}

// =============================================================================
// Tests
// =============================================================================
