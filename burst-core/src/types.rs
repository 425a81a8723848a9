//! Core types for the playground simulation.
//!
//! Units follow the canvas the playground is drawn on:
//! - Position: pixels, origin top-left, y grows downward
//! - Velocity: pixels per reference frame (1/60 s)
//! - Mass: area (π r²), so only ratios matter

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::color::Rgb;
use crate::error::{BurstError, BurstResult};

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions and velocities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Unit vector along +x
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians from +x.
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise multiplication
    pub fn component_mul(&self, other: &Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// Operator overloads for Vec2
impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Launch Side
// =============================================================================

/// The wall a main body is launched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl LaunchSide {
    pub const ALL: [LaunchSide; 4] = [
        LaunchSide::Left,
        LaunchSide::Right,
        LaunchSide::Top,
        LaunchSide::Bottom,
    ];
}

impl Default for LaunchSide {
    fn default() -> Self {
        LaunchSide::Left
    }
}

// =============================================================================
// Body
// =============================================================================

/// Whether a body can still break apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BodyKind {
    /// Produced by fragmentation (or spawned plain). Never fragments.
    Free,
    /// Fragments on hitting a non-launch wall or another main body.
    Main {
        launch_side: LaunchSide,
        fragment_count: u32,
        /// Base colour the fragment shades are derived from
        fragment_color: Rgb,
    },
}

/// Cosmetic per-body state. Never feeds back into physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualState {
    pub glow: bool,
    /// Collision flash intensity in [0, 1]
    pub collision_effect: f64,
    /// Flash intensity lost per second
    pub decay_rate: f64,
}

impl VisualState {
    /// Brighten the flash, never dim it: a light touch right after a hard
    /// hit must not cut the hard hit's flash short.
    pub fn flash(&mut self, intensity: f64) {
        if intensity > self.collision_effect {
            self.collision_effect = intensity.min(1.0);
        }
    }

    /// Linear fade over `1 / decay_rate` seconds per unit intensity.
    pub fn decay(&mut self, dt: f64) {
        self.collision_effect = (self.collision_effect - dt * self.decay_rate).max(0.0);
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            glow: false,
            collision_effect: 0.0,
            decay_rate: constants::FLASH_DECAY_RATE,
        }
    }
}

/// A non-spinning disk.
///
/// Mass is π r² and is only ever derived from the radius, so the radius is
/// private and changes go through [`Body::set_radius`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    radius: f64,
    mass: f64,
    pub kind: BodyKind,
    pub color: Rgb,
    pub visual: VisualState,
}

impl Body {
    /// A free body at rest.
    pub fn new(position: Vec2, radius: f64, color: Rgb) -> BurstResult<Self> {
        validate_radius(radius)?;
        if !position.is_finite() {
            return Err(BurstError::NonFiniteState("body position"));
        }
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            mass: area(radius),
            kind: BodyKind::Free,
            color,
            visual: VisualState::default(),
        })
    }

    /// A main body that fragments into `fragment_count` pieces.
    pub fn new_main(
        position: Vec2,
        radius: f64,
        color: Rgb,
        launch_side: LaunchSide,
        fragment_count: u32,
        fragment_color: Rgb,
    ) -> BurstResult<Self> {
        if fragment_count == 0 {
            return Err(BurstError::InvalidFragmentCount);
        }
        let mut body = Self::new(position, radius, color)?;
        body.kind = BodyKind::Main {
            launch_side,
            fragment_count,
            fragment_color,
        };
        Ok(body)
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_glow(mut self, glow: bool) -> Self {
        self.visual.glow = glow;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Change the radius and recompute mass.
    pub fn set_radius(&mut self, radius: f64) -> BurstResult<()> {
        validate_radius(radius)?;
        self.radius = radius;
        self.mass = area(radius);
        Ok(())
    }

    pub fn is_main(&self) -> bool {
        matches!(self.kind, BodyKind::Main { .. })
    }

    /// Launch wall of a main body; `None` for free bodies.
    pub fn launch_side(&self) -> Option<LaunchSide> {
        match self.kind {
            BodyKind::Main { launch_side, .. } => Some(launch_side),
            BodyKind::Free => None,
        }
    }

    /// 0.5 m |v|²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// True if the disk fits between the walls of a `width × height` arena.
    pub fn fits_in(&self, width: f64, height: f64) -> bool {
        let diameter = 2.0 * self.radius;
        diameter <= width && diameter <= height
    }
}

fn area(radius: f64) -> f64 {
    PI * radius * radius
}

/// The radius must be positive and give a normal (non-zero, finite) mass.
pub(crate) fn validate_radius(radius: f64) -> BurstResult<()> {
    if radius.is_finite() && radius > 0.0 && area(radius).is_normal() {
        Ok(())
    } else {
        Err(BurstError::InvalidRadius(radius))
    }
}

// =============================================================================
// Simulation State
// =============================================================================

/// Every live body plus the arena they live in.
///
/// Main bodies are kept apart from free bodies because the collision pass
/// treats the groups differently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    pub main_bodies: Vec<Body>,
    pub free_bodies: Vec<Body>,
    pub width: f64,
    pub height: f64,
    /// Simulated seconds since the last reset
    pub time: f64,
    /// Ticks run since the last reset
    pub ticks: u64,
}

impl SimulationState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            main_bodies: Vec::new(),
            free_bodies: Vec::new(),
            width,
            height,
            time: 0.0,
            ticks: 0,
        }
    }

    /// Drop every body and rewind the clock.
    pub fn clear(&mut self) {
        self.main_bodies.clear();
        self.free_bodies.clear();
        self.time = 0.0;
        self.ticks = 0;
    }

    /// Main bodies first, then free bodies.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.main_bodies.iter().chain(self.free_bodies.iter())
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.main_bodies
            .iter_mut()
            .chain(self.free_bodies.iter_mut())
    }

    pub fn body_count(&self) -> usize {
        self.main_bodies.len() + self.free_bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body_count() == 0
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies().map(Body::kinetic_energy).sum()
    }

    pub fn momentum(&self) -> Vec2 {
        self.bodies()
            .fold(Vec2::ZERO, |acc, body| acc + body.momentum())
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants used in the simulation.
pub mod constants {
    /// Frame rate the gravity/friction/velocity units are calibrated to (Hz)
    pub const REFERENCE_RATE: f64 = 60.0;

    /// Largest time step a tick accepts (s). Longer frames are clamped.
    pub const MAX_DT: f64 = 0.1;

    /// Relative speed above which a contact counts as an impact
    pub const IMPACT_SPEED_THRESHOLD: f64 = 5.0;

    /// Share of the overlap removed per correction pass
    pub const POSITION_CORRECTION: f64 = 0.8;

    /// Flash intensity lost per second
    pub const FLASH_DECAY_RATE: f64 = 4.0;

    /// Relative speed giving a full-intensity flash
    pub const FLASH_FULL_SPEED: f64 = 20.0;

    /// Dimmest flash an impact produces
    pub const FLASH_MIN_INTENSITY: f64 = 0.3;

    /// Wall contact tolerance for the fragmentation trigger, as a fraction
    /// of the canvas dimension
    pub const WALL_CONTACT_FRACTION: f64 = 0.01;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 5.0);

        assert_eq!(a + b, Vec2::new(5.0, 7.0));
        assert_eq!(a - b, Vec2::new(-3.0, -3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert_eq!(a.dot(&b), 14.0);
        assert_eq!(a.component_mul(&b), Vec2::new(4.0, 10.0));
    }

    #[test]
    fn test_vec2_normalized() {
        let n = Vec2::new(3.0, 4.0).normalized();
        assert_relative_eq!(n.magnitude(), 1.0);
        assert_relative_eq!(n.x, 0.6);
        assert_relative_eq!(n.y, 0.8);
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_mass_follows_radius() {
        let mut body = Body::new(Vec2::ZERO, 20.0, Rgb::RED).unwrap();
        assert_relative_eq!(body.mass(), 400.0 * PI);

        body.set_radius(10.0).unwrap();
        assert_relative_eq!(body.mass(), 100.0 * PI);
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(matches!(
            Body::new(Vec2::ZERO, 0.0, Rgb::RED),
            Err(BurstError::InvalidRadius(_))
        ));
        assert!(Body::new(Vec2::ZERO, -1.0, Rgb::RED).is_err());
        assert!(Body::new(Vec2::ZERO, f64::NAN, Rgb::RED).is_err());

        let mut body = Body::new(Vec2::ZERO, 5.0, Rgb::RED).unwrap();
        assert!(body.set_radius(0.0).is_err());
        assert_eq!(body.radius(), 5.0);
    }

    #[test]
    fn test_rejects_radius_with_degenerate_mass() {
        // π r² underflows to 0
        assert!(matches!(
            Body::new(Vec2::ZERO, 1e-170, Rgb::RED),
            Err(BurstError::InvalidRadius(_))
        ));
        // π r² overflows to infinity
        assert!(matches!(
            Body::new(Vec2::ZERO, 1e200, Rgb::RED),
            Err(BurstError::InvalidRadius(_))
        ));

        let mut body = Body::new(Vec2::ZERO, 5.0, Rgb::RED).unwrap();
        assert!(body.set_radius(1e-170).is_err());
        assert_eq!(body.mass(), 25.0 * PI);

        let tiny = Body::new(Vec2::ZERO, 1e-100, Rgb::RED).unwrap();
        assert!(tiny.mass().is_normal());
    }

    #[test]
    fn test_fits_in_arena() {
        let body = Body::new(Vec2::ZERO, 50.0, Rgb::RED).unwrap();
        assert!(body.fits_in(100.0, 100.0));
        assert!(!body.fits_in(99.0, 400.0));
        assert!(!body.fits_in(400.0, 99.0));
    }

    #[test]
    fn test_rejects_zero_fragments() {
        let result = Body::new_main(
            Vec2::ZERO,
            10.0,
            Rgb::RED,
            LaunchSide::Left,
            0,
            Rgb::RED,
        );
        assert!(matches!(result, Err(BurstError::InvalidFragmentCount)));
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let result = Body::new(Vec2::new(f64::INFINITY, 0.0), 5.0, Rgb::RED);
        assert!(matches!(result, Err(BurstError::NonFiniteState(_))));
    }

    #[test]
    fn test_flash_only_brightens() {
        let mut visual = VisualState::default();
        visual.flash(0.8);
        visual.flash(0.3);
        assert_eq!(visual.collision_effect, 0.8);

        visual.decay(0.1);
        assert_relative_eq!(visual.collision_effect, 0.4);
        visual.decay(1.0);
        assert_eq!(visual.collision_effect, 0.0);
    }

    #[test]
    fn test_body_kinetic_energy() {
        let body = Body::new(Vec2::ZERO, 1.0, Rgb::RED)
            .unwrap()
            .with_velocity(Vec2::new(10.0, 0.0));
        // KE = 0.5 * π * 100
        assert_relative_eq!(body.kinetic_energy(), 50.0 * PI);
    }

    #[test]
    fn test_state_totals() {
        let mut state = SimulationState::new(800.0, 600.0);
        state.free_bodies.push(
            Body::new(Vec2::ZERO, 1.0, Rgb::RED)
                .unwrap()
                .with_velocity(Vec2::new(1.0, 0.0)),
        );
        state.free_bodies.push(
            Body::new(Vec2::ZERO, 1.0, Rgb::RED)
                .unwrap()
                .with_velocity(Vec2::new(-1.0, 0.0)),
        );
        assert_eq!(state.body_count(), 2);
        assert_relative_eq!(state.momentum().x, 0.0);
        assert_relative_eq!(state.kinetic_energy(), PI);

        state.clear();
        assert!(state.is_empty());
    }
}
