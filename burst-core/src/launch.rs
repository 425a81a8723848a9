//! Spawning and launching main bodies.
//!
//! A main body spawns two radii in from its launch wall. Bodies sharing a
//! wall are spaced evenly along it: slot `i` of `n` sits at `(i + 1)/(n + 1)`
//! of the wall's length.
//!
//! ## Angle convention
//!
//! 0° points straight into the arena. Screen coordinates, y down:
//!
//! ```text
//! side     direction            positive angle tilts
//! left     ( cos θ, −sin θ)     up
//! right    (−cos θ, −sin θ)     up
//! top      ( sin θ,  cos θ)     toward +x
//! bottom   ( sin θ, −cos θ)     toward +x
//! ```

use tracing::info;

use crate::color::Rgb;
use crate::error::{check_range, BurstError, BurstResult};
use crate::types::{Body, BodyKind, LaunchSide, Vec2};

/// Where along its wall a main body spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSlot {
    pub side: LaunchSide,
    /// Position among the bodies sharing this wall, `< count`
    pub index: usize,
    /// Number of bodies sharing this wall
    pub count: usize,
}

impl SpawnSlot {
    pub fn new(side: LaunchSide, index: usize, count: usize) -> Self {
        Self { side, index, count }
    }

    /// A lone body centred on its wall.
    pub fn single(side: LaunchSide) -> Self {
        Self::new(side, 0, 1)
    }
}

/// How a main body breaks apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragments {
    pub count: u32,
    /// Base colour of the fragment shades
    pub color: Rgb,
}

/// Build a main body at its spawn slot, at rest.
pub fn create_main_body(
    radius: f64,
    color: Rgb,
    fragments: Fragments,
    slot: SpawnSlot,
    width: f64,
    height: f64,
) -> BurstResult<Body> {
    if slot.count == 0 || slot.index >= slot.count {
        return Err(BurstError::parameter(
            "spawn index",
            slot.index as f64,
            "must be below the number of bodies on the side",
        ));
    }
    check_range("width", width, f64::MIN_POSITIVE, f64::MAX)?;
    check_range("height", height, f64::MIN_POSITIVE, f64::MAX)?;

    let along = (slot.index + 1) as f64 / (slot.count + 1) as f64;
    let inset = 2.0 * radius;
    let position = match slot.side {
        LaunchSide::Left => Vec2::new(inset, height * along),
        LaunchSide::Right => Vec2::new(width - inset, height * along),
        LaunchSide::Top => Vec2::new(width * along, inset),
        LaunchSide::Bottom => Vec2::new(width * along, height - inset),
    };

    let body = Body::new_main(
        position,
        radius,
        color,
        slot.side,
        fragments.count,
        fragments.color,
    )?;
    if !body.fits_in(width, height) {
        return Err(BurstError::parameter(
            "radius",
            radius,
            "body does not fit in the arena",
        ));
    }
    Ok(body)
}

/// Unit launch direction for `side` tilted by `angle_degrees`.
pub fn launch_direction(side: LaunchSide, angle_degrees: f64) -> Vec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    match side {
        LaunchSide::Left => Vec2::new(cos, -sin),
        LaunchSide::Right => Vec2::new(-cos, -sin),
        LaunchSide::Top => Vec2::new(sin, cos),
        LaunchSide::Bottom => Vec2::new(sin, -cos),
    }
}

/// Set a main body's velocity to `speed` along its launch direction.
pub fn launch(body: &mut Body, speed: f64, angle_degrees: f64) -> BurstResult<()> {
    let BodyKind::Main { launch_side, .. } = body.kind else {
        return Err(BurstError::NoLaunchSide);
    };
    check_range("launch speed", speed, 0.0, f64::MAX)?;
    check_range("launch angle", angle_degrees, -90.0, 90.0)?;

    body.velocity = launch_direction(launch_side, angle_degrees) * speed;
    info!(
        side = ?launch_side,
        speed,
        angle = angle_degrees,
        "launched main body"
    );
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
