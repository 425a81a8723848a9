//! Discrete overlap tests.
//!
//! Detects circle/circle overlap between two bodies and wall contact of a
//! single body at the current positions. There is no sweep: a body fast
//! enough to cross another within one tick passes through it.

use tracing::trace;

use crate::types::{constants, Body, LaunchSide, Vec2};

/// Geometry of an overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Distance between the centres
    pub distance: f64,
    /// Sum of radii minus distance, > 0
    pub overlap: f64,
    /// Centres coincided and `normal` is the +x fallback
    pub degenerate: bool,
}

/// Which walls a body is touching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContacts {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WallContacts {
    pub fn touches(&self, side: LaunchSide) -> bool {
        match side {
            LaunchSide::Left => self.left,
            LaunchSide::Right => self.right,
            LaunchSide::Top => self.top,
            LaunchSide::Bottom => self.bottom,
        }
    }

    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    /// True if any wall other than `exempt` is touched.
    pub fn any_except(&self, exempt: LaunchSide) -> bool {
        LaunchSide::ALL
            .iter()
            .any(|&side| side != exempt && self.touches(side))
    }
}

/// Configuration for collision detection.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Wall contact tolerance as a fraction of the canvas dimension
    pub wall_contact_fraction: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            wall_contact_fraction: constants::WALL_CONTACT_FRACTION,
        }
    }
}

/// Collision detector for the playground.
#[derive(Debug, Clone, Default)]
pub struct CollisionDetector {
    pub config: DetectionConfig,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test two bodies for overlap.
    ///
    /// Returns `None` when `distance >= r_a + r_b`. Coincident centres have
    /// no defined normal; the +x axis is used so the result is deterministic
    /// and never NaN.
    pub fn detect_pair(a: &Body, b: &Body) -> Option<Contact> {
        let delta = b.position - a.position;
        let distance = delta.magnitude();
        let min_distance = a.radius() + b.radius();

        // NaN distances must read as "no contact"
        if distance.is_nan() || distance >= min_distance {
            return None;
        }

        if distance < constants::EPSILON {
            trace!(x = a.position.x, y = a.position.y, "coincident centres, using +x normal");
            return Some(Contact {
                normal: Vec2::X,
                distance,
                overlap: min_distance - distance,
                degenerate: true,
            });
        }

        Some(Contact {
            normal: delta / distance,
            distance,
            overlap: min_distance - distance,
            degenerate: false,
        })
    }

    /// Walls whose distance to the body's edge is within the contact
    /// tolerance (a fraction of the canvas width for left/right walls, of
    /// the height for top/bottom).
    pub fn wall_contacts(&self, body: &Body, width: f64, height: f64) -> WallContacts {
        let r = body.radius();
        let x_tol = width * self.config.wall_contact_fraction;
        let y_tol = height * self.config.wall_contact_fraction;
        let p = body.position;

        WallContacts {
            left: p.x - r <= x_tol,
            right: p.x + r >= width - x_tol,
            top: p.y - r <= y_tol,
            bottom: p.y + r >= height - y_tol,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use approx::assert_relative_eq;

    fn ball(x: f64, y: f64, radius: f64) -> Body {
        Body::new(Vec2::new(x, y), radius, Rgb::RED).unwrap()
    }

    #[test]
    fn test_separated_bodies_do_not_collide() {
        let a = ball(100.0, 100.0, 20.0);
        let b = ball(141.0, 100.0, 20.0);
        assert!(CollisionDetector::detect_pair(&a, &b).is_none());

        // Exactly touching is not an overlap
        let c = ball(140.0, 100.0, 20.0);
        assert!(CollisionDetector::detect_pair(&a, &c).is_none());
    }

    #[test]
    fn test_overlap_geometry() {
        let a = ball(100.0, 100.0, 20.0);
        let b = ball(100.0, 130.0, 20.0);
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        assert_relative_eq!(contact.normal.x, 0.0);
        assert_relative_eq!(contact.normal.y, 1.0);
        assert_relative_eq!(contact.distance, 30.0);
        assert_relative_eq!(contact.overlap, 10.0);
        assert!(!contact.degenerate);
    }

    #[test]
    fn test_coincident_centres_fall_back_to_x_axis() {
        let a = ball(50.0, 50.0, 5.0);
        let b = ball(50.0, 50.0, 3.0);
        let contact = CollisionDetector::detect_pair(&a, &b).unwrap();

        assert_eq!(contact.normal, Vec2::X);
        assert_relative_eq!(contact.overlap, 8.0);
        assert!(contact.degenerate);
    }

    #[test]
    fn test_nan_position_never_collides() {
        let mut a = ball(50.0, 50.0, 5.0);
        a.position.x = f64::NAN;
        let b = ball(50.0, 50.0, 5.0);
        assert!(CollisionDetector::detect_pair(&a, &b).is_none());
    }

    #[test]
    fn test_wall_contacts_with_tolerance() {
        let detector = CollisionDetector::new();
        // 1% of 1000 = 10px tolerance on x, 1% of 500 = 5px on y
        let near_left = ball(25.0, 250.0, 20.0);
        let contacts = detector.wall_contacts(&near_left, 1000.0, 500.0);
        assert!(contacts.left);
        assert!(!contacts.right && !contacts.top && !contacts.bottom);

        let clear = ball(500.0, 250.0, 20.0);
        assert!(!detector.wall_contacts(&clear, 1000.0, 500.0).any());

        let on_floor = ball(500.0, 480.0, 20.0);
        assert!(detector.wall_contacts(&on_floor, 1000.0, 500.0).bottom);
    }

    #[test]
    fn test_any_except_exempts_launch_wall() {
        let contacts = WallContacts {
            left: true,
            ..Default::default()
        };
        assert!(!contacts.any_except(LaunchSide::Left));
        assert!(contacts.any_except(LaunchSide::Top));

        let corner = WallContacts {
            left: true,
            bottom: true,
            ..Default::default()
        };
        assert!(corner.any_except(LaunchSide::Left));
    }
}
