//! Collision detection and resolution for the playground.
//!
//! This module handles:
//! - **Detection**: circle/circle overlap and wall contact at the current
//!   positions
//! - **Resolution**: impulse exchange plus positional correction for an
//!   overlapping pair
//!
//! ## Discrete checks
//!
//! Overlap is tested once per tick after every body has moved. A body that
//! crosses another entirely within one tick is missed:
//!
//! ```text
//! tick n        tick n+1
//!   ●──→  ○        ○  ──→●
//!         (no overlap sampled)
//! ```
//!
//! The `MAX_DT` clamp on the scheduler keeps this rare at playground speeds.

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
