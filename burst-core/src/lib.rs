//! # Burst Core
//!
//! A 2D physics playground of bouncing disks. Main bodies are launched from
//! a wall and burst into many smaller free bodies when they hit another wall
//! or each other.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, Body, SimulationState, constants)
//! - `color`: Hex colours, fragment shades, palette
//! - `integrator`: Per-body motion and wall reflection
//! - `forces`: Gravity and friction
//! - `collision`: Overlap detection and impulse resolution
//! - `fragmentation`: Splitting a main body into fragments
//! - `launch`: Spawn placement and launch direction
//! - `config`: YAML/JSON configuration snapshot and presets
//! - `simulation`: Step scheduler
//!
//! ## Example
//!
//! ```
//! use burst_core::{PlaygroundConfig, Simulation};
//!
//! let mut sim = Simulation::new(1280.0, 720.0, PlaygroundConfig::default()).unwrap();
//! sim.launch_all().unwrap();
//! for _ in 0..120 {
//!     sim.step(1.0 / 60.0);
//! }
//! assert!(sim.state().body_count() >= 1);
//! ```

pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod forces;
pub mod fragmentation;
pub mod integrator;
pub mod launch;
pub mod simulation;
pub mod types;

pub use color::Rgb;
pub use config::{BallConfig, ConfigLoader, PhysicsConfig, PlaygroundConfig};
pub use error::{BurstError, BurstResult};
pub use fragmentation::FragmentationParams;
pub use simulation::{Simulation, TickPhase};
pub use types::{Body, BodyKind, LaunchSide, SimulationState, Vec2};
