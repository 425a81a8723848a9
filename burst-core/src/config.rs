//! Configuration snapshot handed in by the settings/sharing layer.
//!
//! The snapshot has two parts, physics settings and one entry per main ball:
//!
//! ```yaml
//! physics:
//!   gravity: 0.3
//!   elasticity: 0.6
//!   friction: 0.02
//!   slowMotionFactor: 0.5
//!   darkMode: true
//! balls:
//!   - ballSize: 100
//!     numBalls: 70
//!     launchSpeed: 15
//!     launchSide: left
//!     launchAngle: 0
//!     mainBallColor: "#FF5252"
//!     smallBallColor: "#40C4FF"
//! ```
//!
//! Keys are camelCase because the snapshot is the same object the browser
//! UI serializes into share links. YAML is a superset of JSON, so those
//! JSON snapshots load through the same parser. Every field has a default,
//! and unknown keys (panel ids, for instance) are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{check_range, BurstError, BurstResult};
use crate::forces::PlaygroundForces;
use crate::fragmentation::FragmentationParams;
use crate::types::{validate_radius, LaunchSide};

/// Global physics settings, read every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Velocity gained per reference frame, downward
    pub gravity: f64,
    /// Restitution for wall and body collisions, in [0, 1]
    pub elasticity: f64,
    /// Velocity lost per reference frame, in [0, 1)
    pub friction: f64,
    /// Slow-down multiplier; values <= 1 run in real time
    pub slow_motion_factor: f64,
    /// New bodies glow when set
    pub dark_mode: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            elasticity: 0.6,
            friction: 0.02,
            slow_motion_factor: 0.5,
            dark_mode: true,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> BurstResult<()> {
        self.forces()?;
        check_range("elasticity", self.elasticity, 0.0, 1.0)?;
        check_range("slow_motion_factor", self.slow_motion_factor, 0.0, f64::MAX)?;
        if self.slow_motion_factor <= 0.0 {
            return Err(BurstError::parameter(
                "slow_motion_factor",
                self.slow_motion_factor,
                "must be > 0",
            ));
        }
        Ok(())
    }

    /// Gravity and friction as a force model.
    pub fn forces(&self) -> BurstResult<PlaygroundForces> {
        PlaygroundForces::new(self.gravity, self.friction)
    }
}

/// Settings for one main ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BallConfig {
    /// Radius in pixels
    pub ball_size: f64,
    /// Number of fragments it bursts into
    pub num_balls: u32,
    pub launch_speed: f64,
    pub launch_side: LaunchSide,
    /// Degrees in [-90, 90], 0 = straight into the arena
    pub launch_angle: f64,
    /// Random palette colour when unset
    pub main_ball_color: Option<Rgb>,
    /// Base of the fragment shades; random palette colour when unset
    pub small_ball_color: Option<Rgb>,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            ball_size: 100.0,
            num_balls: 70,
            launch_speed: 15.0,
            launch_side: LaunchSide::Left,
            launch_angle: 0.0,
            main_ball_color: None,
            small_ball_color: None,
        }
    }
}

impl BallConfig {
    pub fn validate(&self) -> BurstResult<()> {
        validate_radius(self.ball_size)?;
        if self.num_balls == 0 {
            return Err(BurstError::InvalidFragmentCount);
        }
        check_range("launch_speed", self.launch_speed, 0.0, f64::MAX)?;
        check_range("launch_angle", self.launch_angle, -90.0, 90.0)?;
        Ok(())
    }
}

/// Complete configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaygroundConfig {
    pub physics: PhysicsConfig,
    pub balls: Vec<BallConfig>,
    pub fragmentation: FragmentationParams,
    /// Seed for fragment jitter and colours; entropy when unset
    pub seed: Option<u64>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            balls: vec![BallConfig::default()],
            fragmentation: FragmentationParams::default(),
            seed: None,
        }
    }
}

impl PlaygroundConfig {
    /// Parse a YAML or JSON snapshot and validate it.
    pub fn from_yaml_str(contents: &str) -> BurstResult<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a snapshot file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> BurstResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml(&self) -> BurstResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> BurstResult<()> {
        self.physics.validate()?;
        for ball in &self.balls {
            ball.validate()?;
        }
        self.fragmentation.validate()
    }
}

/// Loads named presets (`<name>.yaml`) from a directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load a preset by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("presets");
    /// let config = loader.load("crossfire")?;
    /// ```
    pub fn load(&self, name: &str) -> BurstResult<PlaygroundConfig> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(BurstError::ConfigNotFound(name.to_string()));
        }
        PlaygroundConfig::from_path(path)
    }

    /// Write a preset, replacing any existing one with the same name.
    pub fn save(&self, name: &str, config: &PlaygroundConfig) -> BurstResult<()> {
        config.validate()?;
        fs::create_dir_all(&self.base_path)?;
        let path = self.base_path.join(format!("{}.yaml", name));
        fs::write(path, config.to_yaml()?)?;
        Ok(())
    }

    /// Names of all presets, sorted.
    pub fn list(&self) -> BurstResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
