//! The step scheduler.
//!
//! [`Simulation`] owns every body and runs one tick at a time:
//!
//! ```text
//! Idle ─→ Integrating ─→ Fragmenting ─→ Colliding ─→ Idle
//!          move + flash    mark mains      free×free
//!          decay           on far walls    free×main
//!                                          main×main (mark on impact)
//!                                    └─→ apply pending changes
//! ```
//!
//! Nothing structural happens while a pass is iterating. Marked main bodies
//! keep colliding for the rest of the tick; they are swapped for their
//! fragments in one go at the end.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::collision::{CollisionDetector, CollisionResolver};
use crate::color::Rgb;
use crate::config::{PhysicsConfig, PlaygroundConfig};
use crate::error::{check_range, BurstError, BurstResult};
use crate::forces::PlaygroundForces;
use crate::fragmentation::fragment;
use crate::integrator::FrameIntegrator;
use crate::launch::{create_main_body, launch, Fragments, SpawnSlot};
use crate::types::{constants, Body, BodyKind, LaunchSide, SimulationState, Vec2};

/// Where the scheduler is inside a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPhase {
    #[default]
    Idle,
    Integrating,
    Fragmenting,
    Colliding,
}

/// Main bodies marked to fragment at the end of the current tick.
///
/// Indices refer to `SimulationState::main_bodies` as it was when the tick
/// started. Marking twice is harmless.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    fragmenting: BTreeSet<usize>,
}

impl PendingChanges {
    pub fn mark(&mut self, main_index: usize) {
        self.fragmenting.insert(main_index);
    }

    pub fn len(&self) -> usize {
        self.fragmenting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragmenting.is_empty()
    }

    pub fn clear(&mut self) {
        self.fragmenting.clear();
    }

    /// Take every mark, highest index first, so removing them in order
    /// never shifts an index still to be removed.
    fn drain_descending(&mut self) -> impl Iterator<Item = usize> {
        std::mem::take(&mut self.fragmenting).into_iter().rev()
    }
}

/// The playground engine.
pub struct Simulation {
    state: SimulationState,
    config: PlaygroundConfig,
    forces: PlaygroundForces,
    detector: CollisionDetector,
    rng: StdRng,
    pending: PendingChanges,
    phase: TickPhase,
    frame_accumulator: f64,
}

impl Simulation {
    /// Create an empty arena of `width × height` pixels.
    pub fn new(width: f64, height: f64, config: PlaygroundConfig) -> BurstResult<Self> {
        validate_bounds(width, height)?;
        config.validate()?;
        let forces = config.physics.forces()?;
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Ok(Self {
            state: SimulationState::new(width, height),
            config,
            forces,
            detector: CollisionDetector::new(),
            rng,
            pending: PendingChanges::default(),
            phase: TickPhase::Idle,
            frame_accumulator: 0.0,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn pending(&self) -> &PendingChanges {
        &self.pending
    }

    /// Replace the physics settings. Takes effect from the next tick.
    pub fn set_physics(&mut self, physics: PhysicsConfig) -> BurstResult<()> {
        physics.validate()?;
        self.forces = physics.forces()?;
        self.config.physics = physics;
        Ok(())
    }

    /// Replace the whole configuration. Bodies already in the arena stay.
    /// The random stream restarts only when the seed changes.
    pub fn set_config(&mut self, config: PlaygroundConfig) -> BurstResult<()> {
        config.validate()?;
        self.forces = config.physics.forces()?;
        if config.seed != self.config.seed {
            if let Some(seed) = config.seed {
                self.rng = StdRng::seed_from_u64(seed);
            }
        }
        self.config = config;
        Ok(())
    }

    // ===== Tick =====

    /// Run one tick of `dt` seconds, clamped into `[0, MAX_DT]`.
    pub fn step(&mut self, dt: f64) -> &SimulationState {
        let dt = if dt.is_nan() {
            0.0
        } else {
            dt.clamp(0.0, constants::MAX_DT)
        };

        self.integrate(dt);
        self.mark_wall_hits();
        self.collide();
        self.apply_pending();
        self.drop_non_finite();

        self.state.time += dt;
        self.state.ticks += 1;
        self.phase = TickPhase::Idle;
        &self.state
    }

    /// Feed one rendered frame's duration through the slow-motion clock.
    ///
    /// Frame time accumulates until it reaches `slow_motion_factor / 60`
    /// seconds; then one tick runs with the accumulated time divided by the
    /// factor. Factors at or below 1 run in real time. Returns whether a
    /// tick ran.
    pub fn advance_frame(&mut self, frame_dt: f64) -> bool {
        if !(frame_dt.is_finite() && frame_dt > 0.0) {
            return false;
        }

        let factor = self.config.physics.slow_motion_factor;
        self.frame_accumulator += frame_dt;
        // Summed frame times drift below the exact threshold
        if self.frame_accumulator < factor / constants::REFERENCE_RATE - constants::EPSILON {
            return false;
        }

        let dt = self.frame_accumulator.min(constants::MAX_DT) / factor.max(1.0);
        self.frame_accumulator = 0.0;
        self.step(dt);
        true
    }

    fn integrate(&mut self, dt: f64) {
        self.phase = TickPhase::Integrating;
        trace!(phase = ?self.phase, dt, bodies = self.state.body_count());

        let (width, height) = (self.state.width, self.state.height);
        let elasticity = self.config.physics.elasticity;
        for body in self.state.bodies_mut() {
            FrameIntegrator::advance(body, &self.forces, width, height, elasticity, dt);
            FrameIntegrator::decay_flash(body, dt);
        }
    }

    fn mark_wall_hits(&mut self) {
        self.phase = TickPhase::Fragmenting;
        trace!(phase = ?self.phase);

        let (width, height) = (self.state.width, self.state.height);
        for (index, body) in self.state.main_bodies.iter().enumerate() {
            let Some(side) = body.launch_side() else {
                continue;
            };
            if self
                .detector
                .wall_contacts(body, width, height)
                .any_except(side)
            {
                self.pending.mark(index);
            }
        }
    }

    fn collide(&mut self) {
        self.phase = TickPhase::Colliding;
        trace!(phase = ?self.phase);

        let elasticity = self.config.physics.elasticity;

        let free = &mut self.state.free_bodies;
        for i in 0..free.len() {
            for j in (i + 1)..free.len() {
                let (a, b) = pair_mut(free, i, j);
                CollisionResolver::resolve(a, b, elasticity);
            }
        }

        for free in self.state.free_bodies.iter_mut() {
            for main in self.state.main_bodies.iter_mut() {
                CollisionResolver::resolve(free, main, elasticity);
            }
        }

        let mains = &mut self.state.main_bodies;
        let pending = &mut self.pending;
        for i in 0..mains.len() {
            for j in (i + 1)..mains.len() {
                let (a, b) = pair_mut(mains, i, j);
                CollisionResolver::resolve_with(a, b, elasticity, |_, _, speed| {
                    trace!(i, j, speed, "main bodies impacted");
                    pending.mark(i);
                    pending.mark(j);
                });
            }
        }
    }

    /// Swap every marked main body for its fragments.
    fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        debug!(count = self.pending.len(), "applying pending fragmentations");

        for index in self.pending.drain_descending() {
            if index >= self.state.main_bodies.len() {
                continue;
            }
            let parent = self.state.main_bodies.remove(index);
            let BodyKind::Main {
                fragment_count,
                fragment_color,
                ..
            } = parent.kind
            else {
                continue;
            };

            let colors: Vec<Rgb> = (0..fragment_count)
                .map(|_| fragment_color.random_shade(&mut self.rng))
                .collect();
            match fragment(
                &parent,
                fragment_count,
                &self.config.fragmentation,
                &mut self.rng,
                |i| colors[i],
            ) {
                Ok(children) => self.state.free_bodies.extend(children),
                Err(err) => warn!(%err, "dropping body that could not fragment"),
            }
        }
    }

    fn drop_non_finite(&mut self) {
        let before = self.state.body_count();
        self.state.main_bodies.retain(Body::is_finite);
        self.state.free_bodies.retain(Body::is_finite);

        let dropped = before - self.state.body_count();
        if dropped > 0 {
            warn!(dropped, "dropped bodies with non-finite state");
        }
    }

    // ===== Commands =====

    /// Remove every body and rewind the clocks.
    pub fn reset(&mut self) {
        self.state.clear();
        self.pending.clear();
        self.frame_accumulator = 0.0;
        self.phase = TickPhase::Idle;
        info!("simulation reset");
    }

    /// Spawn and launch one main body per configured ball.
    ///
    /// Main bodies already in flight are replaced; fragments stay. Balls
    /// sharing a launch side are spread evenly along it in config order.
    /// Returns the number of bodies launched.
    pub fn launch_all(&mut self) -> BurstResult<usize> {
        let balls = self.config.balls.clone();
        let (width, height) = (self.state.width, self.state.height);
        let glow = self.config.physics.dark_mode;

        let mut launched = Vec::with_capacity(balls.len());
        for side in LaunchSide::ALL {
            let on_side: Vec<_> = balls.iter().filter(|b| b.launch_side == side).collect();
            for (index, ball) in on_side.iter().enumerate() {
                let color = ball
                    .main_ball_color
                    .unwrap_or_else(|| Rgb::random_palette(&mut self.rng));
                let fragments = Fragments {
                    count: ball.num_balls,
                    color: ball
                        .small_ball_color
                        .unwrap_or_else(|| Rgb::random_palette(&mut self.rng)),
                };
                let slot = SpawnSlot::new(side, index, on_side.len());

                let mut body =
                    create_main_body(ball.ball_size, color, fragments, slot, width, height)?
                        .with_glow(glow);
                launch(&mut body, ball.launch_speed, ball.launch_angle)?;
                launched.push(body);
            }
        }

        self.pending.clear();
        self.state.main_bodies = launched;
        info!(count = self.state.main_bodies.len(), "launched main bodies");
        Ok(self.state.main_bodies.len())
    }

    /// Insert a body built elsewhere. Main bodies join the main group.
    pub fn add_body(&mut self, body: Body) -> BurstResult<()> {
        if !body.is_finite() {
            return Err(BurstError::NonFiniteState("added body"));
        }
        if !body.fits_in(self.state.width, self.state.height) {
            return Err(BurstError::parameter(
                "radius",
                body.radius(),
                "body does not fit in the arena",
            ));
        }
        if body.is_main() {
            self.state.main_bodies.push(body);
        } else {
            self.state.free_bodies.push(body);
        }
        Ok(())
    }

    /// Switch glow on every body, and on bodies created from now on.
    pub fn set_glow(&mut self, glow: bool) {
        self.config.physics.dark_mode = glow;
        for body in self.state.bodies_mut() {
            body.visual.glow = glow;
        }
    }

    /// Change the arena size. Bodies left outside are pushed back in.
    ///
    /// Fails, leaving the arena as it was, if any body would not fit.
    pub fn resize(&mut self, width: f64, height: f64) -> BurstResult<()> {
        validate_bounds(width, height)?;
        if let Some(body) = self.state.bodies().find(|b| !b.fits_in(width, height)) {
            return Err(BurstError::parameter(
                "radius",
                body.radius(),
                "body does not fit in the resized arena",
            ));
        }
        self.state.width = width;
        self.state.height = height;

        let elasticity = self.config.physics.elasticity;
        for body in self.state.bodies_mut() {
            FrameIntegrator::reflect(body, width, height, elasticity);
        }
        debug!(width, height, "arena resized");
        Ok(())
    }

    // ===== Diagnostics =====

    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy()
    }

    pub fn momentum(&self) -> Vec2 {
        self.state.momentum()
    }
}

fn validate_bounds(width: f64, height: f64) -> BurstResult<()> {
    check_range("width", width, f64::MIN_POSITIVE, f64::MAX)?;
    check_range("height", height, f64::MIN_POSITIVE, f64::MAX)?;
    Ok(())
}

/// Two distinct elements of a slice, `i < j`.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

// =============================================================================
// Tests
// =============================================================================
