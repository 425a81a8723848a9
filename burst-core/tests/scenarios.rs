//! End-to-end scenarios driven only through the public API.

use approx::assert_relative_eq;
use burst_core::{Body, LaunchSide, PhysicsConfig, PlaygroundConfig, Rgb, Simulation, Vec2};

const FRAME: f64 = 1.0 / 60.0;

// ============================================================================
// Helpers
// ============================================================================

fn config(gravity: f64, friction: f64, elasticity: f64) -> PlaygroundConfig {
    PlaygroundConfig {
        physics: PhysicsConfig {
            gravity,
            friction,
            elasticity,
            ..Default::default()
        },
        seed: Some(42),
        ..Default::default()
    }
}

fn free(x: f64, y: f64, radius: f64, velocity: Vec2) -> Body {
    Body::new(Vec2::new(x, y), radius, Rgb::RED)
        .unwrap()
        .with_velocity(velocity)
}

fn run(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.step(FRAME);
    }
}

// ============================================================================
// Motion and walls
// ============================================================================

#[test]
fn resting_body_stays_put_without_forces() {
    let mut sim = Simulation::new(800.0, 600.0, config(0.0, 0.0, 0.6)).unwrap();
    sim.add_body(free(400.0, 300.0, 20.0, Vec2::ZERO)).unwrap();

    run(&mut sim, 600);

    let body = &sim.state().free_bodies[0];
    assert_eq!(body.position, Vec2::new(400.0, 300.0));
    assert_eq!(body.velocity, Vec2::ZERO);
}

#[test]
fn right_wall_reflection_loses_energy() {
    let mut sim = Simulation::new(800.0, 600.0, config(0.0, 0.0, 0.6)).unwrap();
    sim.add_body(free(780.0, 300.0, 20.0, Vec2::new(5.0, 0.0)))
        .unwrap();

    sim.step(FRAME);

    let body = &sim.state().free_bodies[0];
    assert_relative_eq!(body.position.x, 780.0);
    assert_relative_eq!(body.velocity.x, -3.0);
}

#[test]
fn ball_dropped_on_floor_settles() {
    let mut sim = Simulation::new(800.0, 600.0, config(0.3, 0.02, 0.6)).unwrap();
    sim.add_body(free(400.0, 100.0, 20.0, Vec2::ZERO)).unwrap();

    run(&mut sim, 1200);

    let body = &sim.state().free_bodies[0];
    assert_relative_eq!(body.position.y, 580.0, epsilon = 1.0);
    assert!(body.velocity.magnitude() < 1.0);
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn head_on_equal_masses_exchange_velocities() {
    let mut sim = Simulation::new(800.0, 600.0, config(0.0, 0.0, 1.0)).unwrap();
    sim.add_body(free(100.0, 300.0, 20.0, Vec2::new(10.0, 0.0)))
        .unwrap();
    sim.add_body(free(145.0, 300.0, 20.0, Vec2::ZERO)).unwrap();

    sim.step(FRAME);

    let bodies = &sim.state().free_bodies;
    assert_relative_eq!(bodies[0].velocity.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(bodies[1].velocity.x, 10.0, epsilon = 1e-9);
    assert!(bodies[0].visual.collision_effect > 0.0);
}

#[test]
fn perfectly_inelastic_config_from_yaml() {
    let yaml = "physics: {gravity: 0, friction: 0, elasticity: 0}\nseed: 1\n";
    let config = PlaygroundConfig::from_yaml_str(yaml).unwrap();
    let mut sim = Simulation::new(800.0, 600.0, config).unwrap();
    sim.add_body(free(100.0, 300.0, 20.0, Vec2::new(8.0, 0.0)))
        .unwrap();
    sim.add_body(free(145.0, 300.0, 20.0, Vec2::new(-2.0, 0.0)))
        .unwrap();

    sim.step(FRAME);

    let bodies = &sim.state().free_bodies;
    assert_relative_eq!(bodies[0].velocity.x, 3.0, epsilon = 1e-9);
    assert_relative_eq!(bodies[1].velocity.x, 3.0, epsilon = 1e-9);
}

#[test]
fn crowd_conserves_momentum_away_from_walls() {
    let mut sim = Simulation::new(2000.0, 2000.0, config(0.0, 0.0, 0.6)).unwrap();
    for i in 0..10 {
        for j in 0..10 {
            let vx = if (i + j) % 2 == 0 { 3.0 } else { -2.0 };
            let radius = 8.0 + (i % 3) as f64;
            sim.add_body(free(
                800.0 + 22.0 * i as f64,
                800.0 + 22.0 * j as f64,
                radius,
                Vec2::new(vx, 0.5 * vx),
            ))
            .unwrap();
        }
    }
    let before = sim.momentum();

    run(&mut sim, 20);

    let after = sim.momentum();
    assert_relative_eq!(after.x, before.x, max_relative = 1e-9);
    assert_relative_eq!(after.y, before.y, max_relative = 1e-9);
}

// ============================================================================
// Fragmentation
// ============================================================================

#[test]
fn launched_ball_bursts_on_floor() {
    let mut sim = Simulation::new(1280.0, 720.0, config(0.3, 0.02, 0.6)).unwrap();
    assert_eq!(sim.launch_all().unwrap(), 1);
    let parent = sim.state().main_bodies[0].clone();
    assert_eq!(parent.launch_side(), Some(LaunchSide::Left));

    run(&mut sim, 300);

    let state = sim.state();
    assert!(state.main_bodies.is_empty());
    assert_eq!(state.free_bodies.len(), 70);

    let total_mass: f64 = state.free_bodies.iter().map(Body::mass).sum();
    assert_relative_eq!(total_mass, parent.mass(), max_relative = 1e-9);
    assert!(state.free_bodies.iter().all(|b| b.is_finite() && b.visual.glow));
}

#[test]
fn same_seed_same_outcome() {
    fn simulate() -> Vec<Vec2> {
        let mut sim = Simulation::new(1280.0, 720.0, config(0.3, 0.02, 0.6)).unwrap();
        sim.launch_all().unwrap();
        run(&mut sim, 240);
        sim.state().bodies().map(|b| b.position).collect()
    }

    assert_eq!(simulate(), simulate());
}

#[test]
fn slow_motion_halves_simulated_time() {
    let mut slow = config(0.0, 0.0, 1.0);
    slow.physics.slow_motion_factor = 2.0;
    let mut sim = Simulation::new(800.0, 600.0, slow).unwrap();

    let ticks = (0..120).filter(|_| sim.advance_frame(FRAME)).count();

    assert_eq!(ticks, 60);
    assert_relative_eq!(sim.state().time, 1.0, max_relative = 1e-9);
}
