//! Python bindings for the burst-core playground engine.
//!
//! Provides a simple Python API for an external renderer:
//!
//! ```python
//! from burst_physics import Simulation
//!
//! sim = Simulation(1280.0, 720.0)
//! sim.add_ball(size=80.0, fragments=40, side="right", angle=10.0)
//! sim.launch()
//!
//! while renderer.running():
//!     if sim.advance_frame(renderer.frame_time()):
//!         for body in sim.bodies():
//!             renderer.circle(body.x, body.y, body.radius, body.color, body.glow)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use burst_core::config::BallConfig;
use burst_core::{
    Body as CoreBody, BurstError, LaunchSide, PlaygroundConfig, Rgb,
    Simulation as CoreSimulation,
};

fn to_py_err(err: BurstError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_side(side: &str) -> PyResult<LaunchSide> {
    match side.to_ascii_lowercase().as_str() {
        "left" => Ok(LaunchSide::Left),
        "right" => Ok(LaunchSide::Right),
        "top" => Ok(LaunchSide::Top),
        "bottom" => Ok(LaunchSide::Bottom),
        other => Err(PyValueError::new_err(format!(
            "unknown launch side {other:?} (expected left, right, top or bottom)"
        ))),
    }
}

fn parse_color(color: Option<&str>) -> PyResult<Option<Rgb>> {
    color
        .map(|hex| Rgb::from_hex(hex).map_err(to_py_err))
        .transpose()
}

/// Read-only snapshot of one body, for drawing.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct Body {
    #[pyo3(get)]
    pub x: f64,
    #[pyo3(get)]
    pub y: f64,
    #[pyo3(get)]
    pub vx: f64,
    #[pyo3(get)]
    pub vy: f64,
    #[pyo3(get)]
    pub radius: f64,
    /// `#rrggbb`
    #[pyo3(get)]
    pub color: String,
    #[pyo3(get)]
    pub glow: bool,
    /// Collision flash intensity in [0, 1]
    #[pyo3(get)]
    pub flash: f64,
    #[pyo3(get)]
    pub is_main: bool,
}

#[pymethods]
impl Body {
    fn __repr__(&self) -> String {
        format!(
            "Body(x={:.2}, y={:.2}, r={:.2}, color={}{})",
            self.x,
            self.y,
            self.radius,
            self.color,
            if self.is_main { ", main" } else { "" }
        )
    }

    fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

impl From<&CoreBody> for Body {
    fn from(body: &CoreBody) -> Self {
        Self {
            x: body.position.x,
            y: body.position.y,
            vx: body.velocity.x,
            vy: body.velocity.y,
            radius: body.radius(),
            color: body.color.to_string(),
            glow: body.visual.glow,
            flash: body.visual.collision_effect,
            is_main: body.is_main(),
        }
    }
}

/// Main simulation class.
///
/// Owns every body; the renderer reads them back after each tick.
#[pyclass]
pub struct Simulation {
    inner: CoreSimulation,
}

#[pymethods]
impl Simulation {
    /// Create an empty arena.
    ///
    /// `config` is a YAML or JSON snapshot string; defaults are used when
    /// omitted. An empty ball list is replaced by `add_ball` calls.
    #[new]
    #[pyo3(signature = (width, height, config=None))]
    fn new(width: f64, height: f64, config: Option<&str>) -> PyResult<Self> {
        let config = match config {
            Some(text) => PlaygroundConfig::from_yaml_str(text).map_err(to_py_err)?,
            None => PlaygroundConfig {
                balls: vec![],
                ..Default::default()
            },
        };
        let inner = CoreSimulation::new(width, height, config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Simulated seconds since the last reset.
    #[getter]
    fn time(&self) -> f64 {
        self.inner.state().time
    }

    #[getter]
    fn ticks(&self) -> u64 {
        self.inner.state().ticks
    }

    #[getter]
    fn width(&self) -> f64 {
        self.inner.state().width
    }

    #[getter]
    fn height(&self) -> f64 {
        self.inner.state().height
    }

    /// Configure another main ball for the next `launch`.
    ///
    /// Returns the ball index.
    #[allow(clippy::too_many_arguments)]
    #[pyo3(signature = (
        size=100.0,
        fragments=70,
        speed=15.0,
        side="left",
        angle=0.0,
        color=None,
        fragment_color=None
    ))]
    fn add_ball(
        &mut self,
        size: f64,
        fragments: u32,
        speed: f64,
        side: &str,
        angle: f64,
        color: Option<&str>,
        fragment_color: Option<&str>,
    ) -> PyResult<usize> {
        let ball = BallConfig {
            ball_size: size,
            num_balls: fragments,
            launch_speed: speed,
            launch_side: parse_side(side)?,
            launch_angle: angle,
            main_ball_color: parse_color(color)?,
            small_ball_color: parse_color(fragment_color)?,
        };
        ball.validate().map_err(to_py_err)?;

        let mut config = self.inner.config().clone();
        config.balls.push(ball);
        let index = config.balls.len() - 1;
        self.inner.set_config(config).map_err(to_py_err)?;
        Ok(index)
    }

    /// Drop every configured ball.
    fn clear_balls(&mut self) -> PyResult<()> {
        let mut config = self.inner.config().clone();
        config.balls.clear();
        self.inner.set_config(config).map_err(to_py_err)
    }

    /// Spawn and launch every configured ball. Returns how many launched.
    fn launch(&mut self) -> PyResult<usize> {
        self.inner.launch_all().map_err(to_py_err)
    }

    /// Advance the simulation by dt seconds (clamped to 0.1).
    fn step(&mut self, dt: f64) {
        self.inner.step(dt);
    }

    /// Run multiple steps at once.
    fn step_n(&mut self, dt: f64, steps: usize) {
        for _ in 0..steps {
            self.inner.step(dt);
        }
    }

    /// Feed one rendered frame through the slow-motion clock.
    ///
    /// Returns True when a tick ran.
    fn advance_frame(&mut self, frame_dt: f64) -> bool {
        self.inner.advance_frame(frame_dt)
    }

    /// Remove every body.
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn set_dark_mode(&mut self, enabled: bool) {
        self.inner.set_glow(enabled);
    }

    fn set_slow_motion(&mut self, factor: f64) -> PyResult<()> {
        let mut physics = self.inner.config().physics.clone();
        physics.slow_motion_factor = factor;
        self.inner.set_physics(physics).map_err(to_py_err)
    }

    /// Update gravity, elasticity and friction in one go.
    fn set_physics(&mut self, gravity: f64, elasticity: f64, friction: f64) -> PyResult<()> {
        let mut physics = self.inner.config().physics.clone();
        physics.gravity = gravity;
        physics.elasticity = elasticity;
        physics.friction = friction;
        self.inner.set_physics(physics).map_err(to_py_err)
    }

    fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        self.inner.resize(width, height).map_err(to_py_err)
    }

    /// Snapshot of every body, main bodies first.
    fn bodies(&self) -> Vec<Body> {
        self.inner.state().bodies().map(Body::from).collect()
    }

    fn body_count(&self) -> usize {
        self.inner.state().body_count()
    }

    fn kinetic_energy(&self) -> f64 {
        self.inner.kinetic_energy()
    }

    /// Total momentum as (px, py).
    fn momentum(&self) -> (f64, f64) {
        let p = self.inner.momentum();
        (p.x, p.y)
    }

    /// Current configuration as a YAML string.
    fn config_yaml(&self) -> PyResult<String> {
        self.inner.config().to_yaml().map_err(to_py_err)
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        let state = self.inner.state();
        let dict = PyDict::new(py);
        dict.set_item("time", state.time)?;
        dict.set_item("ticks", state.ticks)?;
        dict.set_item("width", state.width)?;
        dict.set_item("height", state.height)?;
        dict.set_item("main_bodies", state.main_bodies.len())?;
        dict.set_item("free_bodies", state.free_bodies.len())?;
        dict.set_item("kinetic_energy", state.kinetic_energy())?;

        let positions = PyList::empty(py);
        for body in state.bodies() {
            positions.append((body.position.x, body.position.y, body.radius()))?;
        }
        dict.set_item("positions", positions)?;
        Ok(dict.into())
    }
}

/// Python module definition.
#[pymodule]
fn burst_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Body>()?;
    m.add_class::<Simulation>()?;
    Ok(())
}
