//! Contract with the external force field engine.
//!
//! The engine owns everything numerical: parameter assignment, nonbonded
//! methods, constraints and the integrator itself. The driver only ever
//! sees opaque system and integrator handles and a [Context] it can
//! position, minimize, step and query.

mod frozen;

pub use frozen::{FrozenContext, FrozenEngine, FrozenSystem};

use mdrive_core::{BoxVectors, Error, SimulationOptions, Stage, Topology};
use na::Vector3;
use std::fmt;

/// Opaque failure reported by an engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        EngineError(message.into())
    }

    /// Attach the stage the driver was in when the engine failed.
    pub fn at(self, stage: Stage) -> Error {
        Error::Engine {
            stage,
            message: self.0,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for EngineError {}

/// Ensemble parameters of a Langevin integrator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LangevinParameters {
    /// Bath temperature in Kelvin
    pub temperature: f64,
    /// Friction coefficient in 1/ps
    pub friction_coefficient: f64,
    /// Step size in ps
    pub timestep: f64,
}

impl From<&SimulationOptions> for LangevinParameters {
    fn from(options: &SimulationOptions) -> Self {
        Self {
            temperature: options.temperature,
            friction_coefficient: options.friction_coefficient,
            timestep: options.timestep,
        }
    }
}

/// What an engine hands back when asked for its current state
#[derive(Clone, Debug, Default)]
pub struct EngineState {
    pub positions: Vec<Vector3<f64>>,
    /// May be empty if the engine does not track velocities
    pub velocities: Vec<Vector3<f64>>,
    /// Potential energy in kJ/mol
    pub potential_energy: f64,
    pub box_vectors: Option<BoxVectors>,
}

pub trait Engine {
    type System;
    type Integrator;
    type Context: Context;

    fn name(&self) -> &str;

    fn create_system(&mut self, topology: &Topology, options: &SimulationOptions)
        -> Result<Self::System, EngineError>;

    fn create_integrator(&mut self, parameters: &LangevinParameters)
        -> Result<Self::Integrator, EngineError>;

    fn create_context(&mut self, system: Self::System, integrator: Self::Integrator)
        -> Result<Self::Context, EngineError>;
}

/// A system bound to an integrator, ready to move
pub trait Context {
    fn set_positions(&mut self, positions: &[Vector3<f64>]) -> Result<(), EngineError>;

    fn set_velocities(&mut self, velocities: &[Vector3<f64>]) -> Result<(), EngineError>;

    fn set_box_vectors(&mut self, box_vectors: &BoxVectors) -> Result<(), EngineError>;

    /// Local energy minimization. Blocks until converged to `tolerance` (kJ/mol/nm)
    /// or `max_iterations` is hit, zero meaning no limit.
    fn minimize(&mut self, tolerance: f64, max_iterations: usize) -> Result<(), EngineError>;

    fn step(&mut self, steps: u64) -> Result<(), EngineError>;

    fn state(&self) -> Result<EngineState, EngineError>;
}
