use crate::engine::{Context, Engine, EngineError, EngineState, LangevinParameters};
use mdrive_core::{BoxVectors, SimulationOptions, Topology};
use na::Vector3;

/// Engine that accepts any system and never moves it.
///
/// Potential energy is always zero and positions stay where they were set,
/// velocities are kept as given. Useful to check inputs and reporter output
/// without a force field backend.
#[derive(Debug, Default)]
pub struct FrozenEngine;

pub struct FrozenSystem {
    atom_count: usize,
    box_vectors: Option<BoxVectors>,
}

pub struct FrozenContext {
    atom_count: usize,
    parameters: LangevinParameters,
    positions: Option<Vec<Vector3<f64>>>,
    velocities: Vec<Vector3<f64>>,
    box_vectors: Option<BoxVectors>,
    steps: u64,
}

impl FrozenContext {
    /// Total number of steps taken by this context
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn parameters(&self) -> &LangevinParameters {
        &self.parameters
    }

    fn check_len(&self, what: &str, len: usize) -> Result<(), EngineError> {
        if len != self.atom_count {
            return Err(EngineError::new(format!(
                "got {} {} for a system of {} particles", len, what, self.atom_count)));
        }
        Ok(())
    }
}

impl Engine for FrozenEngine {
    type System = FrozenSystem;
    type Integrator = LangevinParameters;
    type Context = FrozenContext;

    fn name(&self) -> &str {
        "frozen"
    }

    fn create_system(&mut self, topology: &Topology, options: &SimulationOptions)
        -> Result<FrozenSystem, EngineError> {
        if options.electrostatics_method.requires_periodic_box() && !topology.is_periodic() {
            return Err(EngineError::new(format!(
                "{:?} electrostatics needs periodic box vectors", options.electrostatics_method)));
        }
        Ok(FrozenSystem {
            atom_count: topology.atom_count(),
            box_vectors: topology.box_vectors,
        })
    }

    fn create_integrator(&mut self, parameters: &LangevinParameters)
        -> Result<LangevinParameters, EngineError> {
        Ok(*parameters)
    }

    fn create_context(&mut self, system: FrozenSystem, integrator: LangevinParameters)
        -> Result<FrozenContext, EngineError> {
        Ok(FrozenContext {
            atom_count: system.atom_count,
            parameters: integrator,
            positions: None,
            velocities: vec![Vector3::zeros(); system.atom_count],
            box_vectors: system.box_vectors,
            steps: 0,
        })
    }
}

impl Context for FrozenContext {
    fn set_positions(&mut self, positions: &[Vector3<f64>]) -> Result<(), EngineError> {
        self.check_len("positions", positions.len())?;
        self.positions = Some(positions.to_vec());
        Ok(())
    }

    fn set_velocities(&mut self, velocities: &[Vector3<f64>]) -> Result<(), EngineError> {
        self.check_len("velocities", velocities.len())?;
        self.velocities = velocities.to_vec();
        Ok(())
    }

    fn set_box_vectors(&mut self, box_vectors: &BoxVectors) -> Result<(), EngineError> {
        self.box_vectors = Some(*box_vectors);
        Ok(())
    }

    fn minimize(&mut self, _tolerance: f64, _max_iterations: usize) -> Result<(), EngineError> {
        if self.positions.is_none() {
            return Err(EngineError::new("positions were never set"));
        }
        Ok(())
    }

    fn step(&mut self, steps: u64) -> Result<(), EngineError> {
        if self.positions.is_none() {
            return Err(EngineError::new("positions were never set"));
        }
        self.steps += steps;
        Ok(())
    }

    fn state(&self) -> Result<EngineState, EngineError> {
        let positions = self
            .positions
            .clone()
            .ok_or_else(|| EngineError::new("positions were never set"))?;
        Ok(EngineState {
            positions,
            velocities: self.velocities.clone(),
            potential_energy: 0.0,
            box_vectors: self.box_vectors,
        })
    }
}
