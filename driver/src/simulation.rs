use crate::engine::{Context, Engine, EngineError, LangevinParameters};
use crate::observables;
use crate::reporter::{ReportContext, Reporter};
use crate::velocity;
use log::{debug, info};
use na::Vector3;
use mdrive_core::{BoxVectors, Coordinates, Error, Result, SimulationOptions, SimulationState,
                  Stage, Topology};

/// Drives one run: owns the engine context, the current state and the reporters.
pub struct Simulation<C: Context> {
    topology: Topology,
    options: SimulationOptions,
    context: C,
    state: SimulationState,
    reporters: Vec<Box<dyn Reporter>>,
    masses: Vec<f64>,
    degrees_of_freedom: usize,
    start_time: f64,
}

/// Reject option combinations the engine could only fail on later.
fn check_periodicity(options: &SimulationOptions, box_vectors: Option<&BoxVectors>) -> Result<()> {
    if !options.electrostatics_method.requires_periodic_box() {
        return Ok(());
    }
    let box_vectors = box_vectors.ok_or_else(|| Error::configuration(format!(
        "{:?} electrostatics requires periodic box vectors", options.electrostatics_method)))?;
    let half_width = box_vectors.min_width() / 2.0;
    if options.cutoff_distance > half_width {
        return Err(Error::configuration(format!(
            "cutoff {} nm exceeds half the box width ({} nm)", options.cutoff_distance, half_width)));
    }
    Ok(())
}

impl<C: Context> Simulation<C> {
    /// Validate inputs, then ask `engine` for a system, an integrator and a context
    /// holding the initial positions.
    ///
    /// Nothing is requested from the engine when coordinates and topology disagree
    /// on the number of atoms or when options are invalid.
    pub fn new<E>(engine: &mut E, topology: Topology, coordinates: &Coordinates,
                  options: SimulationOptions) -> Result<Self>
    where
        E: Engine<Context = C>,
    {
        if coordinates.atom_count() != topology.atom_count() {
            return Err(Error::configuration(format!(
                "coordinates hold {} atoms but topology has {}",
                coordinates.atom_count(), topology.atom_count())));
        }
        if let Some(velocities) = &coordinates.velocities {
            if velocities.len() != topology.atom_count() {
                return Err(Error::configuration(format!(
                    "coordinates hold {} velocities for {} atoms",
                    velocities.len(), topology.atom_count())));
            }
        }
        options.validate()?;
        let mut topology = topology;
        if coordinates.box_vectors.is_some() {
            topology.box_vectors = coordinates.box_vectors;
        }
        check_periodicity(&options, topology.box_vectors.as_ref())?;

        info!("Building system of {} atoms with the {} engine", topology.atom_count(), engine.name());
        let system = engine
            .create_system(&topology, &options)
            .map_err(|e| e.at(Stage::Build))?;
        let integrator = engine
            .create_integrator(&LangevinParameters::from(&options))
            .map_err(|e| e.at(Stage::Integrator))?;
        let mut context = engine
            .create_context(system, integrator)
            .map_err(|e| e.at(Stage::Context))?;
        if let Some(box_vectors) = &topology.box_vectors {
            context
                .set_box_vectors(box_vectors)
                .map_err(|e| e.at(Stage::Context))?;
        }
        context
            .set_positions(&coordinates.positions)
            .map_err(|e| e.at(Stage::Context))?;
        if let Some(velocities) = &coordinates.velocities {
            context
                .set_velocities(velocities)
                .map_err(|e| e.at(Stage::Context))?;
        }

        let masses = topology.masses();
        let degrees_of_freedom = observables::degrees_of_freedom(&topology, &options);
        let start_time = coordinates.time.unwrap_or(0.0);
        let mut simulation = Self {
            topology,
            options,
            context,
            state: SimulationState {
                time: start_time,
                ..Default::default()
            },
            reporters: vec![],
            masses,
            degrees_of_freedom,
            start_time,
        };
        simulation.refresh_state()?;
        Ok(simulation)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn current_step(&self) -> u64 {
        self.state.step
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.degrees_of_freedom
    }

    pub fn reporter_count(&self) -> usize {
        self.reporters.len()
    }

    /// Register a reporter. Reporters are notified in the order they were added.
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) -> Result<()> {
        if reporter.interval() == 0 {
            return Err(Error::configuration("reporter interval must be at least one step"));
        }
        debug!("Reporter #{} registered with interval {}", self.reporters.len(), reporter.interval());
        self.reporters.push(reporter);
        Ok(())
    }

    /// Local energy minimization, delegated to the engine.
    pub fn minimize_energy(&mut self, tolerance: f64, max_iterations: usize) -> Result<()> {
        info!("Minimizing energy (tolerance {} kJ/mol/nm)", tolerance);
        let before = self.state.potential_energy;
        self.context
            .minimize(tolerance, max_iterations)
            .map_err(|e| e.at(Stage::Minimize))?;
        self.refresh_state()?;
        info!("Potential energy {} -> {} kJ/mol", before, self.state.potential_energy);
        Ok(())
    }

    /// Replace velocities with a Maxwell-Boltzmann draw at `temperature`.
    pub fn set_velocities_to_temperature(&mut self, temperature: f64, seed: Option<u64>) -> Result<()> {
        if !(temperature > 0.0) || !temperature.is_finite() {
            return Err(Error::configuration(format!(
                "temperature must be positive, got {}", temperature)));
        }
        let velocities = velocity::maxwell_boltzmann(&self.masses, temperature, seed);
        self.context
            .set_velocities(&velocities)
            .map_err(|e| e.at(Stage::Context))?;
        self.refresh_state()
    }

    /// Advance exactly `num_steps` steps, notifying due reporters after each step.
    pub fn step(&mut self, num_steps: u64) -> Result<()> {
        let target = self.state.step + num_steps;
        info!("Running {} steps ({} -> {})", num_steps, self.state.step, target);
        let mut fresh = true;
        while self.state.step < target {
            let next = self.next_report_step(target);
            let chunk = next - self.state.step;
            self.context.step(chunk).map_err(|e| e.at(Stage::Step))?;
            self.state.step = next;
            self.state.time = self.start_time + next as f64 * self.options.timestep;
            fresh = false;

            let step = self.state.step;
            if !self.reporters.iter().any(|reporter| step % reporter.interval() == 0) {
                continue;
            }
            self.refresh_state()?;
            fresh = true;
            let context = ReportContext {
                topology: &self.topology,
                options: &self.options,
                degrees_of_freedom: self.degrees_of_freedom,
            };
            for reporter in self.reporters.iter_mut() {
                if step % reporter.interval() != 0 {
                    continue;
                }
                reporter
                    .report(&self.state, &context)
                    .map_err(|source| Error::Report { step, source })?;
            }
        }
        if !fresh {
            self.refresh_state()?;
        }
        Ok(())
    }

    /// Flush every reporter and hand back the final state.
    pub fn finish(mut self) -> Result<SimulationState> {
        let step = self.state.step;
        for reporter in self.reporters.iter_mut() {
            reporter
                .finish()
                .map_err(|source| Error::Report { step, source })?;
        }
        info!("Run finished at step {} ({} ps)", step, self.state.time);
        Ok(self.state)
    }

    /// First step in `(current, target]` at which some reporter is due, or `target`.
    fn next_report_step(&self, target: u64) -> u64 {
        let current = self.state.step;
        self.reporters
            .iter()
            .map(|reporter| {
                let interval = reporter.interval();
                (current / interval + 1) * interval
            })
            .min()
            .map_or(target, |next| next.min(target))
    }

    fn refresh_state(&mut self) -> Result<()> {
        let engine_state = self.context.state().map_err(|e| e.at(Stage::State))?;
        let atom_count = self.topology.atom_count();
        if engine_state.positions.len() != atom_count {
            return Err(EngineError::new(format!(
                "engine returned {} positions for {} atoms", engine_state.positions.len(), atom_count))
                .at(Stage::State));
        }
        let velocities = if engine_state.velocities.is_empty() {
            vec![Vector3::zeros(); atom_count]
        } else if engine_state.velocities.len() == atom_count {
            engine_state.velocities
        } else {
            return Err(EngineError::new(format!(
                "engine returned {} velocities for {} atoms", engine_state.velocities.len(), atom_count))
                .at(Stage::State));
        };
        self.state.kinetic_energy = observables::kinetic_energy(&self.masses, &velocities);
        self.state.temperature = observables::temperature(self.state.kinetic_energy, self.degrees_of_freedom);
        self.state.positions = engine_state.positions;
        self.state.velocities = velocities;
        self.state.potential_energy = engine_state.potential_energy;
        self.state.box_vectors = engine_state.box_vectors.or(self.topology.box_vectors);
        Ok(())
    }
}
