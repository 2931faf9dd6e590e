use std::io;
use std::path::{Path, PathBuf};
use log::info;
use mdrive_core::io::{load_coordinates, load_topology};
use mdrive_core::{Coordinates, Error, Result, SimulationOptions, SimulationState, Topology};
use mdrive_driver::engine::FrozenEngine;
use mdrive_driver::reporter::{DcdReporter, StateDataField, StateDataReporter};
use mdrive_driver::Simulation;
use crate::args::LogField;
use crate::progress::ProgressReporter;

/// Everything a run needs before the engine is involved
pub struct Inputs {
    pub topology: Topology,
    pub coordinates: Coordinates,
    pub options: SimulationOptions,
}

pub fn load_inputs(coordinates: &Path, topology: &Path, options: Option<&PathBuf>) -> Result<Inputs> {
    let coordinates = load_coordinates(coordinates)?;
    let topology = load_topology(topology, coordinates.box_vectors)?;
    let options = match options {
        Some(path) => SimulationOptions::load_from_file(path)?,
        None => SimulationOptions::default(),
    };
    Ok(Inputs {
        topology,
        coordinates,
        options,
    })
}

/// Human readable summary of a validated system
pub fn summary(simulation: &Simulation<impl mdrive_driver::engine::Context>) -> String {
    let topology = simulation.topology();
    let mut lines = vec![
        format!("atoms: {}", topology.atom_count()),
        format!("residues: {}", topology.residues.len()),
        format!("bonds: {} ({} with hydrogen)", topology.bonds.len(), topology.hydrogen_bonds().count()),
        format!("angles: {}", topology.angles.len()),
        format!("total charge: {:.4} e", topology.total_charge()),
        format!("degrees of freedom: {}", simulation.degrees_of_freedom()),
    ];
    match &topology.box_vectors {
        Some(box_vectors) => {
            let (a, b, c) = box_vectors.lengths();
            let (alpha, beta, gamma) = box_vectors.angles();
            lines.push(format!("box: {:.4} {:.4} {:.4} nm, {:.2} {:.2} {:.2} deg", a, b, c, alpha, beta, gamma));
        }
        None => lines.push(String::from("box: none")),
    }
    lines.join("\n")
}

pub fn check(coordinates: &Path, topology: &Path, options: Option<&PathBuf>) -> Result<String> {
    let inputs = load_inputs(coordinates, topology, options)?;
    let mut engine = FrozenEngine;
    let simulation = Simulation::new(&mut engine, inputs.topology, &inputs.coordinates, inputs.options)?;
    Ok(format!("{}\noptions:\n{}", summary(&simulation), simulation.options().to_json_pretty()))
}

pub struct DryRunOutput<'a> {
    pub trajectory: &'a Path,
    pub trajectory_interval: u64,
    pub log: Option<&'a Path>,
    pub log_interval: u64,
    pub fields: &'a [LogField],
    pub progress: bool,
}

/// Minimize, attach reporters and step through the whole run with [FrozenEngine].
pub fn dry_run(coordinates: &Path, topology: &Path, options: Option<&PathBuf>,
               steps: u64, seed: Option<u64>, tolerance: f64, max_iterations: usize,
               output: &DryRunOutput) -> Result<SimulationState> {
    let inputs = load_inputs(coordinates, topology, options)?;
    let carries_velocities = inputs.coordinates.velocities.is_some();
    let mut engine = FrozenEngine;
    let mut simulation = Simulation::new(&mut engine, inputs.topology, &inputs.coordinates, inputs.options)?;
    simulation.minimize_energy(tolerance, max_iterations)?;
    if !carries_velocities {
        let temperature = simulation.options().temperature;
        simulation.set_velocities_to_temperature(temperature, seed)?;
    }

    let trajectory = DcdReporter::create(output.trajectory, output.trajectory_interval)
        .map_err(|e| Error::sink(output.trajectory, e))?;
    simulation.add_reporter(Box::new(trajectory))?;
    let fields: Vec<StateDataField> = output.fields.iter().map(|&field| field.into()).collect();
    match output.log {
        Some(path) => simulation.add_reporter(Box::new(
            StateDataReporter::create(path, output.log_interval, &fields)
                .map_err(|e| Error::sink(path, e))?))?,
        None => simulation.add_reporter(Box::new(
            StateDataReporter::new(io::stdout(), output.log_interval, &fields)))?,
    }
    let progress_interval = (steps / 100).max(1);
    if output.progress {
        simulation.add_reporter(Box::new(ProgressReporter::new(steps, progress_interval)))?;
    }

    simulation.step(steps)?;
    let state = simulation.finish()?;
    info!("Trajectory saved to {}", output.trajectory.to_string_lossy());
    Ok(state)
}
