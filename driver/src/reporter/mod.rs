mod dcd;
mod state_data;

pub use dcd::DcdReporter;
pub use state_data::{StateDataField, StateDataReporter};

use mdrive_core::{SimulationOptions, SimulationState, Topology};
use std::io;

/// Facts about the run that do not change between reports
pub struct ReportContext<'a> {
    pub topology: &'a Topology,
    pub options: &'a SimulationOptions,
    pub degrees_of_freedom: usize,
}

/// Periodic output sink.
///
/// The driver calls [Reporter::report] after every step that is a multiple
/// of [Reporter::interval], in the order reporters were added.
pub trait Reporter {
    /// Report every `interval` steps. Must not be zero.
    fn interval(&self) -> u64;

    fn report(&mut self, state: &SimulationState, context: &ReportContext) -> io::Result<()>;

    /// Flush and release the output. Called once when the run is finished.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
