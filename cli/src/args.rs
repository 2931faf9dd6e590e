use std::path::PathBuf;
use clap::{Parser, Subcommand};
use clap::ValueEnum;
use mdrive_driver::reporter::StateDataField;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Amber coordinate or restart file (inpcrd, rst7)
    #[arg(short = 'c', long, global = true, default_value = "input.inpcrd")]
    pub coordinates: PathBuf,
    /// Amber topology file (prmtop)
    #[arg(short = 'p', long, global = true, default_value = "input.prmtop")]
    pub topology: PathBuf,
    /// JSON file with simulation options, defaults are used when absent
    #[arg(long, global = true)]
    pub options: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Columns of the state log
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogField {
    Step,
    Time,
    PotentialEnergy,
    KineticEnergy,
    TotalEnergy,
    Temperature,
}

impl From<LogField> for StateDataField {
    fn from(field: LogField) -> Self {
        match field {
            LogField::Step => StateDataField::Step,
            LogField::Time => StateDataField::Time,
            LogField::PotentialEnergy => StateDataField::PotentialEnergy,
            LogField::KineticEnergy => StateDataField::KineticEnergy,
            LogField::TotalEnergy => StateDataField::TotalEnergy,
            LogField::Temperature => StateDataField::Temperature,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// load inputs, validate them and print a summary
    Check,
    /// run the whole protocol against an engine that never moves atoms
    DryRun {
        /// number of steps
        #[arg(short = 'n', long, default_value_t = 10000)]
        steps: u64,
        /// DCD trajectory output
        #[arg(short = 'o', long, default_value = "output.dcd")]
        trajectory: PathBuf,
        /// steps between trajectory frames
        #[arg(long, default_value_t = 1000)]
        trajectory_interval: u64,
        /// state log output, stdout when not set
        #[arg(short = 'l', long)]
        log: Option<PathBuf>,
        /// steps between state log lines
        #[arg(long, default_value_t = 1000)]
        log_interval: u64,
        /// state log columns
        #[arg(long, value_enum, num_args = 1.., value_delimiter = ',',
              default_values_t = [LogField::Step, LogField::PotentialEnergy, LogField::Temperature])]
        fields: Vec<LogField>,
        /// seed for initial velocities when coordinates carry none
        #[arg(long)]
        seed: Option<u64>,
        /// energy tolerance of the initial minimization in kJ/mol/nm
        #[arg(long, default_value_t = 10.0)]
        tolerance: f64,
        /// minimizer iteration limit, 0 means until converged
        #[arg(long, default_value_t = 0)]
        max_iterations: usize,
        /// hide the progress bar
        #[arg(short = 'q', long)]
        quiet: bool,
    },
}
