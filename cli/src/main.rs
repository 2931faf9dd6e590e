use std::process::ExitCode;
use clap::Parser;
use log::info;
use crate::args::*;
use crate::commands::{check, dry_run, DryRunOutput};

mod args;
mod commands;
mod progress;

#[cfg(test)]
mod tests;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let result = match &args.command {
        Commands::Check => {
            check(&args.coordinates, &args.topology, args.options.as_ref())
                .map(|summary| println!("{}", summary))
        }
        Commands::DryRun {
            steps,
            trajectory,
            trajectory_interval,
            log,
            log_interval,
            fields,
            seed,
            tolerance,
            max_iterations,
            quiet,
        } => {
            let output = DryRunOutput {
                trajectory,
                trajectory_interval: *trajectory_interval,
                log: log.as_deref(),
                log_interval: *log_interval,
                fields,
                progress: !*quiet,
            };
            dry_run(&args.coordinates, &args.topology, args.options.as_ref(),
                    *steps, *seed, *tolerance, *max_iterations, &output)
                .map(|state| info!("Final potential energy {} kJ/mol", state.potential_energy))
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error during {}: {}", err.stage(), err);
            ExitCode::FAILURE
        }
    }
}
