use indicatif::{ProgressBar, ProgressStyle};
use mdrive_core::SimulationState;
use mdrive_driver::reporter::{ReportContext, Reporter};
use std::io;

/// Progress bar over the steps of one run
pub struct ProgressReporter {
    bar: ProgressBar,
    interval: u64,
}

impl ProgressReporter {
    pub fn new(total_steps: u64, interval: u64) -> Self {
        let bar = ProgressBar::new(total_steps);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} steps [{elapsed_precise}] {msg}") {
            bar.set_style(style);
        }
        Self { bar, interval }
    }
}

impl Reporter for ProgressReporter {
    fn interval(&self) -> u64 {
        self.interval
    }

    fn report(&mut self, state: &SimulationState, _context: &ReportContext) -> io::Result<()> {
        self.bar.set_position(state.step);
        self.bar.set_message(format!("{:.1} K", state.temperature));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.bar.finish_with_message("done");
        Ok(())
    }
}
