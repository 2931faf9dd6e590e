use crate::reporter::{ReportContext, Reporter};
use csv::{QuoteStyle, Writer, WriterBuilder};
use mdrive_core::SimulationState;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Scalar that can be written to the state log. Columns appear in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateDataField {
    Step,
    Time,
    PotentialEnergy,
    KineticEnergy,
    TotalEnergy,
    Temperature,
}

impl StateDataField {
    pub fn header(&self) -> &'static str {
        match self {
            StateDataField::Step => "Step",
            StateDataField::Time => "Time (ps)",
            StateDataField::PotentialEnergy => "Potential Energy (kJ/mole)",
            StateDataField::KineticEnergy => "Kinetic Energy (kJ/mole)",
            StateDataField::TotalEnergy => "Total Energy (kJ/mole)",
            StateDataField::Temperature => "Temperature (K)",
        }
    }

    fn value(&self, state: &SimulationState) -> String {
        match self {
            StateDataField::Step => state.step.to_string(),
            StateDataField::Time => format!("{:.4}", state.time),
            StateDataField::PotentialEnergy => state.potential_energy.to_string(),
            StateDataField::KineticEnergy => state.kinetic_energy.to_string(),
            StateDataField::TotalEnergy => state.total_energy().to_string(),
            StateDataField::Temperature => state.temperature.to_string(),
        }
    }
}

/// Comma separated log of selected scalars, one line per report
pub struct StateDataReporter<W: Write> {
    writer: Writer<W>,
    interval: u64,
    fields: Vec<StateDataField>,
    header_written: bool,
}

impl StateDataReporter<BufWriter<File>> {
    pub fn create(path: &Path, interval: u64, fields: &[StateDataField]) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), interval, fields))
    }
}

fn csv_error(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

impl<W: Write> StateDataReporter<W> {
    pub fn new(out: W, interval: u64, fields: &[StateDataField]) -> Self {
        let mut fields = fields.to_vec();
        fields.sort();
        fields.dedup();
        let writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .from_writer(out);
        Self {
            writer,
            interval,
            fields,
            header_written: false,
        }
    }

    pub fn fields(&self) -> &[StateDataField] {
        &self.fields
    }

    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    fn write_header(&mut self) -> io::Result<()> {
        let header: Vec<String> = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let prefix = if index == 0 { "#" } else { "" };
                format!("{}\"{}\"", prefix, field.header())
            })
            .collect();
        self.writer.write_record(&header).map_err(csv_error)
    }
}

impl<W: Write> Reporter for StateDataReporter<W> {
    fn interval(&self) -> u64 {
        self.interval
    }

    fn report(&mut self, state: &SimulationState, _context: &ReportContext) -> io::Result<()> {
        if self.fields.is_empty() {
            return Ok(());
        }
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }
        let record: Vec<String> = self.fields.iter().map(|field| field.value(state)).collect();
        self.writer.write_record(&record).map_err(csv_error)?;
        self.writer.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
