use crate::reporter::{ReportContext, Reporter};
use mdrive_core::SimulationState;
use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// ps per AKMA time unit
const AKMA_TIME: f64 = 0.04888821;
const NM_TO_ANGSTROM: f64 = 10.0;
const CHARMM_VERSION: i32 = 24;
const FRAME_COUNT_OFFSET: u64 = 8;
const LAST_STEP_OFFSET: u64 = 20;

/// Writes positions to a CHARMM style DCD trajectory.
///
/// Unit cell records hold edge lengths in Angstrom and the cosines of the
/// cell angles. The header is written with the first frame. After every frame the frame
/// count and last step in the header are patched, so the file is readable
/// whenever the run stops.
pub struct DcdReporter<W: Write + Seek> {
    out: W,
    interval: u64,
    first_step: Option<u64>,
    frames: u32,
    atom_count: usize,
}

impl DcdReporter<BufWriter<File>> {
    pub fn create(path: &Path, interval: u64) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), interval))
    }
}

fn write_i32(out: &mut impl Write, value: i32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

fn write_f32(out: &mut impl Write, value: f32) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

fn write_f64(out: &mut impl Write, value: f64) -> io::Result<()> {
    out.write_all(&value.to_le_bytes())
}

fn to_i32(value: u64, what: &str) -> io::Result<i32> {
    i32::try_from(value).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{} {} does not fit a DCD header", what, value))
    })
}

impl<W: Write + Seek> DcdReporter<W> {
    pub fn new(out: W, interval: u64) -> Self {
        Self {
            out,
            interval,
            first_step: None,
            frames: 0,
            atom_count: 0,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self, state: &SimulationState, timestep: f64) -> io::Result<()> {
        let out = &mut self.out;
        write_i32(out, 84)?;
        out.write_all(b"CORD")?;
        write_i32(out, 0)?;
        write_i32(out, to_i32(state.step, "first step")?)?;
        write_i32(out, to_i32(self.interval, "interval")?)?;
        write_i32(out, to_i32(state.step, "last step")?)?;
        for _ in 0..5 {
            write_i32(out, 0)?;
        }
        write_f32(out, (timestep / AKMA_TIME) as f32)?;
        write_i32(out, i32::from(state.box_vectors.is_some()))?;
        for _ in 0..8 {
            write_i32(out, 0)?;
        }
        write_i32(out, CHARMM_VERSION)?;
        write_i32(out, 84)?;

        write_i32(out, 164)?;
        write_i32(out, 2)?;
        for title in ["Created by mdrive", "Positions in Angstrom"] {
            let mut line = [b' '; 80];
            let bytes = title.as_bytes();
            line[..bytes.len()].copy_from_slice(bytes);
            out.write_all(&line)?;
        }
        write_i32(out, 164)?;

        write_i32(out, 4)?;
        write_i32(out, to_i32(state.atom_count() as u64, "atom count")?)?;
        write_i32(out, 4)?;
        Ok(())
    }

    fn write_frame(&mut self, state: &SimulationState) -> io::Result<()> {
        let out = &mut self.out;
        if let Some(box_vectors) = &state.box_vectors {
            let (a, b, c) = box_vectors.lengths();
            let (alpha, beta, gamma) = box_vectors.angles();
            write_i32(out, 48)?;
            let cosine = |angle: f64| angle.to_radians().cos();
            for value in [a * NM_TO_ANGSTROM, cosine(gamma), b * NM_TO_ANGSTROM,
                          cosine(beta), cosine(alpha), c * NM_TO_ANGSTROM] {
                write_f64(out, value)?;
            }
            write_i32(out, 48)?;
        }
        let length = to_i32(4 * state.atom_count() as u64, "frame size")?;
        for axis in 0..3 {
            write_i32(out, length)?;
            for position in &state.positions {
                write_f32(out, (position[axis] * NM_TO_ANGSTROM) as f32)?;
            }
            write_i32(out, length)?;
        }
        Ok(())
    }

    fn update_header(&mut self, last_step: u64) -> io::Result<()> {
        let frames = self.frames as i32;
        self.out.seek(SeekFrom::Start(FRAME_COUNT_OFFSET))?;
        write_i32(&mut self.out, frames)?;
        self.out.seek(SeekFrom::Start(LAST_STEP_OFFSET))?;
        write_i32(&mut self.out, to_i32(last_step, "last step")?)?;
        self.out.seek(SeekFrom::End(0))?;
        Ok(())
    }
}

impl<W: Write + Seek> Reporter for DcdReporter<W> {
    fn interval(&self) -> u64 {
        self.interval
    }

    fn report(&mut self, state: &SimulationState, context: &ReportContext) -> io::Result<()> {
        match self.first_step {
            None => {
                self.write_header(state, context.options.timestep)?;
                self.first_step = Some(state.step);
                self.atom_count = state.atom_count();
            }
            Some(_) if state.atom_count() != self.atom_count => {
                return Err(io::Error::new(io::ErrorKind::InvalidData, format!(
                    "DCD frame has {} atoms, header declares {}", state.atom_count(), self.atom_count)));
            }
            Some(_) => {}
        }
        self.write_frame(state)?;
        self.frames += 1;
        self.update_header(state.step)?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        log::debug!("DCD trajectory closed with {} frames", self.frames);
        self.out.flush()
    }
}
