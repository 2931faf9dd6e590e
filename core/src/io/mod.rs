//! Readers for Amber input files.
//!
//! Lengths are converted to nm, velocities to nm/ps and charges to
//! elementary charges on the way in, so nothing past the loader needs
//! to know about Amber units.

mod inpcrd;
mod prmtop;

use crate::error::{Error, Result};
use crate::{BoxVectors, Coordinates, Topology};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// Amber stores lengths in Angstrom
pub const ANGSTROM_TO_NM: f64 = 0.1;
/// Amber charges are premultiplied by this factor
pub const AMBER_CHARGE_SCALE: f64 = 18.2223;
/// Amber restart velocities are in Angstrom per 1/20.455 ps
pub const AMBER_VELOCITY_SCALE: f64 = 20.455;

/// Read an Amber ASCII coordinate/restart file (`inpcrd`, `rst7`).
pub fn load_coordinates(path: &Path) -> Result<Coordinates> {
    let lines = read_lines(path)?;
    let coordinates = inpcrd::parse(path, &lines)?;
    log::info!("Loaded {} positions from {}", coordinates.atom_count(), path.display());
    Ok(coordinates)
}

/// Read an Amber parameter/topology file (`prmtop`).
/// `box_override` replaces any periodic box stored in the file.
pub fn load_topology(path: &Path, box_override: Option<BoxVectors>) -> Result<Topology> {
    let lines = read_lines(path)?;
    let mut topology = prmtop::parse(path, &lines)?;
    if let Some(box_vectors) = box_override {
        topology.box_vectors = Some(box_vectors);
    }
    log::info!("Loaded topology with {} atoms, {} residues and {} bonds from {}",
               topology.atom_count(), topology.residues.len(), topology.bonds.len(),
               path.display());
    Ok(topology)
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound { path: path.to_path_buf() },
        _ => Error::from(e),
    })?;
    let mut lines = vec![];
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::file_format(path, index + 1, e.to_string()))?;
        lines.push(line);
    }
    Ok(lines)
}

/// Split a fixed-width Fortran record into fields. Trailing partial fields are kept.
fn fixed_width_fields(line: &str, width: usize) -> impl Iterator<Item = &str> {
    let width = width.max(1);
    let bytes = line.as_bytes();
    (0..bytes.len())
        .step_by(width)
        .map(move |start| line.get(start..(start + width).min(bytes.len())).unwrap_or(""))
}

fn parse_real(path: &Path, line: usize, field: &str) -> Result<f64> {
    let field = field.trim();
    field
        .replace(['D', 'd'], "E")
        .parse::<f64>()
        .map_err(|_| Error::file_format(path, line, format!("'{}' is not a real number", field)))
}
