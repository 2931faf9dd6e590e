use super::{fixed_width_fields, parse_real, ANGSTROM_TO_NM, AMBER_VELOCITY_SCALE};
use crate::error::{Error, Result};
use crate::{BoxVectors, Coordinates};
use itertools::Itertools;
use na::Vector3;
use std::path::Path;

const FIELD_WIDTH: usize = 12;
const FIELDS_PER_LINE: usize = 6;

pub(super) fn parse(path: &Path, lines: &[String]) -> Result<Coordinates> {
    if lines.len() < 2 {
        return Err(Error::file_format(path, lines.len(), "missing title or atom count line"));
    }
    let mut header = lines[1].split_whitespace();
    let atom_count: usize = header
        .next()
        .and_then(|count| count.parse().ok())
        .ok_or_else(|| Error::file_format(path, 2, "atom count is not an integer"))?;
    let time = match header.next() {
        Some(time) => Some(parse_real(path, 2, time)?),
        None => None,
    };

    let lines_per_block = (atom_count * 3 + FIELDS_PER_LINE - 1) / FIELDS_PER_LINE;
    let body: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .skip(2)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.as_str()))
        .collect();
    if body.len() < lines_per_block {
        return Err(Error::file_format(path, lines.len(), format!(
            "expected {} coordinate lines for {} atoms, found {}",
            lines_per_block, atom_count, body.len())));
    }

    let positions = read_vectors(path, &body[..lines_per_block], atom_count)?
        .into_iter()
        .map(|v| v * ANGSTROM_TO_NM)
        .collect();
    let rest = &body[lines_per_block..];
    let (velocity_lines, box_line) = match rest.len() {
        0 => (None, None),
        n if n == lines_per_block + 1 => (Some(&rest[..lines_per_block]), Some(rest[lines_per_block])),
        1 if atom_count == 1 => (Some(rest), None),
        1 => (None, Some(rest[0])),
        n if n == lines_per_block => (Some(rest), None),
        _ => {
            return Err(Error::file_format(path, rest[0].0, format!(
                "{} trailing lines match neither velocities nor a box record", rest.len())));
        }
    };

    let velocities = match velocity_lines {
        Some(velocity_lines) => Some(
            read_vectors(path, velocity_lines, atom_count)?
                .into_iter()
                .map(|v| v * AMBER_VELOCITY_SCALE * ANGSTROM_TO_NM)
                .collect(),
        ),
        None => None,
    };
    let box_vectors = match box_line {
        Some((line, text)) => Some(read_box(path, line, text)?),
        None => None,
    };

    Ok(Coordinates {
        positions,
        velocities,
        box_vectors,
        time,
    })
}

fn read_vectors(path: &Path, lines: &[(usize, &str)], atom_count: usize) -> Result<Vec<Vector3<f64>>> {
    let mut values = Vec::with_capacity(atom_count * 3);
    for (line, text) in lines {
        for field in fixed_width_fields(text, FIELD_WIDTH) {
            if field.trim().is_empty() {
                continue;
            }
            values.push(parse_real(path, *line, field)?);
        }
    }
    if values.len() != atom_count * 3 {
        let line = lines.last().map_or(0, |(line, _)| *line);
        return Err(Error::file_format(path, line, format!(
            "expected {} values for {} atoms, found {}", atom_count * 3, atom_count, values.len())));
    }
    Ok(values
        .into_iter()
        .tuples()
        .map(|(x, y, z)| Vector3::new(x, y, z))
        .collect())
}

fn read_box(path: &Path, line: usize, text: &str) -> Result<BoxVectors> {
    let values = fixed_width_fields(text, FIELD_WIDTH)
        .filter(|field| !field.trim().is_empty())
        .map(|field| parse_real(path, line, field))
        .collect::<Result<Vec<f64>>>()?;
    if values.len() != 6 {
        return Err(Error::file_format(path, line, format!(
            "box record needs 3 lengths and 3 angles, found {} values", values.len())));
    }
    let (lengths, angles) = values.split_at(3);
    if lengths.iter().any(|length| !(*length > 0.0) || !length.is_finite()) {
        return Err(Error::file_format(path, line, format!(
            "box lengths must be positive, got {:?}", lengths)));
    }
    if angles.iter().any(|angle| !(*angle > 0.0 && *angle < 180.0)) {
        return Err(Error::file_format(path, line, format!(
            "box angles must lie between 0 and 180 degrees, got {:?}", angles)));
    }
    Ok(BoxVectors::from_lengths_and_angles(
        values[0] * ANGSTROM_TO_NM, values[1] * ANGSTROM_TO_NM, values[2] * ANGSTROM_TO_NM,
        values[3], values[4], values[5]))
}
