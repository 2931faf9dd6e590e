use super::{fixed_width_fields, parse_real, AMBER_CHARGE_SCALE, ANGSTROM_TO_NM};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::{Angle, Atom, Bond, BoxVectors, Residue, Topology};
use itertools::Itertools;
use std::collections::HashMap;
use std::path::Path;

const NATOM: usize = 0;
const NRES: usize = 11;
const IFBOX: usize = 27;

#[derive(Clone, Copy, Debug, PartialEq)]
enum FieldKind {
    Text,
    Integer,
    Real,
}

/// One `%FLAG` block with the values it holds and the lines they came from
struct Section {
    line: usize,
    kind: FieldKind,
    values: Vec<(usize, String)>,
}

struct PrmtopFile<'a> {
    path: &'a Path,
    sections: HashMap<String, Section>,
}

/// Parse a Fortran edit descriptor like `(20a4)`, `(10I8)` or `(5E16.8)`.
fn parse_format(spec: &str) -> Option<(FieldKind, usize)> {
    let spec = spec.trim().trim_start_matches('(').trim_end_matches(')');
    let body = spec.trim_start_matches(|c: char| c.is_ascii_digit());
    let mut chars = body.chars();
    let kind = match chars.next()?.to_ascii_uppercase() {
        'A' => FieldKind::Text,
        'I' => FieldKind::Integer,
        'E' | 'F' | 'D' => FieldKind::Real,
        _ => return None,
    };
    let width: String = chars.take_while(|c| c.is_ascii_digit()).collect();
    let width = width.parse().ok()?;
    if width == 0 {
        return None;
    }
    Some((kind, width))
}

impl<'a> PrmtopFile<'a> {
    fn read(path: &'a Path, lines: &[String]) -> Result<Self> {
        let mut sections: HashMap<String, Section> = HashMap::new();
        let mut current: Option<String> = None;
        let mut width = 0;
        for (index, text) in lines.iter().enumerate() {
            let line = index + 1;
            if let Some(flag) = text.strip_prefix("%FLAG") {
                let name = flag.trim().to_string();
                if name.is_empty() {
                    return Err(Error::file_format(path, line, "%FLAG without a section name"));
                }
                sections.insert(name.clone(), Section { line, kind: FieldKind::Text, values: vec![] });
                current = Some(name);
                width = 0;
            } else if let Some(spec) = text.strip_prefix("%FORMAT") {
                let name = current.as_ref().ok_or_else(|| {
                    Error::file_format(path, line, "%FORMAT outside of a %FLAG section")
                })?;
                let (kind, field_width) = parse_format(spec).ok_or_else(|| {
                    Error::file_format(path, line, format!("unsupported format '{}'", spec.trim()))
                })?;
                if let Some(section) = sections.get_mut(name) {
                    section.kind = kind;
                }
                width = field_width;
            } else if text.starts_with('%') {
                // %VERSION, %COMMENT
                continue;
            } else if let Some(name) = &current {
                if width == 0 {
                    return Err(Error::file_format(path, line,
                        format!("section {} has data before its %FORMAT", name)));
                }
                if let Some(section) = sections.get_mut(name) {
                    for field in fixed_width_fields(text, width) {
                        let value = field.trim();
                        if value.is_empty() {
                            continue;
                        }
                        section.values.push((line, value.to_string()));
                    }
                }
            }
        }
        if sections.is_empty() {
            return Err(Error::file_format(path, 1, "no %FLAG sections, not a prmtop file"));
        }
        log::debug!("Read {} prmtop sections from {}", sections.len(), path.display());
        Ok(Self { path, sections })
    }

    fn section(&self, name: &str) -> Result<&Section> {
        self.sections.get(name).ok_or_else(|| {
            Error::file_format(self.path, 0, format!("missing required section {}", name))
        })
    }

    fn has(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    fn typed_section(&self, name: &str, kind: FieldKind) -> Result<&Section> {
        let section = self.section(name)?;
        if section.kind != kind {
            return Err(Error::file_format(self.path, section.line, format!(
                "section {} is formatted as {:?}, expected {:?}", name, section.kind, kind)));
        }
        Ok(section)
    }

    fn integers(&self, name: &str) -> Result<Vec<i64>> {
        let section = self.typed_section(name, FieldKind::Integer)?;
        section
            .values
            .iter()
            .map(|(line, value)| {
                value.parse::<i64>().map_err(|_| {
                    Error::file_format(self.path, *line,
                        format!("'{}' in {} is not an integer", value, name))
                })
            })
            .collect()
    }

    fn reals(&self, name: &str) -> Result<Vec<f64>> {
        let section = self.typed_section(name, FieldKind::Real)?;
        section
            .values
            .iter()
            .map(|(line, value)| parse_real(self.path, *line, value))
            .collect()
    }

    fn strings(&self, name: &str) -> Result<Vec<String>> {
        let section = self.typed_section(name, FieldKind::Text)?;
        Ok(section.values.iter().map(|(_, value)| value.clone()).collect())
    }

    fn check_len<T>(&self, name: &str, values: &[T], expected: usize) -> Result<()> {
        if values.len() != expected {
            let line = self.sections.get(name).map_or(0, |section| section.line);
            return Err(Error::file_format(self.path, line, format!(
                "section {} has {} entries, POINTERS declares {}", name, values.len(), expected)));
        }
        Ok(())
    }

    fn atom_index(&self, name: &str, pointer: i64, atom_count: usize) -> Result<usize> {
        // Bonded terms store coordinate array offsets, three per atom
        let index = (pointer.unsigned_abs() / 3) as usize;
        if pointer % 3 != 0 || index >= atom_count {
            let line = self.sections.get(name).map_or(0, |section| section.line);
            return Err(Error::file_format(self.path, line, format!(
                "{} references invalid atom offset {}", name, pointer)));
        }
        Ok(index)
    }
}

pub(super) fn parse(path: &Path, lines: &[String]) -> Result<Topology> {
    let file = PrmtopFile::read(path, lines)?;
    let pointers = file.integers("POINTERS")?;
    if pointers.len() <= NRES {
        let line = file.section("POINTERS")?.line;
        return Err(Error::file_format(path, line, format!(
            "POINTERS holds {} values, at least {} are required", pointers.len(), NRES + 1)));
    }
    let atom_count = pointers[NATOM].max(0) as usize;
    let residue_count = pointers[NRES].max(0) as usize;
    let has_box = pointers.get(IFBOX).map_or(false, |ifbox| *ifbox > 0);

    let names = file.strings("ATOM_NAME")?;
    file.check_len("ATOM_NAME", &names, atom_count)?;
    let charges = file.reals("CHARGE")?;
    file.check_len("CHARGE", &charges, atom_count)?;
    let masses = file.reals("MASS")?;
    file.check_len("MASS", &masses, atom_count)?;
    let atomic_numbers = if file.has("ATOMIC_NUMBER") {
        let numbers = file.integers("ATOMIC_NUMBER")?;
        file.check_len("ATOMIC_NUMBER", &numbers, atom_count)?;
        Some(numbers)
    } else {
        log::warn!("{} has no ATOMIC_NUMBER section, guessing elements from masses", path.display());
        None
    };

    let labels = file.strings("RESIDUE_LABEL")?;
    file.check_len("RESIDUE_LABEL", &labels, residue_count)?;
    let residue_pointers = file.integers("RESIDUE_POINTER")?;
    file.check_len("RESIDUE_POINTER", &residue_pointers, residue_count)?;

    let mut residues = Vec::with_capacity(residue_count);
    let mut residue_of_atom = vec![0usize; atom_count];
    for (index, (label, pointer)) in labels.iter().zip(&residue_pointers).enumerate() {
        let first_atom = (*pointer - 1).max(0) as usize;
        let last_atom = residue_pointers
            .get(index + 1)
            .map_or(atom_count, |next| (*next - 1).max(0) as usize);
        if first_atom > last_atom || last_atom > atom_count {
            let line = file.section("RESIDUE_POINTER")?.line;
            return Err(Error::file_format(path, line, format!(
                "residue {} spans invalid atoms {}..{}", index + 1, first_atom + 1, last_atom)));
        }
        for residue in &mut residue_of_atom[first_atom..last_atom] {
            *residue = index;
        }
        residues.push(Residue {
            name: label.clone(),
            first_atom,
        });
    }

    let mut atoms = Vec::with_capacity(atom_count);
    for index in 0..atom_count {
        let mass = masses[index];
        let element = match &atomic_numbers {
            Some(numbers) if numbers[index] > 0 => u8::try_from(numbers[index])
                .ok()
                .and_then(Element::by_atomic_number)
                .or_else(|| Element::guess_from_mass(mass)),
            Some(_) => None,
            None => Element::guess_from_mass(mass),
        };
        atoms.push(Atom {
            name: names[index].clone(),
            element,
            residue: residue_of_atom[index],
            mass,
            charge: charges[index] / AMBER_CHARGE_SCALE,
        });
    }

    let mut bonds = vec![];
    for name in ["BONDS_INC_HYDROGEN", "BONDS_WITHOUT_HYDROGEN"] {
        let values = file.integers(name)?;
        if values.len() % 3 != 0 {
            let line = file.section(name)?.line;
            return Err(Error::file_format(path, line,
                format!("{} length {} is not a multiple of 3", name, values.len())));
        }
        for (i, j, _) in values.into_iter().tuples() {
            bonds.push(Bond::new(file.atom_index(name, i, atom_count)?,
                                 file.atom_index(name, j, atom_count)?));
        }
    }

    let mut angles = vec![];
    for name in ["ANGLES_INC_HYDROGEN", "ANGLES_WITHOUT_HYDROGEN"] {
        if !file.has(name) {
            continue;
        }
        let values = file.integers(name)?;
        if values.len() % 4 != 0 {
            let line = file.section(name)?.line;
            return Err(Error::file_format(path, line,
                format!("{} length {} is not a multiple of 4", name, values.len())));
        }
        for (i, j, k, _) in values.into_iter().tuples() {
            angles.push(Angle {
                i: file.atom_index(name, i, atom_count)?,
                j: file.atom_index(name, j, atom_count)?,
                k: file.atom_index(name, k, atom_count)?,
            });
        }
    }

    let box_vectors = if has_box && file.has("BOX_DIMENSIONS") {
        let dimensions = file.reals("BOX_DIMENSIONS")?;
        file.check_len("BOX_DIMENSIONS", &dimensions, 4)?;
        let beta = dimensions[0];
        let (x, y, z) = (dimensions[1] * ANGSTROM_TO_NM,
                         dimensions[2] * ANGSTROM_TO_NM,
                         dimensions[3] * ANGSTROM_TO_NM);
        Some(BoxVectors::from_lengths_and_angles(x, y, z, beta, beta, beta))
    } else {
        None
    };

    Ok(Topology {
        atoms,
        residues,
        bonds,
        angles,
        box_vectors,
    })
}
