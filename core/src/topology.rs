use crate::element::Element;
use na::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

const WATER_RESIDUES: [&str; 3] = ["HOH", "WAT", "TIP3"];

/// Periodic box given by three vectors in nm
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxVectors {
    pub a: Vector3<f64>,
    pub b: Vector3<f64>,
    pub c: Vector3<f64>,
}

impl BoxVectors {
    /// Rectangular box with edges along the axes.
    pub fn orthorhombic(x: f64, y: f64, z: f64) -> Self {
        Self {
            a: Vector3::new(x, 0.0, 0.0),
            b: Vector3::new(0.0, y, 0.0),
            c: Vector3::new(0.0, 0.0, z),
        }
    }

    /// Build reduced triclinic vectors from edge lengths (nm) and angles (degrees).
    ///
    /// # Examples
    ///
    /// ```
    /// # use mdrive_core::BoxVectors;
    /// let cell = BoxVectors::from_lengths_and_angles(3.0, 4.0, 5.0, 90.0, 90.0, 90.0);
    /// assert_eq!(cell, BoxVectors::orthorhombic(3.0, 4.0, 5.0));
    /// ```
    pub fn from_lengths_and_angles(a: f64, b: f64, c: f64,
                                   alpha: f64, beta: f64, gamma: f64) -> Self {
        let (alpha, beta, gamma) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
        let a_vec = Vector3::new(a, 0.0, 0.0);
        let b_vec = Vector3::new(b * gamma.cos(), b * gamma.sin(), 0.0);
        let cx = beta.cos();
        let cy = (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
        let cz = (1.0 - cx * cx - cy * cy).max(0.0).sqrt();
        let c_vec = Vector3::new(c * cx, c * cy, c * cz);
        let clean = |v: Vector3<f64>| v.map(|x| if x.abs() < 1e-6 { 0.0 } else { x });
        Self {
            a: clean(a_vec),
            b: clean(b_vec),
            c: clean(c_vec),
        }
    }

    /// Edge lengths of the box
    pub fn lengths(&self) -> (f64, f64, f64) {
        (self.a.magnitude(), self.b.magnitude(), self.c.magnitude())
    }

    /// Angles alpha (b, c), beta (a, c) and gamma (a, b) in degrees
    pub fn angles(&self) -> (f64, f64, f64) {
        let angle = |u: &Vector3<f64>, v: &Vector3<f64>| u.angle(v).to_degrees();
        (angle(&self.b, &self.c), angle(&self.a, &self.c), angle(&self.a, &self.b))
    }

    /// Smallest perpendicular width of a reduced box. A cutoff must not exceed half of it.
    pub fn min_width(&self) -> f64 {
        self.a.x.min(self.b.y).min(self.c.z)
    }
}

#[derive(Clone, Debug)]
pub struct Atom {
    /// Atom name as written in the topology file
    pub name: String,
    /// Element, `None` for massless extra points
    pub element: Option<&'static Element>,
    /// Index of residue in [Topology::residues]
    pub residue: usize,
    /// Mass in dalton
    pub mass: f64,
    /// Partial charge in elementary charges
    pub charge: f64,
}

impl Atom {
    pub fn is_hydrogen(&self) -> bool {
        self.element.map_or(false, |element| element.is_hydrogen())
    }

    pub fn is_oxygen(&self) -> bool {
        self.element.map_or(false, |element| element.atomic_number == 8)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Residue {
    pub name: String,
    /// Index of the first atom of residue
    pub first_atom: usize,
}

impl Residue {
    pub fn is_water(&self) -> bool {
        WATER_RESIDUES.contains(&self.name.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2 }
        } else {
            Self { i: idx2, j: idx1 }
        }
    }
}

/// Angle `i - j - k` with `j` as the vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Angle {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// Loaded molecular topology. Never changes after loading.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    pub atoms: Vec<Atom>,
    pub residues: Vec<Residue>,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub box_vectors: Option<BoxVectors>,
}

impl Topology {
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.box_vectors.is_some()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.atoms.iter().map(|atom| atom.mass).collect()
    }

    /// Bonds with at least one hydrogen end
    pub fn hydrogen_bonds(&self) -> impl Iterator<Item = &Bond> {
        self.bonds
            .iter()
            .filter(|bond| self.atoms[bond.i].is_hydrogen() || self.atoms[bond.j].is_hydrogen())
    }

    /// Angles rigid under the `HAngles` policy: H-X-H, or H-O-X.
    pub fn hydrogen_angles(&self) -> impl Iterator<Item = &Angle> {
        self.angles.iter().filter(|angle| {
            let ends = [self.atoms[angle.i].is_hydrogen(), self.atoms[angle.k].is_hydrogen()];
            let hydrogens = ends.iter().filter(|h| **h).count();
            hydrogens == 2 || (hydrogens == 1 && self.atoms[angle.j].is_oxygen())
        })
    }

    /// Atoms of residue `index`, up to the first atom of the next residue
    pub fn residue_atoms(&self, index: usize) -> Range<usize> {
        let start = self.residues[index].first_atom.min(self.atom_count());
        let end = self
            .residues
            .get(index + 1)
            .map_or(self.atom_count(), |next| next.first_atom.min(self.atom_count()));
        start..end.max(start)
    }

    /// Water molecules an engine can hold rigid: water residues whose massive
    /// atoms are one oxygen and two hydrogens. Massless extra points are ignored.
    pub fn rigid_waters(&self) -> Vec<Range<usize>> {
        (0..self.residues.len())
            .filter(|&index| self.residues[index].is_water())
            .map(|index| self.residue_atoms(index))
            .filter(|atoms| {
                let massive: Vec<&Atom> = self.atoms[atoms.clone()]
                    .iter()
                    .filter(|atom| atom.mass > 0.0)
                    .collect();
                massive.len() == 3
                    && massive.iter().filter(|atom| atom.is_oxygen()).count() == 1
                    && massive.iter().filter(|atom| atom.is_hydrogen()).count() == 2
            })
            .collect()
    }

    pub fn total_charge(&self) -> f64 {
        self.atoms.iter().map(|atom| atom.charge).sum()
    }
}
