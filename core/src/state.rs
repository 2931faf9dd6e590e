use crate::topology::BoxVectors;
use na::Vector3;

/// Snapshot of a running simulation. Owned by the driver, reporters only borrow it.
#[derive(Clone, Debug, Default)]
pub struct SimulationState {
    /// Number of completed integration steps
    pub step: u64,
    /// Simulated time in ps
    pub time: f64,
    /// Positions of atoms in nm
    pub positions: Vec<Vector3<f64>>,
    /// Velocities of atoms in nm/ps
    pub velocities: Vec<Vector3<f64>>,
    /// Potential energy in kJ/mol
    pub potential_energy: f64,
    /// Kinetic energy in kJ/mol
    pub kinetic_energy: f64,
    /// Temperature in Kelvin derived from kinetic energy
    pub temperature: f64,
    pub box_vectors: Option<BoxVectors>,
}

impl SimulationState {
    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }
}
