use crate::topology::BoxVectors;
use na::Vector3;

/// Positions (nm) loaded from a coordinate file, matched by index to a [crate::Topology].
#[derive(Clone, Debug, Default)]
pub struct Coordinates {
    pub positions: Vec<Vector3<f64>>,
    /// Velocities in nm/ps, present for restart files
    pub velocities: Option<Vec<Vector3<f64>>>,
    /// Box vectors stored with the coordinates. Take precedence over the topology box.
    pub box_vectors: Option<BoxVectors>,
    /// Simulated time of the snapshot in ps
    pub time: Option<f64>,
}

impl Coordinates {
    pub fn new(positions: Vec<Vector3<f64>>) -> Self {
        Self {
            positions,
            ..Default::default()
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }
}
