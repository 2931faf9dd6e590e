use mdrive_core::{Bond, ConstraintPolicy, SimulationOptions, Topology, MOLAR_GAS_CONSTANT};
use na::{Vector3, Vector4};
use rayon::prelude::*;

/// Degrees of freedom removed by the engine's center of mass motion remover
const CENTER_OF_MASS_DOF: i64 = 3;

/// Kinetic energy `sum(m * v^2 / 2)` in kJ/mol for masses in dalton and velocities in nm/ps
pub fn kinetic_energy(masses: &[f64], velocities: &[Vector3<f64>]) -> f64 {
    masses
        .par_iter()
        .zip(velocities.par_iter())
        .map(|(mass, velocity)| mass * velocity.dot(velocity) / 2.0)
        .sum()
}

/// Mass weighted mean velocity. Zero when there are no massive particles.
pub fn center_of_mass_velocity(masses: &[f64], velocities: &[Vector3<f64>]) -> Vector3<f64> {
    let res: Vector4<f64> = masses
        .par_iter()
        .zip(velocities.par_iter())
        .map(|(mass, v)| Vector4::new(v.x, v.y, v.z, 1.0) * *mass)
        .sum();
    if res.w > 0.0 {
        Vector3::new(res.x, res.y, res.z) / res.w
    } else {
        Vector3::zeros()
    }
}

/// Distances per rigid water: two O-H and one H-H
const RIGID_WATER_CONSTRAINTS: usize = 3;

/// Number of rigid distances the engine will impose under `policy`.
///
/// With `rigid_water` every water molecule counts three constraints and its
/// bonds and angles are left out of the policy count.
pub fn constraint_count(topology: &Topology, policy: ConstraintPolicy, rigid_water: bool) -> usize {
    let mut in_water = vec![false; topology.atom_count()];
    let mut waters = 0;
    if rigid_water {
        for atoms in topology.rigid_waters() {
            in_water[atoms].iter_mut().for_each(|flag| *flag = true);
            waters += 1;
        }
    }
    let free = |bond: &&Bond| !in_water[bond.i] && !in_water[bond.j];
    let bonds = topology.bonds.iter().filter(free).count();
    let by_policy = match policy {
        ConstraintPolicy::None => 0,
        ConstraintPolicy::HBonds => topology.hydrogen_bonds().filter(free).count(),
        ConstraintPolicy::AllBonds => bonds,
        ConstraintPolicy::HAngles => {
            bonds + topology
                .hydrogen_angles()
                .filter(|angle| !in_water[angle.i] && !in_water[angle.j] && !in_water[angle.k])
                .count()
        }
    };
    by_policy + RIGID_WATER_CONSTRAINTS * waters
}

/// Degrees of freedom left for temperature: three per massive particle, minus
/// constraints and center of mass motion.
pub fn degrees_of_freedom(topology: &Topology, options: &SimulationOptions) -> usize {
    let massive = topology.atoms.iter().filter(|atom| atom.mass > 0.0).count() as i64;
    let constraints = constraint_count(topology, options.constraint_policy, options.rigid_water) as i64;
    (3 * massive - constraints - CENTER_OF_MASS_DOF).max(0) as usize
}

/// Instantaneous temperature in Kelvin
pub fn temperature(kinetic_energy: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 0.0;
    }
    2.0 * kinetic_energy / (degrees_of_freedom as f64 * MOLAR_GAS_CONSTANT)
}
