use crate::observables::center_of_mass_velocity;
use mdrive_core::MOLAR_GAS_CONSTANT;
use na::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Draw velocities (nm/ps) from the Maxwell-Boltzmann distribution at `temperature`.
/// Massless particles stay at rest and the center of mass does not drift.
pub fn maxwell_boltzmann(masses: &[f64], temperature: f64, seed: Option<u64>) -> Vec<Vector3<f64>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut velocities: Vec<Vector3<f64>> = masses
        .iter()
        .map(|mass| {
            if *mass <= 0.0 {
                return Vector3::zeros();
            }
            let sigma = f64::sqrt(MOLAR_GAS_CONSTANT * temperature / mass);
            let x: f64 = rng.sample(StandardNormal);
            let y: f64 = rng.sample(StandardNormal);
            let z: f64 = rng.sample(StandardNormal);
            Vector3::new(x, y, z) * sigma
        })
        .collect();
    let drift = center_of_mass_velocity(masses, &velocities);
    velocities
        .iter_mut()
        .zip(masses)
        .filter(|(_, mass)| **mass > 0.0)
        .for_each(|(velocity, _)| *velocity -= drift);
    velocities
}
