mod coordinates;
mod element;
mod error;
pub mod io;
mod options;
mod state;
mod topology;
extern crate nalgebra as na;
extern crate serde;

pub use coordinates::Coordinates;
pub use element::Element;
pub use error::{Error, Result, Stage};
pub use options::{ConstraintPolicy, ElectrostaticsMethod, SimulationOptions};
pub use state::SimulationState;
pub use topology::{Angle, Atom, Bond, BoxVectors, Residue, Topology};

/// Molar gas constant in kJ/(mol*K)
pub const MOLAR_GAS_CONSTANT: f64 = 0.00831446261815324;
