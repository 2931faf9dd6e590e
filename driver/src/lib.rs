extern crate mdrive_core;
extern crate nalgebra as na;
extern crate rand_distr;
extern crate rayon;
pub mod engine;
pub mod observables;
pub mod reporter;
mod simulation;
pub mod velocity;

pub use simulation::Simulation;
