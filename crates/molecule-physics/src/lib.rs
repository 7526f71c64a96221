//! # Molecule Physics
//!
//! Core math for the molecule animation: the particle entity, default
//! constants, and the simplified Van der Waals style pair force.

pub mod constants;
pub mod forces;
pub mod molecule;

pub use constants::*;
pub use forces::*;
pub use molecule::*;
