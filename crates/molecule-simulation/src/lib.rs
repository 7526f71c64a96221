//! # Molecule Simulation
//!
//! CPU particle system for the molecule animation, its configuration, and
//! the frame scheduler that alternates ticking and drawing.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod system;

pub use config::*;
pub use error::*;
pub use scheduler::*;
pub use system::*;
