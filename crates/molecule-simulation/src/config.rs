//! Simulation configuration, fixed for the lifetime of a run

use glam::DVec2;
use molecule_physics::{
    ForceLaw, ATTRACTION, CANVAS_HEIGHT, CANVAS_WIDTH, CUTOFF_FACTOR, MAX_SPEED, MOLECULE_RADIUS,
    NUM_MOLECULES, REPULSION,
};

use crate::error::{Result, SimulationError};

/// Which neighbor positions a molecule sees while its forces are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborRead {
    /// Molecules are advanced one at a time in index order and each one reads
    /// the live collection: neighbors with a lower index have already moved
    /// this tick, neighbors with a higher index have not.
    #[default]
    Sequential,
    /// Every molecule reads its neighbors' positions from before the tick.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    pub num_molecules: usize,
    pub molecule_radius: f64,
    /// Bound on initial velocity components
    pub max_speed: f64,
    /// A in f = A/d² - B/d³
    pub attraction: f64,
    /// B in f = A/d² - B/d³
    pub repulsion: f64,
    pub neighbor_read: NeighborRead,
    /// Seed for the spawn RNG; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,              // 800
            height: CANVAS_HEIGHT,            // 600
            num_molecules: NUM_MOLECULES,     // 30
            molecule_radius: MOLECULE_RADIUS, // 10
            max_speed: MAX_SPEED,             // 2
            attraction: ATTRACTION,           // 0.5
            repulsion: REPULSION,             // 0.1
            neighbor_read: NeighborRead::Sequential,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_num_molecules(mut self, num_molecules: usize) -> Self {
        self.num_molecules = num_molecules;
        self
    }

    pub fn with_molecule_radius(mut self, molecule_radius: f64) -> Self {
        self.molecule_radius = molecule_radius;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_coefficients(mut self, attraction: f64, repulsion: f64) -> Self {
        self.attraction = attraction;
        self.repulsion = repulsion;
        self
    }

    pub fn with_neighbor_read(mut self, neighbor_read: NeighborRead) -> Self {
        self.neighbor_read = neighbor_read;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Center-to-center distance below which molecules interact
    pub fn interaction_cutoff(&self) -> f64 {
        self.molecule_radius * CUTOFF_FACTOR
    }

    /// Canvas size as a vector
    pub fn extent(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64)
    }

    pub fn force_law(&self) -> ForceLaw {
        ForceLaw::new(self.attraction, self.repulsion, self.interaction_cutoff())
    }

    /// Check every field before a system is built from this config.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.num_molecules == 0 {
            return Err(SimulationError::EmptySystem);
        }
        if !self.molecule_radius.is_finite() || self.molecule_radius <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "molecule_radius must be finite and > 0".into(),
            ));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "max_speed must be finite and > 0".into(),
            ));
        }
        if !self.attraction.is_finite() || !self.repulsion.is_finite() {
            return Err(SimulationError::InvalidConfig(
                "force coefficients must be finite".into(),
            ));
        }
        let diameter = 2.0 * self.molecule_radius;
        if (self.width as f64) <= diameter || (self.height as f64) <= diameter {
            return Err(SimulationError::InvalidConfig(format!(
                "canvas {}x{} leaves no room for molecules of radius {}",
                self.width, self.height, self.molecule_radius
            )));
        }
        Ok(())
    }
}
