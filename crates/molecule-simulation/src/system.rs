//! CPU particle system
//!
//! One `tick()` advances every molecule once, in index order:
//! 1. integrate position (`position += velocity`)
//! 2. reflect velocity at the walls (positions are never clamped)
//! 3. subtract the pair force of every neighbor inside the cutoff
//!
//! Forces are applied to the molecule being updated only. There is no
//! equal-and-opposite kick, so momentum is not conserved.

use glam::DVec2;
use molecule_physics::{ForceLaw, Molecule};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::config::{NeighborRead, SimulationConfig};
use crate::error::{Result, SimulationError};

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: SimulationConfig,
    force_law: ForceLaw,
    molecules: Vec<Molecule>,
    ticks: u64,
    diverged: bool,
}

impl ParticleSystem {
    /// Spawn `config.num_molecules` molecules from the configured seed, or
    /// from a fresh random seed when none is set.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut spawn_rng: StdRng = match config.seed {
            Some(seed) => SeedableRng::seed_from_u64(seed),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        Self::with_rng(config, &mut spawn_rng)
    }

    /// Spawn molecules from an injected random source.
    ///
    /// Per molecule, in order: x in [r, w - r), y in [r, h - r), then both
    /// velocity components in [-max_speed, max_speed).
    pub fn with_rng<R: Rng>(config: SimulationConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let r = config.molecule_radius;
        let extent = config.extent();
        let max_speed = config.max_speed;

        let molecules = (0..config.num_molecules)
            .map(|_| {
                let x = rng.random_range(r..extent.x - r);
                let y = rng.random_range(r..extent.y - r);
                let vx = rng.random_range(-max_speed..max_speed);
                let vy = rng.random_range(-max_speed..max_speed);
                Molecule::new(DVec2::new(x, y), DVec2::new(vx, vy), r)
            })
            .collect::<Vec<_>>();

        log::info!(
            "Spawned {} molecules on a {}x{} canvas",
            molecules.len(),
            config.width,
            config.height
        );

        Ok(Self::assemble(config, molecules))
    }

    /// Build a system from explicitly placed molecules.
    ///
    /// The molecule count comes from `molecules`; `config.num_molecules` is
    /// overwritten to match. Every molecule must carry `config.molecule_radius`,
    /// since that one radius sets both the walls and the interaction cutoff.
    pub fn from_molecules(mut config: SimulationConfig, molecules: Vec<Molecule>) -> Result<Self> {
        if molecules.is_empty() {
            return Err(SimulationError::EmptySystem);
        }
        config.num_molecules = molecules.len();
        config.validate()?;

        if let Some((i, m)) = molecules
            .iter()
            .enumerate()
            .find(|(_, m)| m.radius() != config.molecule_radius)
        {
            return Err(SimulationError::InvalidConfig(format!(
                "molecule {} has radius {}, expected molecule_radius {}",
                i,
                m.radius(),
                config.molecule_radius
            )));
        }

        log::debug!("Placed {} molecules by hand", molecules.len());

        Ok(Self::assemble(config, molecules))
    }

    fn assemble(config: SimulationConfig, molecules: Vec<Molecule>) -> Self {
        Self {
            force_law: config.force_law(),
            config,
            molecules,
            ticks: 0,
            diverged: false,
        }
    }

    /// Advance every molecule by one step.
    pub fn tick(&mut self) {
        let extent = self.config.extent();

        // Only filled in snapshot mode; sequential mode reads the live vector.
        let pre_tick: Vec<DVec2> = match self.config.neighbor_read {
            NeighborRead::Snapshot => self.molecules.iter().map(|m| m.position).collect(),
            NeighborRead::Sequential => Vec::new(),
        };

        for i in 0..self.molecules.len() {
            let molecule = &mut self.molecules[i];
            molecule.integrate();
            molecule.reflect_walls(extent);

            let position = molecule.position;
            let mut velocity = molecule.velocity;

            for (j, other) in self.molecules.iter().enumerate() {
                if j == i {
                    continue;
                }
                let neighbor = match self.config.neighbor_read {
                    NeighborRead::Sequential => other.position,
                    NeighborRead::Snapshot => pre_tick[j],
                };

                // Subtracted one pair at a time, in index order
                if let Some(delta) = self.force_law.velocity_delta(position, neighbor) {
                    velocity -= delta;
                }
            }

            self.molecules[i].velocity = velocity;
        }

        self.ticks += 1;

        if !self.diverged && !self.is_finite() {
            self.diverged = true;
            log::warn!(
                "Molecule state became non-finite at tick {} (coincident centers?)",
                self.ticks
            );
        }
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// True while every position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.molecules
            .iter()
            .all(|m| m.position.is_finite() && m.velocity.is_finite())
    }

    /// Total kinetic energy with unit masses
    pub fn kinetic_energy(&self) -> f64 {
        self.molecules.iter().map(Molecule::kinetic_energy).sum()
    }
}
