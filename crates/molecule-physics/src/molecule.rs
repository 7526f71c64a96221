//! Molecule entity and its per-tick motion rules

use glam::DVec2;

/// A single particle on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Molecule {
    /// Center in canvas pixels
    pub position: DVec2,
    /// Pixels per tick
    pub velocity: DVec2,
    radius: f64,
}

impl Molecule {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Radius, fixed at construction
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Forward Euler step: `position += velocity`
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Flip the velocity component on every axis where the center has left
    /// `[radius, extent - radius]`.
    ///
    /// The position is left where it is, so a molecule can sit past the
    /// wall for a frame before the flipped velocity brings it back.
    pub fn reflect_walls(&mut self, extent: DVec2) {
        if self.position.x < self.radius || self.position.x > extent.x - self.radius {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < self.radius || self.position.y > extent.y - self.radius {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Kinetic energy with unit mass
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.velocity.length_squared()
    }
}
