//! Pairwise force law
//!
//! f(d) = A/d² - B/d³, evaluated only inside the interaction cutoff.
//! Coincident centers (d == 0) are not guarded: the result is non-finite.

use glam::DVec2;

use crate::constants::{ATTRACTION, CUTOFF_FACTOR, MOLECULE_RADIUS, REPULSION};

/// Scalar force magnitude at distance `distance`
pub fn van_der_waals_force(distance: f64, attraction: f64, repulsion: f64) -> f64 {
    attraction / (distance * distance) - repulsion / (distance * distance * distance)
}

/// Force law parameters shared by every pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    pub attraction: f64,
    pub repulsion: f64,
    /// Interactions happen strictly below this distance
    pub cutoff: f64,
}

impl Default for ForceLaw {
    fn default() -> Self {
        Self {
            attraction: ATTRACTION,
            repulsion: REPULSION,
            cutoff: MOLECULE_RADIUS * CUTOFF_FACTOR,
        }
    }
}

impl ForceLaw {
    pub fn new(attraction: f64, repulsion: f64, cutoff: f64) -> Self {
        Self {
            attraction,
            repulsion,
            cutoff,
        }
    }

    /// Scalar force at `distance`
    pub fn magnitude(&self, distance: f64) -> f64 {
        van_der_waals_force(distance, self.attraction, self.repulsion)
    }

    /// Velocity delta for the molecule at `from` caused by the one at `to`.
    ///
    /// The returned vector is `f * (to - from) / d` and is meant to be
    /// *subtracted* from the velocity of the molecule at `from`. Returns
    /// `None` at or beyond the cutoff.
    pub fn velocity_delta(&self, from: DVec2, to: DVec2) -> Option<DVec2> {
        let delta = to - from;
        let distance = delta.length();

        if distance >= self.cutoff {
            return None;
        }

        let force = self.magnitude(distance);
        Some(force * (delta / distance))
    }
}
