//! Default constants for the molecule animation
//!
//! Units are arbitrary: lengths are canvas pixels, time is one tick.

/// Number of molecules spawned at startup
pub const NUM_MOLECULES: usize = 30;

/// Radius shared by every molecule
pub const MOLECULE_RADIUS: f64 = 10.0;

/// Bound on each initial velocity component, in pixels per tick.
/// Only used when spawning; there is no runtime speed cap.
pub const MAX_SPEED: f64 = 2.0;

/// Attraction coefficient (A in f = A/d² - B/d³)
pub const ATTRACTION: f64 = 0.5;

/// Repulsion coefficient (B in f = A/d² - B/d³)
pub const REPULSION: f64 = 0.1;

/// Interaction cutoff as a multiple of the molecule radius
pub const CUTOFF_FACTOR: f64 = 4.0;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 800;

/// Canvas height in pixels
pub const CANVAS_HEIGHT: u32 = 600;
