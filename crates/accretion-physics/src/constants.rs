//! Physical constants for the accretion simulation
//!
//! These are simulation units scaled for real-time visualization rather than
//! SI values. They are the defaults used by `SimulationParams`.

/// Gravitational constant (simulation units, strong enough to be visible)
pub const G: f64 = 10.0;

/// Mass of the central protostar
pub const CENTRAL_MASS: f64 = 8000.0;

/// Fixed integration time step
pub const TIME_STEP: f64 = 0.1;

/// Particles closer than this merge
pub const COLLISION_DISTANCE: f64 = 7.0;

/// Radius of the initial particle cloud
pub const MAX_RADIUS: f64 = 200.0;

/// Default number of particle slots
pub const PARTICLE_COUNT: usize = 9000;

/// Fraction of particles already collapsed into the protostar at startup
pub const PROTOSTAR_FRACTION: f64 = 0.05;

/// Out-of-view coordinate used to park merged-away particles
pub const SENTINEL_COORD: f64 = 10_000.0;

/// Vertical velocity jitter relative to orbital speed (disk thickness)
pub const DISK_THICKNESS: f64 = 1.0e-4;

// Particle sizes for visualization
/// Initial size of protostar particles
pub const PROTOSTAR_SIZE: f64 = 3.0;

/// Initial size of disk particles
pub const DISK_SIZE: f64 = 0.5;

/// Multiplier on log2 of merge count
pub const SIZE_SCALE: f64 = 5.0;

/// Upper bound on display size
pub const SIZE_CAP: f64 = 2000.0;
