//! # Accretion Physics
//!
//! Core data and formulas for a protostellar accretion disk: the particle
//! store, central-body gravity and the display size of merged bodies.

pub mod constants;
pub mod forces;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use particle::*;
