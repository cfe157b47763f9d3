//! # Accretion Simulation Engine
//!
//! CPU simulation of a protostellar accretion disk: particles orbit a fixed
//! central mass and merge when they pass within the collision distance.

pub mod collisions;
pub mod distribution;
pub mod error;
pub mod params;
pub mod simulation;
pub mod tracker;

pub use collisions::{BroadPhase, MergeEvent};
pub use error::SimulationError;
pub use params::*;
pub use simulation::*;
pub use tracker::ActiveSet;
