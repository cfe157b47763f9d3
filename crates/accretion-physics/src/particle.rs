//! Particle rows and the fixed-capacity particle store

use glam::DVec3;

use crate::constants::{DISK_SIZE, PROTOSTAR_SIZE, SENTINEL_COORD, SIZE_SCALE};
use crate::forces;

/// Where merged-away particles are parked, far outside the interaction volume
pub const SENTINEL_POSITION: DVec3 = DVec3::splat(SENTINEL_COORD);

/// Display radius for a particle that represents `merge_count` unit masses
/// size = 5 * log2(count + 1), capped at `size_cap`
pub fn display_size(merge_count: u32, size_cap: f64) -> f64 {
    (SIZE_SCALE * (f64::from(merge_count) + 1.0).log2()).min(size_cap)
}

/// A single particle, used to seed a [`ParticleStore`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Number of original unit masses this particle represents
    pub merge_count: u32,
    /// Size for rendering
    pub size: f64,
}

impl Particle {
    /// Create a protostar particle collapsed at the origin
    pub fn new_protostar() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            merge_count: 1,
            size: PROTOSTAR_SIZE,
        }
    }

    /// Create a disk particle
    pub fn new_disk(position: DVec3, velocity: DVec3) -> Self {
        Self {
            position,
            velocity,
            merge_count: 1,
            size: DISK_SIZE,
        }
    }
}

/// Structure-of-arrays store for every particle slot.
///
/// The slot count is fixed at construction. Merged-away slots keep their index,
/// lose their mass units to the survivor and are flagged dead.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    merge_counts: Vec<u32>,
    sizes: Vec<f64>,
    alive: Vec<bool>,
}

impl ParticleStore {
    pub fn from_particles(particles: &[Particle]) -> Self {
        Self {
            positions: particles.iter().map(|p| p.position).collect(),
            velocities: particles.iter().map(|p| p.velocity).collect(),
            merge_counts: particles.iter().map(|p| p.merge_count).collect(),
            sizes: particles.iter().map(|p| p.size).collect(),
            alive: vec![true; particles.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn particle(&self, index: usize) -> Particle {
        Particle {
            position: self.positions[index],
            velocity: self.velocities[index],
            merge_count: self.merge_counts[index],
            size: self.sizes[index],
        }
    }

    pub fn position(&self, index: usize) -> DVec3 {
        self.positions[index]
    }

    pub fn velocity(&self, index: usize) -> DVec3 {
        self.velocities[index]
    }

    pub fn merge_count(&self, index: usize) -> u32 {
        self.merge_counts[index]
    }

    pub fn size(&self, index: usize) -> f64 {
        self.sizes[index]
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.alive[index]
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice of length `3 * len()`
    pub fn positions_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    pub fn merge_counts(&self) -> &[u32] {
        &self.merge_counts
    }

    /// Total unit masses across every slot
    pub fn total_mass_units(&self) -> u64 {
        self.merge_counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Merge slot `absorbed` into slot `survivor`.
    ///
    /// Position and velocity become the average of the survivor's current state
    /// and the absorbed particle. Mass units move to the survivor and the
    /// absorbed slot is flagged dead.
    pub fn absorb(&mut self, survivor: usize, absorbed: usize) {
        debug_assert_ne!(survivor, absorbed);

        self.positions[survivor] = (self.positions[survivor] + self.positions[absorbed]) * 0.5;
        self.velocities[survivor] =
            (self.velocities[survivor] + self.velocities[absorbed]) * 0.5;

        self.merge_counts[survivor] += self.merge_counts[absorbed];
        self.merge_counts[absorbed] = 0;
        self.alive[absorbed] = false;
    }

    /// Apply central gravity and advance slot `index` by one step
    pub fn integrate(&mut self, index: usize, g: f64, central_mass: f64, dt: f64) {
        forces::integrate(
            &mut self.positions[index],
            &mut self.velocities[index],
            g,
            central_mass,
            dt,
        );
    }

    /// Recompute the display size of slot `index` from its merge count
    pub fn refresh_size(&mut self, index: usize, size_cap: f64) {
        self.sizes[index] = display_size(self.merge_counts[index], size_cap);
    }

    /// Move every dead slot to the sentinel position with zero size.
    ///
    /// Runs every step, so parking is idempotent.
    pub fn park_dead(&mut self) {
        for index in 0..self.len() {
            if !self.alive[index] {
                self.positions[index] = SENTINEL_POSITION;
                self.sizes[index] = 0.0;
            }
        }
    }

    /// Number of live slots in `range_start..len()`
    pub fn count_alive_from(&self, range_start: usize) -> usize {
        self.alive
            .iter()
            .skip(range_start)
            .filter(|&&alive| alive)
            .count()
    }
}
