//! Merge candidate search
//!
//! Two strategies are provided:
//! - `BruteForce`: every later index, O(N²) per step
//! - `UniformGrid`: hash grid with cell size equal to the collision distance
//!
//! Both hand back candidates in ascending index order and are queried with
//! positions from the start of the step, so they produce identical merges.

use std::collections::HashMap;

use accretion_physics::ParticleStore;
use glam::{DVec3, I64Vec3};
use serde::{Deserialize, Serialize};

/// Strategy used to find merge candidates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhase {
    #[default]
    BruteForce,
    UniformGrid,
}

/// A merge applied during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeEvent {
    /// Lower index, keeps existing
    pub survivor: usize,
    /// Higher index, flagged dead
    pub absorbed: usize,
    /// Survivor position right after the merge, before integration
    pub position: DVec3,
    /// Survivor mass units after the merge
    pub merge_count: u32,
}

/// Whether two particles are close enough to merge
pub fn within_collision_distance(a: DVec3, b: DVec3, collision_distance: f64) -> bool {
    a.distance(b) < collision_distance
}

/// Uniform hash grid over live particles
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<I64Vec3, Vec<usize>>,
}

impl SpatialGrid {
    /// Bucket every live slot in `first..store.len()`.
    ///
    /// Indices are inserted in ascending order, so each cell stays sorted.
    pub fn build(store: &ParticleStore, first: usize, cell_size: f64) -> Self {
        let mut cells: HashMap<I64Vec3, Vec<usize>> = HashMap::new();
        for index in first..store.len() {
            if !store.is_alive(index) {
                continue;
            }
            let position = store.position(index);
            if !position.is_finite() {
                continue;
            }
            cells
                .entry(Self::cell_of(position, cell_size))
                .or_default()
                .push(index);
        }
        Self { cell_size, cells }
    }

    // Quotients outside the i64 range saturate to the edge cells
    fn cell_of(position: DVec3, cell_size: f64) -> I64Vec3 {
        (position / cell_size).floor().as_i64vec3()
    }

    /// Indices greater than `index` in the 27 cells around `position`, ascending
    pub fn neighbors_after(&self, index: usize, position: DVec3, out: &mut Vec<usize>) {
        out.clear();
        if !position.is_finite() {
            return;
        }

        let center = Self::cell_of(position, self.cell_size);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let cell = I64Vec3::new(
                        center.x.saturating_add(dx),
                        center.y.saturating_add(dy),
                        center.z.saturating_add(dz),
                    );
                    if let Some(members) = self.cells.get(&cell) {
                        out.extend(members.iter().copied().filter(|&j| j > index));
                    }
                }
            }
        }
        out.sort_unstable();
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Per-step candidate index built from one of the [`BroadPhase`] strategies
#[derive(Debug)]
pub enum CandidateIndex {
    All { len: usize },
    Grid(SpatialGrid),
}

impl CandidateIndex {
    pub fn build(
        strategy: BroadPhase,
        store: &ParticleStore,
        first: usize,
        collision_distance: f64,
    ) -> Self {
        match strategy {
            BroadPhase::UniformGrid if collision_distance > 0.0 => {
                CandidateIndex::Grid(SpatialGrid::build(store, first, collision_distance))
            }
            _ => CandidateIndex::All { len: store.len() },
        }
    }

    /// Fill `out` with candidate partners of `index`, ascending, all greater than `index`
    pub fn candidates(&self, index: usize, position: DVec3, out: &mut Vec<usize>) {
        match self {
            CandidateIndex::All { len } => {
                out.clear();
                out.extend(index + 1..*len);
            }
            CandidateIndex::Grid(grid) => grid.neighbors_after(index, position, out),
        }
    }
}
