//! Active particle count for display

use accretion_physics::ParticleStore;

/// Number of disk particles still live after the latest step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSet {
    initial: usize,
    current: usize,
}

impl ActiveSet {
    pub fn new(store: &ParticleStore, first_disk_index: usize) -> Self {
        let count = store.count_alive_from(first_disk_index);
        Self {
            initial: count,
            current: count,
        }
    }

    /// Recount live disk slots; the count never grows between steps
    pub fn update(&mut self, store: &ParticleStore, first_disk_index: usize) -> usize {
        let count = store.count_alive_from(first_disk_index);
        debug_assert!(count <= self.current, "active set grew from {} to {}", self.current, count);
        if count != self.current {
            log::debug!("Active particles: {} -> {}", self.current, count);
        }
        self.current = count;
        count
    }

    pub fn count(&self) -> usize {
        self.current
    }

    /// Disk particles absorbed since construction
    pub fn absorbed(&self) -> usize {
        self.initial - self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accretion_physics::Particle;
    use glam::DVec3;

    #[test]
    fn test_counts_only_disk_slots() {
        let mut store = ParticleStore::from_particles(&[
            Particle::new_protostar(),
            Particle::new_disk(DVec3::X, DVec3::ZERO),
            Particle::new_disk(DVec3::Y, DVec3::ZERO),
            Particle::new_disk(DVec3::Z, DVec3::ZERO),
        ]);
        let mut active = ActiveSet::new(&store, 1);
        assert_eq!(active.count(), 3);

        store.absorb(1, 3);
        assert_eq!(active.update(&store, 1), 2);
        assert_eq!(active.absorbed(), 1);
    }
}
