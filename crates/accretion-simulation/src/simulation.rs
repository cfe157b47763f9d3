//! CPU accretion simulation manager
//!
//! One call to [`Simulation::step`] is one frame: merges are resolved in
//! ascending index order and each surviving particle is integrated right after
//! its own merges, from its post-merge state.

use accretion_physics::ParticleStore;
use glam::DVec3;

use crate::collisions::{within_collision_distance, CandidateIndex, MergeEvent};
use crate::distribution;
use crate::error::SimulationError;
use crate::params::SimulationParams;
use crate::tracker::ActiveSet;

/// Summary of one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Frame number, starting at 1 for the first step
    pub frame: u64,
    pub active_count: usize,
    /// Merges in the order they were applied
    pub merges: Vec<MergeEvent>,
}

/// Accretion disk simulation state, exclusively owned by its caller
pub struct Simulation {
    params: SimulationParams,
    store: ParticleStore,
    protostar_count: usize,
    active: ActiveSet,
    frame: u64,
    // Scratch buffer for candidate indices, reused between particles
    candidates: Vec<usize>,
}

impl Simulation {
    /// Validate `params` and generate the initial particle distribution
    pub fn new(params: SimulationParams) -> Result<Self, SimulationError> {
        params.validate()?;
        log::info!("Initializing Simulation...");
        let store = distribution::generate_store(&params);
        Self::build(params, store)
    }

    /// Start from a hand-built store.
    ///
    /// `params.particle_count` must match the store, and the first
    /// `params.protostar_count()` slots are treated as the protostar.
    pub fn from_store(
        params: SimulationParams,
        store: ParticleStore,
    ) -> Result<Self, SimulationError> {
        params.validate()?;
        if store.len() != params.particle_count {
            return Err(SimulationError::invalid(
                "particle_count",
                format!(
                    "store holds {} particles but particle_count is {}",
                    store.len(),
                    params.particle_count
                ),
            ));
        }
        Self::build(params, store)
    }

    fn build(params: SimulationParams, store: ParticleStore) -> Result<Self, SimulationError> {
        let protostar_count = params.protostar_count();
        let active = ActiveSet::new(&store, protostar_count);

        log::info!(
            "✓ Simulation ready: {} slots, {} active, broad phase {:?}",
            store.len(),
            active.count(),
            params.broad_phase
        );

        Ok(Self {
            params,
            store,
            protostar_count,
            active,
            frame: 0,
            candidates: Vec::new(),
        })
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self) -> StepReport {
        let SimulationParams {
            g,
            central_mass,
            time_step,
            collision_distance,
            size_cap,
            broad_phase,
            ..
        } = self.params;

        // Candidates are tested against positions from the start of the step:
        // slots above `i` are untouched until their own turn.
        let index = CandidateIndex::build(
            broad_phase,
            &self.store,
            self.protostar_count,
            collision_distance,
        );

        let mut merges = Vec::new();
        for i in self.protostar_count..self.store.len() {
            if !self.store.is_alive(i) {
                continue;
            }

            let anchor = self.store.position(i);
            index.candidates(i, anchor, &mut self.candidates);

            for &j in &self.candidates {
                if !self.store.is_alive(j) {
                    continue;
                }
                if within_collision_distance(anchor, self.store.position(j), collision_distance) {
                    self.store.absorb(i, j);
                    let event = MergeEvent {
                        survivor: i,
                        absorbed: j,
                        position: self.store.position(i),
                        merge_count: self.store.merge_count(i),
                    };
                    log::trace!(
                        "merge {} <- {} at {:?}, mass units {}",
                        i,
                        j,
                        event.position,
                        event.merge_count
                    );
                    merges.push(event);
                }
            }

            self.store.integrate(i, g, central_mass, time_step);
            self.store.refresh_size(i, size_cap);
        }

        self.store.park_dead();
        let active_count = self.active.update(&self.store, self.protostar_count);
        self.frame += 1;

        log::debug!(
            "frame {}: {} merges, {} active",
            self.frame,
            merges.len(),
            active_count
        );

        StepReport {
            frame: self.frame,
            active_count,
            merges,
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn protostar_count(&self) -> usize {
        self.protostar_count
    }

    /// Live disk particles after the latest step
    pub fn active_count(&self) -> usize {
        self.active.count()
    }

    /// Disk particles absorbed since the simulation started
    pub fn absorbed_count(&self) -> usize {
        self.active.absorbed()
    }

    /// Steps taken so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Flat positions, length `3 * particle_count()`
    pub fn positions(&self) -> &[f64] {
        self.store.positions_flat()
    }

    /// Display sizes, `0` for hidden slots
    pub fn sizes(&self) -> &[f64] {
        self.store.sizes()
    }

    pub fn total_mass_units(&self) -> u64 {
        self.store.total_mass_units()
    }

    /// Index and mass units of the most massive disk particle
    pub fn largest_body(&self) -> Option<(usize, u32)> {
        (self.protostar_count..self.store.len())
            .filter(|&i| self.store.is_alive(i))
            .map(|i| (i, self.store.merge_count(i)))
            .max_by_key(|&(i, count)| (count, std::cmp::Reverse(i)))
    }

    /// Kinetic energy of live disk particles, one mass unit per merge count
    pub fn kinetic_energy(&self) -> f64 {
        (self.protostar_count..self.store.len())
            .filter(|&i| self.store.is_alive(i))
            .map(|i| {
                let v: DVec3 = self.store.velocity(i);
                0.5 * f64::from(self.store.merge_count(i)) * v.length_squared()
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accretion_physics::{Particle, SENTINEL_POSITION};

    fn params_for(particle_count: usize) -> SimulationParams {
        SimulationParams {
            particle_count,
            protostar_fraction: 0.0,
            ..Default::default()
        }
    }

    fn at_rest(points: &[DVec3]) -> ParticleStore {
        let particles: Vec<Particle> = points
            .iter()
            .map(|&p| Particle::new_disk(p, DVec3::ZERO))
            .collect();
        ParticleStore::from_particles(&particles)
    }

    #[test]
    fn test_from_store_rejects_mismatched_count() {
        let store = at_rest(&[DVec3::ZERO, DVec3::X]);
        assert!(Simulation::from_store(params_for(3), store).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = SimulationParams {
            protostar_fraction: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(params),
            Err(SimulationError::InvalidConfig { field: "protostar_fraction", .. })
        ));
    }

    #[test]
    fn test_merges_compound_in_ascending_order() {
        let store = at_rest(&[
            DVec3::new(100.0, 0.0, 0.0),
            DVec3::new(104.0, 0.0, 0.0),
            DVec3::new(96.0, 0.0, 0.0),
        ]);
        let params = SimulationParams {
            g: 0.0,
            ..params_for(3)
        };
        let mut sim = Simulation::from_store(params, store).unwrap();
        let report = sim.step();

        assert_eq!(report.merges.len(), 2);
        // (100 + 104) / 2 = 102, then (102 + 96) / 2 = 99
        assert_eq!(report.merges[0].position, DVec3::new(102.0, 0.0, 0.0));
        assert_eq!(report.merges[1].position, DVec3::new(99.0, 0.0, 0.0));
        assert_eq!(report.merges[1].merge_count, 3);
        assert_eq!(sim.store().merge_count(0), 3);
        assert_eq!(report.active_count, 1);
    }

    #[test]
    fn test_detection_uses_step_start_position() {
        // Slot 2 is 6 away from slot 0's start but 8 away after the first merge
        let store = at_rest(&[
            DVec3::new(100.0, 0.0, 0.0),
            DVec3::new(104.0, 0.0, 0.0),
            DVec3::new(94.0, 0.0, 0.0),
        ]);
        let params = SimulationParams {
            g: 0.0,
            ..params_for(3)
        };
        let mut sim = Simulation::from_store(params, store).unwrap();
        let report = sim.step();

        assert_eq!(report.merges.len(), 2);
        assert_eq!(sim.store().merge_count(0), 3);
    }

    #[test]
    fn test_protostar_slots_are_not_touched() {
        let store = ParticleStore::from_particles(&[
            Particle::new_protostar(),
            Particle::new_disk(DVec3::new(3.0, 0.0, 0.0), DVec3::ZERO),
            Particle::new_disk(DVec3::new(50.0, 0.0, 0.0), DVec3::new(0.0, 40.0, 0.0)),
        ]);
        let params = SimulationParams {
            particle_count: 3,
            protostar_fraction: 0.34,
            ..Default::default()
        };
        let mut sim = Simulation::from_store(params, store).unwrap();
        assert_eq!(sim.protostar_count(), 1);

        sim.step();

        let star = sim.store().particle(0);
        assert_eq!(star.position, DVec3::ZERO);
        assert_eq!(star.velocity, DVec3::ZERO);
        assert_eq!(star.size, 3.0);
        assert_eq!(sim.store().merge_count(1), 1);
        assert_eq!(sim.active_count(), 2);
    }

    #[test]
    fn test_dead_slots_stay_parked() {
        let store = at_rest(&[DVec3::new(100.0, 0.0, 0.0), DVec3::new(101.0, 0.0, 0.0)]);
        let mut sim = Simulation::from_store(params_for(2), store).unwrap();

        for _ in 0..10 {
            sim.step();
            assert_eq!(sim.store().position(1), SENTINEL_POSITION);
            assert_eq!(sim.sizes()[1], 0.0);
            assert_eq!(sim.store().merge_count(1), 0);
        }
        assert_eq!(sim.active_count(), 1);
        assert_eq!(sim.frame(), 10);
    }

    #[test]
    fn test_surviving_particle_integrates_after_merge() {
        let store = at_rest(&[DVec3::new(10.0, 0.0, 0.0), DVec3::new(30.0, 0.0, 0.0)]);
        let mut sim = Simulation::from_store(params_for(2), store).unwrap();
        sim.step();

        // No merge: a = -80000 / 100 = -800, v = -80, x = 10 - 8
        let p = sim.store().particle(0);
        assert_eq!(p.velocity, DVec3::new(-80.0, 0.0, 0.0));
        assert_eq!(p.position, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.size, 5.0);
    }

    #[test]
    fn test_largest_body_and_energy() {
        let store = at_rest(&[
            DVec3::new(100.0, 0.0, 0.0),
            DVec3::new(300.0, 0.0, 0.0),
            DVec3::new(301.0, 0.0, 0.0),
        ]);
        let params = SimulationParams {
            g: 0.0,
            ..params_for(3)
        };
        let mut sim = Simulation::from_store(params, store).unwrap();
        assert_eq!(sim.largest_body(), Some((0, 1)));
        assert_eq!(sim.kinetic_energy(), 0.0);

        sim.step();
        assert_eq!(sim.largest_body(), Some((1, 2)));
        assert_eq!(sim.absorbed_count(), 1);
    }
}
