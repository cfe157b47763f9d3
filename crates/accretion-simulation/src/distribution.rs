//! Initial conditions: a collapsed protostar plus a Keplerian particle cloud

use std::f64::consts::TAU;

use accretion_physics::{circular_orbit_speed, Particle, ParticleStore, DISK_THICKNESS};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::SimulationParams;

/// Uniformly distributed random point inside a sphere of radius `max_radius`.
///
/// The radius uses the cube root of a uniform draw so density is uniform by
/// volume rather than by radius.
pub fn random_point_in_sphere<R: Rng + ?Sized>(rng: &mut R, max_radius: f64) -> DVec3 {
    let u = rng.random::<f64>();
    let v = rng.random::<f64>();
    let theta = TAU * u; // angle in the xy-plane
    let phi = (2.0 * v - 1.0).acos(); // angle from the z-axis
    let r = rng.random::<f64>().cbrt() * max_radius;

    DVec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Circular orbit velocity around the z-axis with a small vertical jitter.
///
/// Zero when the particle sits on the z-axis.
pub fn keplerian_velocity<R: Rng + ?Sized>(
    rng: &mut R,
    position: DVec3,
    g: f64,
    central_mass: f64,
) -> DVec3 {
    let rho = (position.x * position.x + position.y * position.y).sqrt();
    if rho <= 0.0 {
        return DVec3::ZERO;
    }

    let speed = circular_orbit_speed(rho, g, central_mass);
    DVec3::new(
        -position.y * speed / rho,
        position.x * speed / rho,
        (rng.random::<f64>() - 0.5) * speed * DISK_THICKNESS,
    )
}

/// Generate every particle slot for `params` using `rng`
pub fn generate<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Vec<Particle> {
    let protostar_count = params.protostar_count();
    let mut particles = Vec::with_capacity(params.particle_count);

    for _ in 0..protostar_count {
        particles.push(Particle {
            size: params.protostar_size,
            ..Particle::new_protostar()
        });
    }

    for _ in protostar_count..params.particle_count {
        let position = random_point_in_sphere(rng, params.max_radius);
        let velocity = keplerian_velocity(rng, position, params.g, params.central_mass);
        particles.push(Particle {
            size: params.disk_size,
            ..Particle::new_disk(position, velocity)
        });
    }

    log::info!(
        "Initialized {} particles ({} protostar, {} disk) within radius {}",
        particles.len(),
        protostar_count,
        particles.len() - protostar_count,
        params.max_radius
    );

    particles
}

/// Build the particle store, seeded from `params.seed` when present
pub fn generate_store(params: &SimulationParams) -> ParticleStore {
    let particles = match params.seed {
        Some(seed) => generate(params, &mut StdRng::seed_from_u64(seed)),
        None => generate(params, &mut rand::rng()),
    };
    ParticleStore::from_particles(&particles)
}
