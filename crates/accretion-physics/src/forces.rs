//! Central-body gravity and time integration
//!
//! The disk particles only feel the fixed mass at the origin; there is no
//! particle-particle attraction.

use glam::DVec3;

/// Acceleration toward a point mass `central_mass` at the origin
/// a = -G * M / r² along the radius vector
///
/// Returns zero for a particle sitting exactly on the origin.
pub fn central_acceleration(position: DVec3, g: f64, central_mass: f64) -> DVec3 {
    let distance = position.length();
    if distance == 0.0 {
        return DVec3::ZERO;
    }

    let force_magnitude = -(g * central_mass) / (distance * distance);
    (position / distance) * force_magnitude
}

/// Advance one particle by `dt` with semi-implicit (symplectic) Euler.
///
/// Velocity is kicked first and the position drifts with the new velocity.
pub fn integrate(
    position: &mut DVec3,
    velocity: &mut DVec3,
    g: f64,
    central_mass: f64,
    dt: f64,
) {
    *velocity += central_acceleration(*position, g, central_mass) * dt;
    *position += *velocity * dt;
}

/// Speed of a circular orbit at planar radius `rho`: v = sqrt(G * M / ρ)
pub fn circular_orbit_speed(rho: f64, g: f64, central_mass: f64) -> f64 {
    (g * central_mass / rho).sqrt()
}
