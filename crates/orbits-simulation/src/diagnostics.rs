//! Conserved quantities and sanity checks read off a state

use crate::particle_system::ParticleSystem;
use crate::softbody::Softbody;
use glam::DVec3;
use orbits_physics::{pair_potential_energy, spring_potential_energy, Body};

pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| b.mass).sum()
}

pub fn total_momentum(bodies: &[Body]) -> DVec3 {
    bodies.iter().map(Body::momentum).sum()
}

/// Mass-weighted mean position, or the origin for a massless set
pub fn center_of_mass(bodies: &[Body]) -> DVec3 {
    let mass = total_mass(bodies);
    if mass > 0.0 {
        bodies.iter().map(|b| b.position * b.mass).sum::<DVec3>() / mass
    } else {
        DVec3::ZERO
    }
}

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Gravitational plus electrostatic energy over every unordered pair
pub fn pairwise_potential_energy(bodies: &[Body]) -> f64 {
    let mut potential = 0.0;
    for (i, p) in bodies.iter().enumerate() {
        for a in &bodies[i + 1..] {
            potential += pair_potential_energy(p, a);
        }
    }
    potential
}

/// Finite-difference velocity over the last step minus the integrated velocity
///
/// Grows when the step is too coarse for the local dynamics.
pub fn velocity_residual(previous_position: DVec3, current: &Body, dt: f64) -> DVec3 {
    (current.position - previous_position) / dt - current.velocity
}

/// Snapshot of the quantities worth watching while a simulation runs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub momentum: DVec3,
    pub center_of_mass: DVec3,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    /// False once any body component has become NaN or infinite
    pub finite: bool,
}

impl Report {
    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy + self.potential_energy
    }
}

/// States that can be summarised for logging and plotting
pub trait Diagnose {
    fn bodies(&self) -> &[Body];

    fn potential_energy(&self) -> f64;

    fn report(&self) -> Report {
        let bodies = Diagnose::bodies(self);
        Report {
            momentum: total_momentum(bodies),
            center_of_mass: center_of_mass(bodies),
            kinetic_energy: kinetic_energy(bodies),
            potential_energy: self.potential_energy(),
            finite: bodies.iter().all(Body::is_finite),
        }
    }
}

impl Diagnose for ParticleSystem {
    fn bodies(&self) -> &[Body] {
        ParticleSystem::bodies(self)
    }

    fn potential_energy(&self) -> f64 {
        pairwise_potential_energy(ParticleSystem::bodies(self))
    }
}

impl Diagnose for Softbody {
    fn bodies(&self) -> &[Body] {
        Softbody::bodies(self)
    }

    /// Elastic energy stored in the links
    fn potential_energy(&self) -> f64 {
        let bodies = Softbody::bodies(self);
        self.links()
            .iter()
            .map(|link| {
                let (i, j) = link.endpoints();
                spring_potential_energy(&bodies[i], &bodies[j], &link.params)
            })
            .sum()
    }
}
