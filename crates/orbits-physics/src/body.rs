//! Point masses and the elastic links between them

use bytemuck::{Pod, Zeroable};
use glam::DVec3;

/// A point mass
///
/// Laid out as eight consecutive `f64`s (position, velocity, mass, charge) so a
/// slice of bodies can be viewed as one flat array, see [`bodies_as_flat`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Body {
    /// Position (m)
    pub position: DVec3,
    /// Velocity (m/s)
    pub velocity: DVec3,
    /// Mass (kg), must be positive
    pub mass: f64,
    /// Electric charge (C), may be zero
    pub charge: f64,
}

impl Body {
    /// Create an uncharged body
    pub fn new(position: DVec3, velocity: DVec3, mass: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            charge: 0.0,
        }
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    /// Linear momentum p = m·v
    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }

    /// Kinetic energy ½·m·|v|²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Componentwise `self += other` over every field
    pub fn add_assign(&mut self, other: &Body) {
        self.position += other.position;
        self.velocity += other.velocity;
        self.mass += other.mass;
        self.charge += other.charge;
    }

    /// Componentwise `self *= c` over every field
    pub fn scale(&mut self, c: f64) {
        self.position *= c;
        self.velocity *= c;
        self.mass *= c;
        self.charge *= c;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.mass.is_finite()
            && self.charge.is_finite()
    }
}

/// View a slice of bodies as a flat `[x, y, z, vx, vy, vz, m, q, ...]` array
pub fn bodies_as_flat(bodies: &[Body]) -> &[f64] {
    bytemuck::cast_slice(bodies)
}

/// Spring-damper parameters carried by a link
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LinkParams {
    /// Rest length (m)
    pub length: f64,
    /// Spring constant (N/m)
    pub spring: f64,
    /// Damper constant (N·s/m)
    pub damper: f64,
}

impl LinkParams {
    pub fn new(length: f64, spring: f64, damper: f64) -> Self {
        Self {
            length,
            spring,
            damper,
        }
    }

    pub fn add_assign(&mut self, other: &LinkParams) {
        self.length += other.length;
        self.spring += other.spring;
        self.damper += other.damper;
    }

    pub fn scale(&mut self, c: f64) {
        self.length *= c;
        self.spring *= c;
        self.damper *= c;
    }

    pub fn is_finite(&self) -> bool {
        self.length.is_finite() && self.spring.is_finite() && self.damper.is_finite()
    }
}

/// Elastic connection between two bodies, referenced by index
///
/// Endpoints are stored ordered (`start < end` for any valid link).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    start: usize,
    end: usize,
    pub params: LinkParams,
}

impl Link {
    pub fn new(a: usize, b: usize, params: LinkParams) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
            params,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}
