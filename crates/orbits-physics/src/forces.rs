//! Pairwise force laws
//!
//! Both functions return the force acting on `p` directed along the line from
//! `p` to `a`. The force on `a` is the exact negation. Neither law is defined
//! for coincident bodies: a zero separation yields NaN/∞ components.

use crate::body::{Body, LinkParams};
use crate::constants::{EPS0, G};
use glam::DVec3;
use std::f64::consts::PI;

/// Newtonian gravity minus the Coulomb interaction
/// F = G·m_p·m_a / r² − q_p·q_a / (4π·ε₀·r²)
///
/// Like charges repel, so the electrostatic term is subtracted from the
/// attraction along p → a.
pub fn gravitational_force(p: &Body, a: &Body) -> DVec3 {
    let delta = a.position - p.position;
    let distance_squared = delta.length_squared();

    // Products are formed before scaling so swapping p and a is bitwise symmetric
    let fg = G * (p.mass * a.mass) / distance_squared;
    let fc = (p.charge * a.charge) / (4.0 * PI * EPS0 * distance_squared);

    delta.normalize() * (fg - fc)
}

/// Hooke spring with a linear damper, acting along the current link direction
///
/// With `Fs = (L − r)·k` and `Fd` the damper term, the force on `p` is
/// `−(Fs − Fd)` along p → a. A compressed link (shorter than rest length)
/// pushes `p` away from `a`; the damper opposes the rate at which the bodies
/// separate.
pub fn damped_spring_force(p: &Body, a: &Body, link: &LinkParams) -> DVec3 {
    let delta = a.position - p.position;
    let distance = delta.length();
    let direction = delta / distance;

    let compression = link.length - distance;
    let fs = compression * link.spring;

    let separation_speed = (a.velocity - p.velocity).dot(direction);
    let fd = separation_speed * link.damper;

    // p is pushed along -direction by compression, pulled along +direction by separation
    direction * -(fs - fd)
}

/// Gravitational plus electrostatic potential energy of a pair
/// U = −G·m_p·m_a / r + q_p·q_a / (4π·ε₀·r)
pub fn pair_potential_energy(p: &Body, a: &Body) -> f64 {
    let r = (a.position - p.position).length();
    -G * (p.mass * a.mass) / r + (p.charge * a.charge) / (4.0 * PI * EPS0 * r)
}

/// Elastic energy stored in a link, ½·k·(L − r)²
pub fn spring_potential_energy(p: &Body, a: &Body, link: &LinkParams) -> f64 {
    let extension = (a.position - p.position).length() - link.length;
    0.5 * link.spring * extension * extension
}
